use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::core::{BatchAnalysis, SemanticModel};

/// Serializes semantic models to the JSON interchange format
pub struct JsonModelFormatter {
    /// Single-line output instead of indented
    compact: bool,
}

impl JsonModelFormatter {
    pub fn new() -> Self {
        Self { compact: false }
    }

    pub fn compact() -> Self {
        Self { compact: true }
    }

    pub fn format_model(&self, model: &SemanticModel) -> Result<String> {
        self.render(&serde_json::to_value(model)?)
    }

    /// Every analysed file with its model, followed by the files that failed.
    pub fn format_batch(&self, batch: &BatchAnalysis) -> Result<String> {
        let files = batch
            .files
            .iter()
            .map(|file| -> Result<Value> {
                Ok(json!({
                    "path": file.path.to_string_lossy(),
                    "language": file.language,
                    "model": serde_json::to_value(&file.model)?,
                }))
            })
            .collect::<Result<Vec<Value>>>()?;

        let failures: Vec<Value> = batch
            .failures
            .iter()
            .map(|failure| {
                json!({
                    "path": failure.path.to_string_lossy(),
                    "error": failure.error.to_string(),
                })
            })
            .collect();

        let output = json!({
            "meta": {
                "files": batch.files.len(),
                "failures": batch.failures.len(),
                "entities": batch.files.iter().map(|f| f.model.len()).sum::<usize>(),
            },
            "files": files,
            "failures": failures,
        });

        self.render(&output)
    }

    pub fn format_to_file(&self, model: &SemanticModel, output_path: &Path) -> Result<()> {
        let json_content = self.format_model(model)?;
        fs::write(output_path, json_content)?;
        Ok(())
    }

    fn render(&self, value: &Value) -> Result<String> {
        if self.compact {
            Ok(serde_json::to_string(value)?)
        } else {
            Ok(serde_json::to_string_pretty(value)?)
        }
    }
}

impl Default for JsonModelFormatter {
    fn default() -> Self {
        Self::new()
    }
}
