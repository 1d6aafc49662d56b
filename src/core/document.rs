use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, AnalysisResult};
use crate::parsers::common::read_source;

/// A JSON file loaded for diagramming. Key order follows the file.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    pub path: PathBuf,
    pub value: Value,
}

impl JsonDocument {
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let text = read_source(path)?;
        let value = serde_json::from_str(&text).map_err(|source| AnalysisError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            value,
        })
    }
}
