use std::fmt::Write as _;

use crate::core::{BatchAnalysis, EntityKind, SemanticModel};

/// Human-readable outline of a semantic model, headed by a one-line summary
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn summary_line(&self, model: &SemanticModel) -> String {
        format!(
            "This file contains {} functions and {} classes.",
            model.functions().count(),
            model.classes().count()
        )
    }

    pub fn format_model(&self, model: &SemanticModel) -> String {
        let mut output = String::new();
        output.push_str(&self.summary_line(model));
        output.push('\n');

        for entity in model {
            match &entity.kind {
                EntityKind::Class {
                    base_classes,
                    methods,
                } => {
                    let bases = if base_classes.is_empty() {
                        String::new()
                    } else {
                        format!("({})", base_classes.join(", "))
                    };
                    let _ = writeln!(
                        output,
                        "class {}{}  [line {}]",
                        entity.name, bases, entity.line_number
                    );
                    for method in methods {
                        let _ = writeln!(
                            output,
                            "    def {}({})  [line {}]",
                            method.name,
                            method.parameters.join(", "),
                            method.line_number
                        );
                    }
                }
                EntityKind::Function { parameters } => {
                    let _ = writeln!(
                        output,
                        "def {}({})  [line {}]",
                        entity.name,
                        parameters.join(", "),
                        entity.line_number
                    );
                }
            }
        }

        output
    }

    pub fn format_batch(&self, batch: &BatchAnalysis) -> String {
        let mut output = String::new();
        for file in &batch.files {
            let _ = writeln!(output, "== {}", file.path.display());
            output.push_str(&self.format_model(&file.model));
            output.push('\n');
        }
        for failure in &batch.failures {
            let _ = writeln!(output, "!! {}: {}", failure.path.display(), failure.error);
        }
        output
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}
