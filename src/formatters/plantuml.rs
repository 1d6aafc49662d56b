use anyhow::Result;
use petgraph::visit::EdgeRef;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::{DiagramGraph, EdgeType, GraphBuilder, NodeType, SemanticModel};

fn plain_name() -> &'static Regex {
    static PLAIN_NAME: OnceLock<Regex> = OnceLock::new();
    PLAIN_NAME.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// PlantUML class-diagram source for a semantic model.
///
/// Classes list their methods as `name()` pseudo-calls, top-level functions
/// are drawn as standalone boxes marked `(function)`, and a base class that is
/// defined in the same model gets a `Base <|-- Derived` arrow.
pub struct PlantUmlFormatter;

impl PlantUmlFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_model(&self, model: &SemanticModel) -> String {
        self.format_graph(&GraphBuilder::from_model(model))
    }

    pub fn format_graph(&self, graph: &DiagramGraph) -> String {
        let mut lines = vec!["@startuml".to_string()];

        for index in graph.node_indices() {
            let node = &graph[index];
            lines.push(format!("class {} {{", quote_name(&node.name)));
            match node.node_type {
                NodeType::Class => {
                    lines.extend(node.members.iter().map(|member| format!("  {member}()")));
                }
                NodeType::Function => lines.push("  (function)".to_string()),
            }
            lines.push("}".to_string());
        }

        for edge in graph.edge_references() {
            match edge.weight().edge_type {
                EdgeType::Inheritance => lines.push(format!(
                    "{} <|-- {}",
                    quote_name(&graph[edge.target()].name),
                    quote_name(&graph[edge.source()].name)
                )),
            }
        }

        lines.push("@enduml".to_string());
        lines.join("\n")
    }

    /// Object keys become nested `class key { }` blocks, indented two
    /// spaces per level. Arrays are transparent; scalars draw nothing.
    pub fn format_json(&self, document: &Value) -> String {
        let mut lines = vec!["@startuml".to_string()];
        json_blocks(document, 0, &mut lines);
        lines.push("@enduml".to_string());
        lines.join("\n")
    }

    pub fn format_to_file(&self, model: &SemanticModel, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_model(model))?;
        Ok(())
    }
}

impl Default for PlantUmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn json_blocks(value: &Value, indent: usize, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            let pad = " ".repeat(indent);
            for (key, child) in map {
                lines.push(format!("{pad}class {} {{", quote_name(key)));
                if child.is_object() || child.is_array() {
                    json_blocks(child, indent + 2, lines);
                }
                lines.push(format!("{pad}}}"));
            }
        }
        Value::Array(items) => {
            for item in items {
                json_blocks(item, indent, lines);
            }
        }
        _ => {}
    }
}

fn quote_name(name: &str) -> String {
    if plain_name().is_match(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "'"))
    }
}
