use serde::{Deserialize, Serialize};
use tracing::debug;

use super::syntax::{NodeId, NodeKind, Parameter, ParameterKind, ParentIndex, SourceUnit};
use crate::config::{ExtractOptions, ParameterPolicy};

/// A function captured from the syntax tree, either at module scope or in a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(alias = "params")]
    pub parameters: Vec<String>,
    #[serde(alias = "lineno")]
    pub line_number: usize,
}

pub type MethodRecord = FunctionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub base_classes: Vec<String>,
    #[serde(alias = "lineno")]
    pub line_number: usize,
    pub methods: Vec<MethodRecord>,
}

/// Raw extraction result: every class in traversal order, then module-level functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralRecord {
    pub classes: Vec<ClassRecord>,
    #[serde(alias = "functions")]
    pub top_level_functions: Vec<FunctionRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct StructureExtractor {
    options: ExtractOptions,
}

impl StructureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    pub fn extract(&self, unit: &SourceUnit) -> StructuralRecord {
        let parents = ParentIndex::build(unit);
        let mut record = StructuralRecord::default();

        for id in unit.preorder() {
            match &unit.node(id).kind {
                NodeKind::ClassDef { .. } => {
                    if let Some(class) = self.class_record(unit, id) {
                        record.classes.push(class);
                    }
                }
                NodeKind::FunctionDef { .. } if self.is_module_level(unit, &parents, id) => {
                    if let Some(function) = self.function_record(unit, id) {
                        record.top_level_functions.push(function);
                    }
                }
                _ => {}
            }
        }

        debug!(
            language = unit.language(),
            classes = record.classes.len(),
            functions = record.top_level_functions.len(),
            "extracted structure"
        );
        record
    }

    fn is_module_level(&self, unit: &SourceUnit, parents: &ParentIndex, id: NodeId) -> bool {
        parents
            .parent(id)
            .map(|parent| unit.node(parent).kind.is_module())
            .unwrap_or(false)
    }

    fn class_record(&self, unit: &SourceUnit, id: NodeId) -> Option<ClassRecord> {
        let node = unit.node(id);
        let NodeKind::ClassDef { bases } = &node.kind else {
            return None;
        };
        let Some(name) = node.name.as_deref().filter(|name| !name.is_empty()) else {
            debug!(line = node.line, "skipping class without a name");
            return None;
        };

        let base_classes = bases
            .iter()
            .filter_map(|base| base.as_name())
            .map(str::to_string)
            .collect();

        let methods = unit
            .children(id)
            .filter(|child| unit.node(*child).kind.is_function())
            .filter_map(|child| self.function_record(unit, child))
            .collect();

        Some(ClassRecord {
            name: name.to_string(),
            base_classes,
            line_number: node.line,
            methods,
        })
    }

    fn function_record(&self, unit: &SourceUnit, id: NodeId) -> Option<FunctionRecord> {
        let node = unit.node(id);
        let NodeKind::FunctionDef { parameters, .. } = &node.kind else {
            return None;
        };
        let Some(name) = node.name.as_deref().filter(|name| !name.is_empty()) else {
            debug!(line = node.line, "skipping function without a name");
            return None;
        };

        Some(FunctionRecord {
            name: name.to_string(),
            parameters: self.select_parameters(parameters),
            line_number: node.line,
        })
    }

    fn select_parameters(&self, parameters: &[Parameter]) -> Vec<String> {
        parameters
            .iter()
            .filter(|param| match self.options.parameter_policy {
                ParameterPolicy::Positional => param.kind == ParameterKind::PositionalOrKeyword,
                ParameterPolicy::All => true,
            })
            .map(|param| param.name.clone())
            .collect()
    }
}
