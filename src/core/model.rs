use serde::{Deserialize, Serialize};

use super::structure::{ClassRecord, FunctionRecord, StructuralRecord};
use crate::error::MalformedInputError;

/// A method as it appears inside a class entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    pub name: String,
    pub parameters: Vec<String>,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "lowercase")]
pub enum EntityKind {
    Class {
        base_classes: Vec<String>,
        methods: Vec<MethodEntry>,
    },
    Function {
        parameters: Vec<String>,
    },
}

/// One normalized unit of the semantic model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticEntity {
    pub name: String,
    pub line_number: usize,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl SemanticEntity {
    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntityKind::Class { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, EntityKind::Function { .. })
    }

    pub fn entity_type(&self) -> &'static str {
        match self.kind {
            EntityKind::Class { .. } => "class",
            EntityKind::Function { .. } => "function",
        }
    }
}

/// Ordered entity list: classes first, then top-level functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemanticModel {
    entities: Vec<SemanticEntity>,
}

impl SemanticModel {
    pub fn entities(&self) -> &[SemanticEntity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<SemanticEntity> {
        self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SemanticEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &SemanticEntity> {
        self.entities.iter().filter(|entity| entity.is_class())
    }

    pub fn functions(&self) -> impl Iterator<Item = &SemanticEntity> {
        self.entities.iter().filter(|entity| entity.is_function())
    }
}

impl<'a> IntoIterator for &'a SemanticModel {
    type Item = &'a SemanticEntity;
    type IntoIter = std::slice::Iter<'a, SemanticEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticModelBuilder;

impl SemanticModelBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, record: &StructuralRecord) -> Result<SemanticModel, MalformedInputError> {
        let mut entities =
            Vec::with_capacity(record.classes.len() + record.top_level_functions.len());

        for (index, class) in record.classes.iter().enumerate() {
            entities.push(self.class_entity(class, &format!("classes[{index}]"))?);
        }

        for (index, function) in record.top_level_functions.iter().enumerate() {
            let location = format!("top_level_functions[{index}]");
            validate(&function.name, function.line_number, &location)?;
            entities.push(SemanticEntity {
                name: function.name.clone(),
                line_number: function.line_number,
                kind: EntityKind::Function {
                    parameters: function.parameters.clone(),
                },
            });
        }

        Ok(SemanticModel { entities })
    }

    /// Build from a structural record in its JSON interchange form.
    pub fn build_from_value(
        &self,
        value: serde_json::Value,
    ) -> Result<SemanticModel, MalformedInputError> {
        let record: StructuralRecord = serde_json::from_value(value)
            .map_err(|err| MalformedInputError::new("$", err.to_string()))?;
        self.build(&record)
    }

    pub fn build_from_json(&self, text: &str) -> Result<SemanticModel, MalformedInputError> {
        let record: StructuralRecord = serde_json::from_str(text)
            .map_err(|err| MalformedInputError::new("$", err.to_string()))?;
        self.build(&record)
    }

    fn class_entity(
        &self,
        class: &ClassRecord,
        location: &str,
    ) -> Result<SemanticEntity, MalformedInputError> {
        validate(&class.name, class.line_number, location)?;

        let methods = class
            .methods
            .iter()
            .enumerate()
            .map(|(index, method)| method_entry(method, &format!("{location}.methods[{index}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SemanticEntity {
            name: class.name.clone(),
            line_number: class.line_number,
            kind: EntityKind::Class {
                base_classes: class.base_classes.clone(),
                methods,
            },
        })
    }
}

fn method_entry(method: &FunctionRecord, location: &str) -> Result<MethodEntry, MalformedInputError> {
    validate(&method.name, method.line_number, location)?;
    Ok(MethodEntry {
        name: method.name.clone(),
        parameters: method.parameters.clone(),
        line_number: method.line_number,
    })
}

fn validate(name: &str, line_number: usize, location: &str) -> Result<(), MalformedInputError> {
    if name.is_empty() {
        return Err(MalformedInputError::new(location, "empty name"));
    }
    if line_number == 0 {
        return Err(MalformedInputError::new(
            location,
            "line_number must be 1-based",
        ));
    }
    Ok(())
}
