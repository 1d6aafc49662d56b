use petgraph::{graph::NodeIndex, Directed, Graph};
use std::collections::HashMap;

use super::model::{EntityKind, SemanticModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Class,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Source class derives from target class.
    Inheritance,
}

/// One box of the class diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub name: String,
    pub node_type: NodeType,
    /// Method names, in declaration order; empty for functions.
    pub members: Vec<String>,
    pub line_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramEdge {
    pub edge_type: EdgeType,
}

pub type DiagramGraph = Graph<DiagramNode, DiagramEdge, Directed>;

impl DiagramNode {
    pub fn new(name: String, node_type: NodeType, line_number: usize) -> Self {
        Self {
            name,
            node_type,
            members: Vec::new(),
            line_number,
        }
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }
}

pub struct GraphBuilder {
    graph: DiagramGraph,
    class_map: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            class_map: HashMap::new(),
        }
    }

    /// Classes become nodes carrying their method names, functions become
    /// standalone nodes, and bases defined in the same model become edges.
    pub fn from_model(model: &SemanticModel) -> DiagramGraph {
        let mut builder = Self::new();
        let mut pending = Vec::new();

        for entity in model {
            match &entity.kind {
                EntityKind::Class {
                    base_classes,
                    methods,
                } => {
                    let members = methods.iter().map(|m| m.name.clone()).collect();
                    let node = DiagramNode::new(entity.name.clone(), NodeType::Class, entity.line_number)
                        .with_members(members);
                    let index = builder.add_node(node);
                    pending.extend(base_classes.iter().map(|base| (index, base.clone())));
                }
                EntityKind::Function { .. } => {
                    builder.add_node(DiagramNode::new(
                        entity.name.clone(),
                        NodeType::Function,
                        entity.line_number,
                    ));
                }
            }
        }

        for (derived, base) in pending {
            builder.add_inheritance(derived, &base);
        }

        builder.build()
    }

    pub fn add_node(&mut self, node: DiagramNode) -> NodeIndex {
        let is_class = node.node_type == NodeType::Class;
        let name = node.name.clone();
        let index = self.graph.add_node(node);
        if is_class {
            // First definition wins when a name is reused.
            self.class_map.entry(name).or_insert(index);
        }
        index
    }

    /// Link `derived` to the class named `base`; `None` when no such class is known.
    pub fn add_inheritance(
        &mut self,
        derived: NodeIndex,
        base: &str,
    ) -> Option<petgraph::graph::EdgeIndex> {
        let base_idx = *self.class_map.get(base)?;
        if base_idx == derived {
            return None;
        }
        Some(self.graph.add_edge(
            derived,
            base_idx,
            DiagramEdge {
                edge_type: EdgeType::Inheritance,
            },
        ))
    }

    pub fn build(self) -> DiagramGraph {
        self.graph
    }

    pub fn get_class_index(&self, name: &str) -> Option<NodeIndex> {
        self.class_map.get(name).copied()
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
