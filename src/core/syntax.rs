//! Language-agnostic syntax tree consumed by the structure extractor.
//!
//! Parsers lower their concrete trees into a [`SourceUnit`]: a flat arena of
//! [`SyntaxNode`]s addressed by [`NodeId`]. Nodes only know their children;
//! parent lookups are answered by a [`ParentIndex`] built in a separate pass.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A base-type expression in a class header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseExpr {
    /// A bare identifier such as `Base`.
    Name(String),
    /// Anything else (`pkg.Base`, `make_base()`, `Generic[T]`, `*bases`), keyed by node kind.
    Compound(&'static str),
}

impl BaseExpr {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            BaseExpr::Name(name) => Some(name),
            BaseExpr::Compound(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    ClassDef {
        bases: Vec<BaseExpr>,
    },
    FunctionDef {
        parameters: Vec<Parameter>,
        is_async: bool,
    },
    /// Any other construct, tagged with the parser's node kind.
    Other(&'static str),
}

impl NodeKind {
    pub fn is_module(&self) -> bool {
        matches!(self, NodeKind::Module)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, NodeKind::FunctionDef { .. })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::ClassDef { .. } => "class",
            NodeKind::FunctionDef { .. } => "function",
            NodeKind::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub name: Option<String>,
    /// 1-based source line of the construct.
    pub line: usize,
    pub children: Vec<NodeId>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, name: Option<String>, line: usize) -> Self {
        Self {
            kind,
            name,
            line,
            children: Vec::new(),
        }
    }
}

/// Parsed representation of one source file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    language: String,
    nodes: Vec<SyntaxNode>,
}

impl SourceUnit {
    /// Create a unit holding only its module root.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            nodes: vec![SyntaxNode::new(NodeKind::Module, None, 1)],
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// Panics if `parent` does not belong to this unit.
    pub fn push(&mut self, parent: NodeId, node: SyntaxNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The module root is always present.
        false
    }

    /// Pre-order walk over every node, starting at the root.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            unit: self,
            stack: vec![self.root()],
        }
    }
}

pub struct Preorder<'a> {
    unit: &'a SourceUnit,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.unit.node(id).children.iter().rev().copied());
        Some(id)
    }
}

/// Immediate-parent lookup for every node of a [`SourceUnit`].
#[derive(Debug, Clone)]
pub struct ParentIndex {
    parents: Vec<Option<NodeId>>,
}

impl ParentIndex {
    pub fn build(unit: &SourceUnit) -> Self {
        let mut parents = vec![None; unit.len()];
        for (index, node) in unit.nodes.iter().enumerate() {
            for child in &node.children {
                parents[child.0] = Some(NodeId(index));
            }
        }
        Self { parents }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.0).copied().flatten()
    }
}
