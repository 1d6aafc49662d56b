pub mod analyzer;
pub mod document;
pub mod graph;
pub mod model;
pub mod scanner;
pub mod structure;
pub mod syntax;

pub use analyzer::{AnalysisFailure, BatchAnalysis, FileAnalysis, FileAnalyzer};
pub use document::JsonDocument;
pub use graph::{DiagramEdge, DiagramGraph, DiagramNode, EdgeType, GraphBuilder, NodeType};
pub use model::{EntityKind, MethodEntry, SemanticEntity, SemanticModel, SemanticModelBuilder};
pub use scanner::{FileInfo, FileScanner};
pub use structure::{ClassRecord, FunctionRecord, MethodRecord, StructuralRecord, StructureExtractor};
pub use syntax::{NodeId, NodeKind, ParentIndex, SourceUnit, SyntaxNode};
