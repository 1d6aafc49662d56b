use tree_sitter::Node as TSNode;

use super::common::{extract_text, TreeSitterParser};
use super::LanguageParser;
use crate::core::syntax::{
    BaseExpr, NodeId, NodeKind, Parameter, ParameterKind, SourceUnit, SyntaxNode,
};
use crate::error::{AnalysisResult, ParseError};

/// Grammar nodes that never appear in the lowered tree; their children are
/// attached to the enclosing node instead.
const TRANSPARENT_KINDS: &[&str] = &["block", "decorated_definition"];

/// Python 2 statements the grammar still accepts but Python 3 rejects.
const LEGACY_STATEMENTS: &[(&str, &str)] = &[("print_statement", "print"), ("exec_statement", "exec")];

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> AnalysisResult<Self> {
        // Fail early if the grammar and the runtime disagree on ABI version.
        TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self)
    }

    fn lower(&self, root: TSNode, source: &[u8]) -> Result<SourceUnit, ParseError> {
        let mut unit = SourceUnit::new("python");
        let mut stack: Vec<(TSNode, NodeId)> = Vec::new();
        push_children(&mut stack, lowered_children(root), unit.root());

        while let Some((node, parent)) = stack.pop() {
            if node.is_extra() {
                continue;
            }
            if let Some((_, keyword)) = LEGACY_STATEMENTS.iter().find(|(kind, _)| *kind == node.kind()) {
                return Err(ParseError::at_line(
                    line_of(&node),
                    format!("Python 2 `{keyword}` statement is not valid Python 3"),
                ));
            }
            if TRANSPARENT_KINDS.contains(&node.kind()) {
                push_children(&mut stack, lowered_children(node), parent);
                continue;
            }

            let id = match node.kind() {
                "class_definition" => unit.push(parent, self.lower_class(&node, source)),
                "function_definition" => unit.push(parent, self.lower_function(&node, source)),
                kind => unit.push(
                    parent,
                    SyntaxNode::new(NodeKind::Other(kind), None, line_of(&node)),
                ),
            };
            push_children(&mut stack, lowered_children(node), id);
        }

        Ok(unit)
    }

    fn lower_class(&self, class_node: &TSNode, source: &[u8]) -> SyntaxNode {
        let name = field_text(class_node, "name", source);

        let mut bases = Vec::new();
        if let Some(superclasses) = class_node.child_by_field_name("superclasses") {
            let mut cursor = superclasses.walk();
            for arg in superclasses.named_children(&mut cursor) {
                let arg = unparenthesize(arg);
                match arg.kind() {
                    "identifier" => bases.push(BaseExpr::Name(extract_text(&arg, source).to_string())),
                    // `metaclass=...` and friends are class keywords, not bases.
                    "keyword_argument" | "dictionary_splat" | "comment" => {}
                    kind => bases.push(BaseExpr::Compound(kind)),
                }
            }
        }

        SyntaxNode::new(NodeKind::ClassDef { bases }, name, line_of(class_node))
    }

    fn lower_function(&self, func_node: &TSNode, source: &[u8]) -> SyntaxNode {
        let name = field_text(func_node, "name", source);

        let parameters = func_node
            .child_by_field_name("parameters")
            .map(|params| self.lower_parameters(&params, source))
            .unwrap_or_default();

        let mut cursor = func_node.walk();
        let is_async = func_node
            .children(&mut cursor)
            .any(|child| child.kind() == "async");

        SyntaxNode::new(
            NodeKind::FunctionDef {
                parameters,
                is_async,
            },
            name,
            line_of(func_node),
        )
    }

    fn lower_parameters(&self, params_node: &TSNode, source: &[u8]) -> Vec<Parameter> {
        let mut parameters: Vec<Parameter> = Vec::new();
        let mut keyword_only = false;
        let regular = |keyword_only: bool| {
            if keyword_only {
                ParameterKind::KeywordOnly
            } else {
                ParameterKind::PositionalOrKeyword
            }
        };

        let mut cursor = params_node.walk();
        for param in params_node.named_children(&mut cursor) {
            match param.kind() {
                "identifier" => {
                    parameters.push(Parameter::new(
                        extract_text(&param, source),
                        regular(keyword_only),
                    ));
                }
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = field_text(&param, "name", source) {
                        parameters.push(Parameter::new(name, regular(keyword_only)));
                    }
                }
                "typed_parameter" => {
                    let Some(inner) = param.named_child(0) else {
                        continue;
                    };
                    match inner.kind() {
                        "identifier" => parameters.push(Parameter::new(
                            extract_text(&inner, source),
                            regular(keyword_only),
                        )),
                        "list_splat_pattern" => {
                            keyword_only = true;
                            if let Some(name) = splat_name(&inner, source) {
                                parameters.push(Parameter::new(name, ParameterKind::VarPositional));
                            }
                        }
                        "dictionary_splat_pattern" => {
                            if let Some(name) = splat_name(&inner, source) {
                                parameters.push(Parameter::new(name, ParameterKind::VarKeyword));
                            }
                        }
                        _ => {}
                    }
                }
                "list_splat_pattern" => {
                    keyword_only = true;
                    if let Some(name) = splat_name(&param, source) {
                        parameters.push(Parameter::new(name, ParameterKind::VarPositional));
                    }
                }
                "dictionary_splat_pattern" => {
                    if let Some(name) = splat_name(&param, source) {
                        parameters.push(Parameter::new(name, ParameterKind::VarKeyword));
                    }
                }
                "keyword_separator" => keyword_only = true,
                "positional_separator" => {
                    for earlier in parameters.iter_mut() {
                        if earlier.kind == ParameterKind::PositionalOrKeyword {
                            earlier.kind = ParameterKind::PositionalOnly;
                        }
                    }
                }
                _ => {}
            }
        }

        parameters
    }
}

impl LanguageParser for PythonParser {
    fn parse_source(&self, source: &str) -> AnalysisResult<SourceUnit> {
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse_source(source)?;
        Ok(self.lower(tree.root_node(), source.as_bytes())?)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

fn line_of(node: &TSNode) -> usize {
    node.start_position().row + 1
}

fn field_text(node: &TSNode, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| extract_text(&child, source).to_string())
        .filter(|text| !text.is_empty())
}

/// `(Base)` and `((Base))` name the same base as `Base`.
fn unparenthesize(mut node: TSNode) -> TSNode {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

fn splat_name(splat: &TSNode, source: &[u8]) -> Option<String> {
    splat
        .named_child(0)
        .filter(|inner| inner.kind() == "identifier")
        .map(|inner| extract_text(&inner, source).to_string())
}

/// Children that take part in lowering. Definitions contribute only their body.
fn lowered_children(node: TSNode) -> Vec<TSNode> {
    match node.kind() {
        "class_definition" | "function_definition" => node
            .child_by_field_name("body")
            .map(|body| vec![body])
            .unwrap_or_default(),
        _ => {
            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            children
        }
    }
}

fn push_children<'t>(stack: &mut Vec<(TSNode<'t>, NodeId)>, children: Vec<TSNode<'t>>, parent: NodeId) {
    stack.extend(children.into_iter().rev().map(|child| (child, parent)));
}
