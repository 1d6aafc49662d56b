use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::error::{AnalysisError, AnalysisResult, ParseError};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> AnalysisResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| AnalysisError::Grammar(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source`, rejecting trees that contain error or missing nodes.
    pub fn parse_source(&mut self, source: &str) -> Result<Tree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new("parser produced no syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(match first_error_node(root) {
                Some(node) if node.is_missing() => ParseError::at_line(
                    node.start_position().row + 1,
                    format!("missing `{}`", node.kind()),
                ),
                Some(node) => ParseError::at_line(
                    node.start_position().row + 1,
                    format!("invalid syntax near `{}`", snippet(&node, source.as_bytes())),
                ),
                None => ParseError::new("invalid syntax"),
            });
        }

        Ok(tree)
    }
}

/// Buffered read of a source file into memory.
pub fn read_source(file_path: &Path) -> AnalysisResult<String> {
    let io_err = |source| AnalysisError::Io {
        path: file_path.to_path_buf(),
        source,
    };

    let file = File::open(file_path).map_err(io_err)?;
    let file_size = file.metadata().map_err(io_err)?.len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content).map_err(io_err)?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

/// Earliest `ERROR` or `MISSING` node in document order.
fn first_error_node(root: TSNode) -> Option<TSNode> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn snippet(node: &TSNode, source: &[u8]) -> String {
    let text = extract_text(node, source);
    let first_line = text.lines().next().unwrap_or("").trim();
    first_line.chars().take(40).collect()
}
