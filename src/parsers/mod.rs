pub mod cache;
pub mod common;
pub mod python;

use crate::core::syntax::SourceUnit;
use crate::error::{AnalysisError, AnalysisResult};

/// Turns source text into the language-agnostic [`SourceUnit`] arena.
pub trait LanguageParser {
    fn parse_source(&self, source: &str) -> AnalysisResult<SourceUnit>;
    fn language_name(&self) -> &str;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: &str) -> AnalysisResult<Box<dyn LanguageParser + Send + Sync>> {
        match language {
            "python" | "py" => Ok(Box::new(python::PythonParser::new()?)),
            _ => Err(AnalysisError::UnsupportedLanguage(language.to_string())),
        }
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
