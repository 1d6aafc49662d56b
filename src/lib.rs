//! # filelens
//!
//! Structural inspection of source files.
//!
//! A parser lowers a file into a language-agnostic syntax arena, the
//! [`core::StructureExtractor`] collects classes (with bases and methods) and
//! module-level functions, and the [`core::SemanticModelBuilder`] turns that
//! record into a serializable list of tagged entities.
//!
//! ## Consumers
//!
//! - **JSON**: the semantic model in its interchange form
//! - **Text**: a one-line summary plus an outline
//! - **PlantUML**: class-diagram source, optionally rendered by `plantuml.jar`;
//!   JSON documents are drawn as nested class blocks
//! - **Summaries**: per-entity prose from an OpenAI-compatible endpoint
//!
//! ## Supported Languages
//!
//! Python

pub mod collaborators;
pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod parsers;

pub use error::{AnalysisError, AnalysisResult, MalformedInputError, ParseError};
