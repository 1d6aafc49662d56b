//! Consumers of the finished semantic model that live outside the core:
//! the PlantUML renderer process and the LLM summarizer.

pub mod diagrams;
pub mod renderer;
pub mod summarizer;

pub use diagrams::{DiagramOutput, DiagramWriter};
pub use renderer::{PlantUmlRenderer, RenderError, RendererConfig};
pub use summarizer::{
    build_prompt, summarize_model, ChatCompletionSummarizer, EntitySummary, SummarizeError,
    Summarizer, SummarizerConfig,
};
