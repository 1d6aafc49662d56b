pub mod json;
pub mod plantuml;
pub mod text;

pub use json::JsonModelFormatter;
pub use plantuml::PlantUmlFormatter;
pub use text::TextFormatter;
