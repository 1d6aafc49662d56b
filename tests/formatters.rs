use filelens::config::{AnalyzerConfig, CacheMode};
use filelens::core::{FileAnalyzer, SemanticModel, SemanticModelBuilder, StructuralRecord};
use filelens::formatters::{JsonModelFormatter, PlantUmlFormatter, TextFormatter};
use serde_json::Value;
use std::fs;

const ANIMALS: &str = r#"class Animal:
    def speak(self): pass

class Dog(Animal):
    def speak(self): pass
    def fetch(self, item): pass

def greet(name): pass
"#;

fn analyzer() -> FileAnalyzer {
    FileAnalyzer::with_config(AnalyzerConfig::new().with_cache(CacheMode::Disabled))
}

fn model(code: &str) -> SemanticModel {
    analyzer().analyze_source(code, "python").unwrap()
}

#[test]
fn plantuml_diagram_for_classes_functions_and_inheritance() {
    let diagram = PlantUmlFormatter::new().format_model(&model(ANIMALS));
    assert_eq!(
        diagram,
        "@startuml\n\
         class Animal {\n  speak()\n}\n\
         class Dog {\n  speak()\n  fetch()\n}\n\
         class greet {\n  (function)\n}\n\
         Animal <|-- Dog\n\
         @enduml"
    );
}

#[test]
fn plantuml_diagram_of_empty_model() {
    let diagram = PlantUmlFormatter::new().format_model(&SemanticModel::default());
    assert_eq!(diagram, "@startuml\n@enduml");
}

#[test]
fn plantuml_quotes_names_that_are_not_identifiers() {
    let model = SemanticModelBuilder::new()
        .build_from_json(
            r#"{"classes": [{"name": "weird name", "base_classes": [], "line_number": 1, "methods": []}],
                "top_level_functions": []}"#,
        )
        .unwrap();
    let diagram = PlantUmlFormatter::new().format_model(&model);
    assert!(diagram.contains("class \"weird name\" {"), "{diagram}");
}

#[test]
fn summary_line_counts_functions_then_classes() {
    let text = TextFormatter::new();
    assert_eq!(
        text.summary_line(&model(ANIMALS)),
        "This file contains 1 functions and 2 classes."
    );
    assert_eq!(
        text.summary_line(&SemanticModel::default()),
        "This file contains 0 functions and 0 classes."
    );
}

#[test]
fn text_outline_lists_entities_with_lines() {
    let outline = TextFormatter::new().format_model(&model(ANIMALS));
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(
        lines,
        vec![
            "This file contains 1 functions and 2 classes.",
            "class Animal  [line 1]",
            "    def speak(self)  [line 2]",
            "class Dog(Animal)  [line 4]",
            "    def speak(self)  [line 5]",
            "    def fetch(self, item)  [line 6]",
            "def greet(name)  [line 8]",
        ]
    );
}

#[test]
fn json_model_is_pretty_unless_compact() {
    let model = model("def greet(name): pass\n");

    let pretty = JsonModelFormatter::new().format_model(&model).unwrap();
    assert!(pretty.contains('\n'));

    let compact = JsonModelFormatter::compact().format_model(&model).unwrap();
    assert!(!compact.contains('\n'));
    assert_eq!(
        serde_json::from_str::<Value>(&compact).unwrap(),
        serde_json::json!([
            {"entity_type": "function", "name": "greet", "parameters": ["name"], "line_number": 1}
        ])
    );

    let reparsed: SemanticModel = serde_json::from_str(&pretty).unwrap();
    assert_eq!(reparsed, model);
}

#[test]
fn batch_reports_carry_files_and_failures() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("animals.py"), ANIMALS).unwrap();
    fs::write(dir.path().join("oops.py"), "class :\n").unwrap();

    let batch = analyzer().analyze_directory(dir.path()).unwrap();

    let json: Value =
        serde_json::from_str(&JsonModelFormatter::new().format_batch(&batch).unwrap()).unwrap();
    assert_eq!(json["meta"]["files"], 1);
    assert_eq!(json["meta"]["failures"], 1);
    assert_eq!(json["meta"]["entities"], 3);
    assert_eq!(json["files"][0]["language"], "python");
    assert_eq!(json["files"][0]["model"][1]["name"], "Dog");
    assert!(json["failures"][0]["path"]
        .as_str()
        .unwrap()
        .ends_with("oops.py"));
    assert!(json["failures"][0]["error"]
        .as_str()
        .unwrap()
        .starts_with("parse error"));

    let text = TextFormatter::new().format_batch(&batch);
    assert!(text.contains("animals.py\nThis file contains 1 functions and 2 classes."));
    assert!(text.contains("!! "));
}

#[test]
fn models_written_to_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let model = SemanticModelBuilder::new()
        .build(&StructuralRecord::default())
        .unwrap();

    let json_path = dir.path().join("model.json");
    JsonModelFormatter::compact()
        .format_to_file(&model, &json_path)
        .unwrap();
    assert_eq!(fs::read_to_string(&json_path).unwrap(), "[]");

    let puml_path = dir.path().join("model.puml");
    PlantUmlFormatter::new()
        .format_to_file(&model, &puml_path)
        .unwrap();
    assert_eq!(fs::read_to_string(&puml_path).unwrap(), "@startuml\n@enduml");
}

#[test]
fn json_document_keys_become_nested_classes() {
    let document: Value = serde_json::from_str(
        r#"{
            "person": {"name": "Ada", "address": {"city": "London"}},
            "tags": [{"id": 1}, {"label": "x"}],
            "count": 3
        }"#,
    )
    .unwrap();

    assert_eq!(
        PlantUmlFormatter::new().format_json(&document),
        "@startuml\n\
         class person {\n\
         \x20 class name {\n\
         \x20 }\n\
         \x20 class address {\n\
         \x20   class city {\n\
         \x20   }\n\
         \x20 }\n\
         }\n\
         class tags {\n\
         \x20 class id {\n\
         \x20 }\n\
         \x20 class label {\n\
         \x20 }\n\
         }\n\
         class count {\n\
         }\n\
         @enduml"
    );
}

#[test]
fn json_scalars_and_top_level_arrays() {
    let formatter = PlantUmlFormatter::new();
    assert_eq!(formatter.format_json(&serde_json::json!(42)), "@startuml\n@enduml");
    assert_eq!(
        formatter.format_json(&serde_json::json!([{"a": []}, {"b c": null}])),
        "@startuml\nclass a {\n}\nclass \"b c\" {\n}\n@enduml"
    );
}
