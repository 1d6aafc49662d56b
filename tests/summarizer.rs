use async_trait::async_trait;
use filelens::collaborators::{
    build_prompt, summarize_model, ChatCompletionSummarizer, SummarizeError, Summarizer,
    SummarizerConfig,
};
use filelens::config::{AnalyzerConfig, CacheMode};
use filelens::core::{FileAnalyzer, SemanticEntity, SemanticModel};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model(code: &str) -> SemanticModel {
    FileAnalyzer::with_config(AnalyzerConfig::new().with_cache(CacheMode::Disabled))
        .analyze_source(code, "python")
        .unwrap()
}

fn animals() -> SemanticModel {
    model("class Dog(Animal, Pet):\n    def bark(self, loud): pass\n    def sit(self): pass\n\ndef greet(name, greeting): pass\n")
}

fn config_for(server: &MockServer) -> SummarizerConfig {
    SummarizerConfig::new("test-key").with_api_base(format!("{}/v1", server.uri()))
}

#[test]
fn class_prompt_lists_bases_and_methods() {
    let model = animals();
    let dog = model.classes().next().unwrap();
    assert_eq!(
        build_prompt(dog),
        "Summarize the following class for documentation purposes:\n\n\
         Class Name: Dog\n\
         Base Classes: Animal, Pet\n\
         Methods:\n\
         - bark(self, loud)\n\
         - sit(self)\n"
    );
}

#[test]
fn class_prompt_without_bases() {
    let model = model("class Plain:\n    pass\n");
    assert_eq!(
        build_prompt(&model.entities()[0]),
        "Summarize the following class for documentation purposes:\n\n\
         Class Name: Plain\nBase Classes: no base class\nMethods:\n"
    );
}

#[test]
fn function_prompt_shows_signature() {
    let model = animals();
    let greet = model.functions().next().unwrap();
    assert_eq!(
        build_prompt(greet),
        "Summarize the purpose of the following function:\nFunction: greet(name, greeting)"
    );
}

#[test]
fn empty_api_key_is_rejected() {
    let result = ChatCompletionSummarizer::new(SummarizerConfig::new("  "));
    assert!(matches!(result, Err(SummarizeError::MissingApiKey)));
}

#[tokio::test]
async fn chat_completion_returns_trimmed_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "gpt-3.5-turbo", "temperature": 0.5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Greets someone.\n"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summarizer = ChatCompletionSummarizer::new(config_for(&server)).unwrap();
    let model = animals();
    let greet = model.functions().next().unwrap();

    assert_eq!(summarizer.summarize(greet).await.unwrap(), "Greets someone.");
}

#[tokio::test]
async fn backend_errors_surface_as_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let summarizer = ChatCompletionSummarizer::new(config_for(&server)).unwrap();
    let model = animals();

    match summarizer.summarize(&model.entities()[0]).await {
        Err(SummarizeError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn blank_reply_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        })))
        .mount(&server)
        .await;

    let summarizer = ChatCompletionSummarizer::new(config_for(&server)).unwrap();
    let model = animals();

    assert!(matches!(
        summarizer.summarize(&model.entities()[0]).await,
        Err(SummarizeError::EmptyResponse)
    ));
}

struct ClassesOnly;

#[async_trait]
impl Summarizer for ClassesOnly {
    async fn summarize(&self, entity: &SemanticEntity) -> Result<String, SummarizeError> {
        if entity.is_class() {
            Ok(format!("{} is a class", entity.name))
        } else {
            Err(SummarizeError::EmptyResponse)
        }
    }
}

#[tokio::test]
async fn one_failed_entity_does_not_stop_the_rest() {
    let model = model("def first(): pass\n\nclass A:\n    pass\n\nclass B:\n    pass\n");

    let summaries = summarize_model(&ClassesOnly, &model).await;

    let names: Vec<_> = summaries
        .iter()
        .map(|s| (s.name.as_str(), s.entity_type))
        .collect();
    assert_eq!(names, vec![("A", "class"), ("B", "class"), ("first", "function")]);
    assert_eq!(summaries[0].outcome.as_deref().unwrap(), "A is a class");
    assert_eq!(summaries[1].outcome.as_deref().unwrap(), "B is a class");
    assert!(summaries[2].outcome.is_err());
}
