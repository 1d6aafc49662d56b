use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use filelens::collaborators::{
    summarize_model, ChatCompletionSummarizer, DiagramOutput, DiagramWriter, PlantUmlRenderer,
    RendererConfig, SummarizerConfig,
};
use filelens::config::{AnalyzerConfig, CacheMode, ExtractOptions, ParameterPolicy};
use filelens::core::{BatchAnalysis, FileAnalyzer, FileScanner, JsonDocument};
use filelens::formatters::{JsonModelFormatter, PlantUmlFormatter, TextFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "filelens",
    version,
    author = "filelens developers",
    about = "Extract classes, methods and functions from source files into a semantic model"
)]
struct Cli {
    /// Source file or directory to analyze (a `.json` file is drawn as nested classes)
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format: json, json-compact, text, plantuml
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Keep positional-only, *args, keyword-only and **kwargs parameters
    #[arg(long)]
    all_params: bool,

    /// Disable the parse cache
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// Directory for the on-disk parse cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Write a PlantUML diagram per analysed file into this directory
    #[arg(long, value_name = "DIR")]
    diagram_dir: Option<PathBuf>,

    /// PlantUML jar used to render diagrams
    #[arg(long, value_name = "JAR", default_value = "plantuml.jar")]
    plantuml_jar: PathBuf,

    /// Java executable used to run PlantUML
    #[arg(long, value_name = "PATH", default_value = "java")]
    java: PathBuf,

    /// Ask an LLM for a prose summary of every entity
    #[arg(long)]
    summarize: bool,

    /// API key for the summarization backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model used for summaries
    #[arg(long, default_value = filelens::collaborators::summarizer::DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = filelens::collaborators::summarizer::DEFAULT_API_BASE)]
    api_base: String,

    /// Sampling temperature for summaries
    #[arg(long, default_value_t = filelens::collaborators::summarizer::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Json,
    JsonCompact,
    Text,
    Plantuml,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("filelens={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if cli.input.is_file() && FileScanner::is_json_document(&cli.input) {
        return run_json_document(&cli).await;
    }

    let start_time = Instant::now();

    let policy = if cli.all_params {
        ParameterPolicy::All
    } else {
        ParameterPolicy::Positional
    };
    let cache = match (&cli.cache_dir, cli.no_cache) {
        (_, true) => CacheMode::Disabled,
        (Some(dir), false) => CacheMode::Directory(dir.clone()),
        (None, false) => CacheMode::Default,
    };
    let config = AnalyzerConfig::new()
        .with_extract_options(ExtractOptions::default().with_parameter_policy(policy))
        .with_cache(cache);

    let analyzer = FileAnalyzer::with_config(config);
    let single_file = !cli.input.is_dir();

    // Analysis is CPU-bound and may fan out over rayon.
    let input = cli.input.clone();
    let batch = tokio::task::spawn_blocking(move || analyzer.analyze_path(&input))
        .await
        .context("analysis task panicked")?
        .with_context(|| format!("failed to analyze {}", cli.input.display()))?;

    info!(
        files = batch.files.len(),
        failures = batch.failures.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "analysis complete"
    );

    let rendered = render_output(&batch, cli.format, single_file)?;
    emit(&rendered, cli.output.as_deref())?;

    if let Some(dir) = &cli.diagram_dir {
        write_diagrams(&batch, dir, &cli).await?;
    }

    if cli.summarize {
        print_summaries(&batch, &cli).await?;
    }

    if !batch.failures.is_empty() {
        warn!("{} file(s) could not be analysed", batch.failures.len());
    }

    Ok(())
}

fn render_output(batch: &BatchAnalysis, format: OutputFormat, single_file: bool) -> Result<String> {
    let single = batch.files.first().filter(|_| single_file);
    Ok(match (format, single) {
        (OutputFormat::Json, Some(file)) => JsonModelFormatter::new().format_model(&file.model)?,
        (OutputFormat::Json, None) => JsonModelFormatter::new().format_batch(batch)?,
        (OutputFormat::JsonCompact, Some(file)) => {
            JsonModelFormatter::compact().format_model(&file.model)?
        }
        (OutputFormat::JsonCompact, None) => JsonModelFormatter::compact().format_batch(batch)?,
        (OutputFormat::Text, Some(file)) => TextFormatter::new().format_model(&file.model),
        (OutputFormat::Text, None) => TextFormatter::new().format_batch(batch),
        (OutputFormat::Plantuml, _) => batch
            .files
            .iter()
            .map(|file| PlantUmlFormatter::new().format_model(&file.model))
            .collect::<Vec<_>>()
            .join("\n\n"),
    })
}

/// A lone JSON document has no semantic model; its only view is the diagram.
async fn run_json_document(cli: &Cli) -> Result<()> {
    let document = JsonDocument::load(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    let diagram = PlantUmlFormatter::new().format_json(&document.value);
    emit(&diagram, cli.output.as_deref())?;

    if let Some(dir) = &cli.diagram_dir {
        let writer = diagram_writer(dir, cli);
        report(writer.write(&document.path, &diagram).await?);
    }
    if cli.summarize {
        warn!("summaries are only produced for source files");
    }
    Ok(())
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote output");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn diagram_writer(dir: &Path, cli: &Cli) -> DiagramWriter {
    let renderer = PlantUmlRenderer::new(RendererConfig {
        java: cli.java.clone(),
        jar: cli.plantuml_jar.clone(),
    });
    if !renderer.is_available() {
        warn!(
            jar = %cli.plantuml_jar.display(),
            "PlantUML jar not found; writing diagram sources only"
        );
    }

    let input_root = if cli.input.is_dir() {
        cli.input.clone()
    } else {
        cli.input.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    DiagramWriter::new(dir.to_path_buf(), input_root, renderer)
}

fn report(output: DiagramOutput) {
    match output.image {
        Some(image) => println!("Diagram: {}", image.display()),
        None => println!("Diagram source: {}", output.source.display()),
    }
}

async fn write_diagrams(batch: &BatchAnalysis, dir: &Path, cli: &Cli) -> Result<()> {
    let writer = diagram_writer(dir, cli);
    let formatter = PlantUmlFormatter::new();

    for file in &batch.files {
        let output = writer
            .write(&file.path, &formatter.format_model(&file.model))
            .await
            .with_context(|| format!("failed to write diagram for {}", file.path.display()))?;
        report(output);
    }

    if cli.input.is_dir() {
        for path in FileScanner::new().scan_json_documents(&cli.input)? {
            let document = match JsonDocument::load(&path) {
                Ok(document) => document,
                Err(err) => {
                    warn!(path = %path.display(), "skipping JSON document: {err}");
                    continue;
                }
            };
            let output = writer
                .write(&path, &formatter.format_json(&document.value))
                .await
                .with_context(|| format!("failed to write diagram for {}", path.display()))?;
            report(output);
        }
    }

    Ok(())
}

async fn print_summaries(batch: &BatchAnalysis, cli: &Cli) -> Result<()> {
    let api_key = cli
        .api_key
        .clone()
        .context("--summarize needs an API key (--api-key or OPENAI_API_KEY)")?;
    let config = SummarizerConfig::new(api_key)
        .with_model(cli.model.clone())
        .with_api_base(cli.api_base.clone())
        .with_temperature(cli.temperature);
    let summarizer = ChatCompletionSummarizer::new(config)?;

    for file in &batch.files {
        println!("\n# Summaries for {}", file.path.display());
        for summary in summarize_model(&summarizer, &file.model).await {
            match summary.outcome {
                Ok(text) => println!("\n## {} {}\n{}", summary.entity_type, summary.name, text),
                Err(err) => println!("\n## {} {}\n(summary unavailable: {})", summary.entity_type, summary.name, err),
            }
        }
    }

    Ok(())
}
