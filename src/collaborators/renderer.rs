use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub java: PathBuf,
    pub jar: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: PathBuf::from("plantuml.jar"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PlantUML jar not found at {}", .0.display())]
    JarNotFound(PathBuf),

    #[error("failed to launch {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PlantUML failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("PlantUML reported success but {} was not written", .0.display())]
    MissingOutput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs `java -jar plantuml.jar <file>.puml`, producing `<file>.png` next to the source.
pub struct PlantUmlRenderer {
    config: RendererConfig,
}

impl PlantUmlRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn is_available(&self) -> bool {
        self.config.jar.is_file()
    }

    pub async fn render(&self, puml_path: &Path) -> Result<PathBuf, RenderError> {
        if !self.is_available() {
            return Err(RenderError::JarNotFound(self.config.jar.clone()));
        }

        debug!(source = %puml_path.display(), "invoking PlantUML");
        let output = Command::new(&self.config.java)
            .arg("-jar")
            .arg(&self.config.jar)
            .arg(puml_path)
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                program: self.config.java.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let image = puml_path.with_extension("png");
        if !image.is_file() {
            return Err(RenderError::MissingOutput(image));
        }
        info!(image = %image.display(), "rendered diagram");
        Ok(image)
    }

    /// Write `source` to `puml_path` and render it.
    pub async fn write_and_render(
        &self,
        source: &str,
        puml_path: &Path,
    ) -> Result<PathBuf, RenderError> {
        tokio::fs::write(puml_path, source).await?;
        self.render(puml_path).await
    }
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}
