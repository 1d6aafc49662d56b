use std::path::{Path, PathBuf};
use tracing::warn;

use super::renderer::{PlantUmlRenderer, RenderError};

/// Where one diagram ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutput {
    pub source: PathBuf,
    /// Rendered image, when PlantUML is available and succeeded.
    pub image: Option<PathBuf>,
}

/// Writes one `.puml` per input file under `out_dir`, mirroring the input
/// tree so that `a/__init__.py` and `b/__init__.py` never share a diagram.
pub struct DiagramWriter {
    out_dir: PathBuf,
    input_root: PathBuf,
    renderer: PlantUmlRenderer,
}

impl DiagramWriter {
    /// `input_root` is the analysed directory, or the parent of an analysed file.
    pub fn new(out_dir: PathBuf, input_root: PathBuf, renderer: PlantUmlRenderer) -> Self {
        Self {
            out_dir,
            input_root,
            renderer,
        }
    }

    /// `<out_dir>/<path relative to the input root>.puml`; the source
    /// extension is kept so `m.py` and `m.json` stay apart.
    pub fn diagram_path(&self, source: &Path) -> PathBuf {
        let relative = source
            .strip_prefix(&self.input_root)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| source.file_name().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("diagram"));

        let mut name = relative.into_os_string();
        name.push(".puml");
        self.out_dir.join(name)
    }

    pub fn renderer(&self) -> &PlantUmlRenderer {
        &self.renderer
    }

    /// Write the diagram for `source` and render it when PlantUML is available.
    /// Rendering failures are logged; only failing to write the source is an error.
    pub async fn write(&self, source: &Path, diagram: &str) -> Result<DiagramOutput, RenderError> {
        let puml_path = self.diagram_path(source);
        if let Some(parent) = puml_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&puml_path, diagram).await?;

        let image = if self.renderer.is_available() {
            match self.renderer.render(&puml_path).await {
                Ok(image) => Some(image),
                Err(err) => {
                    warn!(source = %puml_path.display(), "diagram rendering failed: {err}");
                    None
                }
            }
        } else {
            None
        };

        Ok(DiagramOutput {
            source: puml_path,
            image,
        })
    }
}
