use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub language: String,
}

/// Directories that never hold sources worth analysing.
const SKIPPED_DIRS: &[&str] = &[".git", "__pycache__", ".venv", "venv", "node_modules", ".tox"];

pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect every supported source file under `root_path`, sorted by path.
    pub fn scan_directory(&self, root_path: &Path) -> AnalysisResult<Vec<FileInfo>> {
        let entries = self.walk(root_path)?;

        let mut files: Vec<FileInfo> = entries
            .par_iter()
            .filter_map(|path| {
                Self::language_for_path(path).map(|language| FileInfo {
                    path: path.clone(),
                    language: language.to_string(),
                })
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Collect every `.json` document under `root_path`, sorted by path.
    pub fn scan_json_documents(&self, root_path: &Path) -> AnalysisResult<Vec<PathBuf>> {
        let mut documents: Vec<PathBuf> = self
            .walk(root_path)?
            .into_par_iter()
            .filter(|path| Self::is_json_document(path))
            .collect();
        documents.sort();
        Ok(documents)
    }

    pub fn is_json_document(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some("json")
    }

    fn walk(&self, root_path: &Path) -> AnalysisResult<Vec<PathBuf>> {
        fs::metadata(root_path).map_err(|source| AnalysisError::Io {
            path: root_path.to_path_buf(),
            source,
        })?;

        Ok(WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !SKIPPED_DIRS
                        .iter()
                        .any(|skipped| entry.file_name() == *skipped)
            })
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect())
    }

    /// Language name for a file, judged by its extension.
    pub fn language_for_path(path: &Path) -> Option<&'static str> {
        match path.extension().and_then(|ext| ext.to_str())? {
            "py" | "pyi" | "pyw" => Some("python"),
            _ => None,
        }
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
