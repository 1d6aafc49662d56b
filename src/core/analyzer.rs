use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{FileScanner, SemanticModel, SemanticModelBuilder, StructuralRecord, StructureExtractor};
use crate::config::{AnalyzerConfig, CacheMode};
use crate::error::{AnalysisError, AnalysisResult};
use crate::parsers::{cache::ParseCache, common::read_source, ParserFactory};

/// Semantic model of one analysed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub language: String,
    pub model: SemanticModel,
}

#[derive(Debug)]
pub struct AnalysisFailure {
    pub path: PathBuf,
    pub error: AnalysisError,
}

/// Outcome of analysing a directory; one bad file never hides the others.
#[derive(Debug, Default)]
pub struct BatchAnalysis {
    pub files: Vec<FileAnalysis>,
    pub failures: Vec<AnalysisFailure>,
    pub cache_hits: usize,
}

pub struct FileAnalyzer {
    file_scanner: FileScanner,
    parser_factory: ParserFactory,
    extractor: StructureExtractor,
    builder: SemanticModelBuilder,
    parse_cache: Option<ParseCache>,
}

impl FileAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let parse_cache = match config.cache {
            CacheMode::Disabled => None,
            CacheMode::Default => Some(Self::open_cache(None)),
            CacheMode::Directory(dir) => Some(Self::open_cache(Some(dir))),
        };

        Self {
            file_scanner: FileScanner::new(),
            parser_factory: ParserFactory::new(),
            extractor: StructureExtractor::with_options(config.extract),
            builder: SemanticModelBuilder::new(),
            parse_cache,
        }
    }

    fn open_cache(dir: Option<PathBuf>) -> ParseCache {
        ParseCache::new(dir).unwrap_or_else(|err| {
            warn!("failed to initialize disk parse cache: {err}");
            ParseCache::in_memory_only()
        })
    }

    pub fn parse_cache(&self) -> Option<&ParseCache> {
        self.parse_cache.as_ref()
    }

    /// Extract the structural record of in-memory source text.
    pub fn extract_source(&self, source: &str, language: &str) -> AnalysisResult<StructuralRecord> {
        let parser = self.parser_factory.get_parser(language)?;
        let unit = parser.parse_source(source)?;
        Ok(self.extractor.extract(&unit))
    }

    pub fn analyze_source(&self, source: &str, language: &str) -> AnalysisResult<SemanticModel> {
        let record = self.extract_source(source, language)?;
        Ok(self.builder.build(&record)?)
    }

    pub fn analyze_file(&self, path: &Path) -> AnalysisResult<FileAnalysis> {
        let language = FileScanner::language_for_path(path).ok_or_else(|| {
            AnalysisError::UnsupportedLanguage(
                path.extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            )
        })?;
        self.analyze_file_as(path, language).map(|(analysis, _)| analysis)
    }

    /// Analyse a single file or every supported file below a directory.
    pub fn analyze_path(&self, path: &Path) -> AnalysisResult<BatchAnalysis> {
        if path.is_dir() {
            return self.analyze_directory(path);
        }

        let mut batch = BatchAnalysis::default();
        batch.files.push(self.analyze_file(path)?);
        Ok(batch)
    }

    pub fn analyze_directory(&self, root_path: &Path) -> AnalysisResult<BatchAnalysis> {
        let files = self.file_scanner.scan_directory(root_path)?;
        info!(root = %root_path.display(), files = files.len(), "analysing directory");

        let results: Vec<_> = files
            .par_iter()
            .map(|file| (file, self.analyze_file_as(&file.path, &file.language)))
            .collect();

        let mut batch = BatchAnalysis::default();
        for (file, result) in results {
            match result {
                Ok((analysis, cached)) => {
                    batch.cache_hits += usize::from(cached);
                    batch.files.push(analysis);
                }
                Err(error) => {
                    warn!(path = %file.path.display(), "skipping file: {error}");
                    batch.failures.push(AnalysisFailure {
                        path: file.path.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            analysed = batch.files.len(),
            failed = batch.failures.len(),
            cache_hits = batch.cache_hits,
            "directory analysis complete"
        );
        Ok(batch)
    }

    fn analyze_file_as(&self, path: &Path, language: &str) -> AnalysisResult<(FileAnalysis, bool)> {
        let (record, cached) = match self.cached_record(path) {
            Some(record) => (record, true),
            None => {
                let source = read_source(path)?;
                let record = self.extract_source(&source, language)?;
                self.remember(path, &record);
                (record, false)
            }
        };

        debug!(path = %path.display(), cached, "extracted structural record");
        let model = self.builder.build(&record)?;
        Ok((
            FileAnalysis {
                path: path.to_path_buf(),
                language: language.to_string(),
                model,
            },
            cached,
        ))
    }

    fn cached_record(&self, path: &Path) -> Option<StructuralRecord> {
        let cache = self.parse_cache.as_ref()?;
        let options = self.extractor.options();
        match cache.needs_update(path, &options) {
            Ok(false) => cache.get(path, &options),
            Ok(true) => None,
            Err(err) => {
                warn!(path = %path.display(), "failed to validate cache entry: {err}");
                None
            }
        }
    }

    fn remember(&self, path: &Path, record: &StructuralRecord) {
        if let Some(cache) = &self.parse_cache {
            if let Err(err) = cache.store(path, record, &self.extractor.options()) {
                warn!(path = %path.display(), "failed to cache record: {err}");
            }
        }
    }
}

impl Default for FileAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
