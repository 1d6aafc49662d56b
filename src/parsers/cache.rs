use anyhow::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::warn;

use crate::config::ExtractOptions;
use crate::core::StructuralRecord;

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// Structural record of one file, stamped with the file's modification time and size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFileEntry {
    pub record: StructuralRecord,
    pub options: ExtractOptions,
    pub timestamp: u64,
    pub file_size: u64,
}

/// Thread-safe cache of structural records with memory and (best-effort) disk storage
pub struct ParseCache {
    memory_cache: DashMap<PathBuf, ParsedFileEntry>,
    cache_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl ParseCache {
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let resolved_dir =
            cache_dir.unwrap_or_else(|| std::env::temp_dir().join("filelens_cache"));
        let cache_dir = match fs::create_dir_all(&resolved_dir) {
            Ok(()) => Some(resolved_dir),
            Err(err) => {
                warn!(
                    dir = %resolved_dir.display(),
                    "failed to initialize disk cache: {err}"
                );
                None
            }
        };

        Ok(Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        })
    }

    /// Build an in-memory-only cache without touching the filesystem
    pub fn in_memory_only() -> Self {
        Self {
            memory_cache: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            cache_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    /// Check if the file must be re-extracted: changed on disk, never seen,
    /// or cached under different extraction options
    pub fn needs_update(&self, file_path: &Path, options: &ExtractOptions) -> Result<bool> {
        let (current_timestamp, current_size) = file_stamp(file_path)?;
        let is_stale = |entry: &ParsedFileEntry| {
            entry.timestamp != current_timestamp
                || entry.file_size != current_size
                || entry.options != *options
        };

        if let Some(entry) = self.memory_cache.get(file_path) {
            return Ok(is_stale(&entry));
        }

        if let Some(cache_path) = self.cache_path(file_path) {
            if cache_path.exists() {
                if let Ok(entry) = self.load_from_disk(&cache_path) {
                    return Ok(is_stale(&entry));
                }
            }
        }

        Ok(true)
    }

    /// Get the cached record if one was stored under the same options
    pub fn get(&self, file_path: &Path, options: &ExtractOptions) -> Option<StructuralRecord> {
        if let Some(entry) = self.memory_cache.get(file_path) {
            return (entry.options == *options).then(|| entry.record.clone());
        }

        let cache_path = self.cache_path(file_path)?;
        let entry = self.load_from_disk(&cache_path).ok()?;
        if entry.options != *options {
            return None;
        }
        let record = entry.record.clone();

        if self.memory_cache.len() < self.max_memory_entries {
            self.memory_cache.insert(file_path.to_path_buf(), entry);
        }

        Some(record)
    }

    pub fn store(
        &self,
        file_path: &Path,
        record: &StructuralRecord,
        options: &ExtractOptions,
    ) -> Result<()> {
        let (timestamp, file_size) = file_stamp(file_path)?;

        let entry = ParsedFileEntry {
            record: record.clone(),
            options: *options,
            timestamp,
            file_size,
        };

        if self.memory_cache.len() >= self.max_memory_entries {
            if let Some(entry) = self.memory_cache.iter().next() {
                let key = entry.key().clone();
                drop(entry);
                self.memory_cache.remove(&key);
            }
        }
        self.memory_cache
            .insert(file_path.to_path_buf(), entry.clone());

        if let Some(cache_path) = self.cache_path(file_path) {
            self.store_to_disk(&cache_path, &entry)?;
        }

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.memory_cache.clear();
        if let Some(cache_dir) = &self.cache_dir {
            if cache_dir.exists() {
                fs::remove_dir_all(cache_dir)?;
                fs::create_dir_all(cache_dir)?;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            memory_entries: self.memory_cache.len(),
            disk_entries: self.disk_entry_count(),
        }
    }

    fn cache_path(&self, file_path: &Path) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;

        let mut hasher = DefaultHasher::new();
        file_path.hash(&mut hasher);
        let hash = hasher.finish();

        Some(cache_dir.join(format!("record_{:x}.bincode", hash)))
    }

    fn load_from_disk(&self, cache_path: &Path) -> Result<ParsedFileEntry> {
        let data = fs::read(cache_path)?;
        let entry: ParsedFileEntry = bincode::deserialize(&data)?;
        Ok(entry)
    }

    fn store_to_disk(&self, cache_path: &Path, entry: &ParsedFileEntry) -> Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(cache_path, data)?;
        Ok(())
    }

    fn disk_entry_count(&self) -> usize {
        self.cache_dir
            .as_ref()
            .and_then(|dir| fs::read_dir(dir).ok())
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

fn file_stamp(file_path: &Path) -> Result<(u64, u64)> {
    let metadata = fs::metadata(file_path)?;
    let timestamp = metadata
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    Ok((timestamp, metadata.len()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
}
