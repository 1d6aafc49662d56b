use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which declared parameters end up in a function record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParameterPolicy {
    /// Plain positional-or-keyword parameters only.
    #[default]
    Positional,
    /// Every named parameter, including `/`-only, `*args`, keyword-only and `**kwargs`.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    pub parameter_policy: ParameterPolicy,
}

impl ExtractOptions {
    pub fn with_parameter_policy(mut self, policy: ParameterPolicy) -> Self {
        self.parameter_policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheMode {
    Disabled,
    /// Memory plus a disk cache under the system temp directory.
    #[default]
    Default,
    Directory(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub extract: ExtractOptions,
    pub cache: CacheMode,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }
}
