// Compiler configuration: search path, module name and script location

use crate::error::ConfigError;
use crate::resolver::PathResolver;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the search path roots
pub const SEARCH_PATH_ENV: &str = "GOPATH";

/// Configuration for compiling one module. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Search path roots, highest priority first
    #[serde(default)]
    pub search_path: Vec<PathBuf>,

    /// Dotted name of the module being compiled
    pub module_name: String,

    /// Source file of the module being compiled
    pub script: PathBuf,
}

impl CompilerConfig {
    pub fn new(
        search_path: Vec<PathBuf>,
        module_name: impl Into<String>,
        script: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            search_path,
            module_name: module_name.into(),
            script: script.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a config whose search path comes from `$GOPATH`
    pub fn from_env(
        module_name: impl Into<String>,
        script: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let search_path = std::env::var_os(SEARCH_PATH_ENV)
            .map(|raw| parse_search_path(&raw))
            .unwrap_or_default();
        Self::new(search_path, module_name, script)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CompilerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_dotted_name(&self.module_name) {
            return Err(ConfigError::ModuleName(self.module_name.clone()));
        }
        if self.script.as_os_str().is_empty() {
            return Err(ConfigError::EmptyScript);
        }
        Ok(())
    }

    /// Resolver for imports made by this module
    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::new(&self.search_path, &self.module_name, &self.script)
    }
}

/// Split a platform path list (`a:b` on Unix, `a;b` on Windows), dropping empty entries
pub fn parse_search_path<S: AsRef<std::ffi::OsStr> + ?Sized>(raw: &S) -> Vec<PathBuf> {
    std::env::split_paths(raw)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

fn is_dotted_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_alphabetic())
                && chars.all(|c| c == '_' || c.is_alphanumeric())
        })
}
