// Errors reported while compiling one module

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Optional source line attached to a compile error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext(pub Option<u32>);

impl fmt::Display for LineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, "line {}: ", line),
            None => Ok(()),
        }
    }
}

/// Fatal errors for the module being compiled. Neither kind is recoverable
/// within the module; the caller aborts it and may carry on with others.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("{line}{message}")]
    Parse { line: LineContext, message: String },
    #[error("{line}{message}")]
    Import { line: LineContext, message: String },
}

impl CompileError {
    pub fn parse(line: Option<u32>, message: impl Into<String>) -> Self {
        CompileError::Parse {
            line: LineContext(line),
            message: message.into(),
        }
    }

    pub fn import(line: Option<u32>, message: impl Into<String>) -> Self {
        CompileError::Import {
            line: LineContext(line),
            message: message.into(),
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            CompileError::Parse { line, .. } | CompileError::Import { line, .. } => line.0,
        }
    }

    pub fn is_import_error(&self) -> bool {
        matches!(self, CompileError::Import { .. })
    }
}

/// Malformed compiler configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid module name '{0}'")]
    ModuleName(String),
    #[error("script path must not be empty")]
    EmptyScript,
}

pub type Result<T> = std::result::Result<T, CompileError>;
