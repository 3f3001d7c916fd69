use std::path::PathBuf;

use thiserror::Error;

/// Fatal error kinds. Every one of them aborts the run before the target
/// file is replaced.
#[derive(Error, Debug)]
pub enum EasyDebugError {
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Synthesis error: cannot build dump call for `{name}`: {reason}")]
    Synthesis { name: String, reason: String },

    #[error("Format error: {message}")]
    Format { message: String },

    #[error("Filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EasyDebugError {
    /// Create a parse error from a zero-based tree-sitter point
    pub fn parse_at(point: tree_sitter::Point, message: impl Into<String>) -> Self {
        Self::Parse {
            line: point.row + 1,
            column: point.column + 1,
            message: message.into(),
        }
    }

    pub fn synthesis(name: &str, reason: impl Into<String>) -> Self {
        Self::Synthesis {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type for easydebug operations
pub type Result<T> = std::result::Result<T, EasyDebugError>;
