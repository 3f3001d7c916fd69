//! # Easydebug Core
//!
//! Syntax-tree engine behind the `easydebug` tool:
//! - A statement-level tree for Go source files
//! - A tree-sitter backed parser that lowers Go source into that tree
//! - A source generator that renders the tree back to text
//! - Transformation rules that inject value dumps after every binding and
//!   strip them back out again
//!
//! The engine works on one file at a time. Injection followed by extraction
//! gives back the original statement sequence.

#![warn(clippy::all)]

pub mod ast;
pub mod errors;
pub mod parser;
pub mod tracer;

use std::path::PathBuf;

// Re-export commonly used types
pub use ast::{Decl, DeclKind, DumpCall, FuncDecl, SourceFile, Stmt, StmtKind, Target, ToSource};
pub use errors::{EasyDebugError, Result};
pub use parser::GoParser;
pub use tracer::{FileTracer, TransformSummary};

/// Easydebug version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the generated dump helper. It is also the only marker used to
/// recognise dump calls during extraction.
pub const HELPER_NAME: &str = "dmp";

/// Helper definition appended verbatim after the rendered file on injection.
pub const HELPER_SOURCE: &str = r#"
// generated from goeasydebug
// function for data dump
func dmp(valueName string, v ...interface{}) {
	for _, vv := range v {
		// arrange debug as you like
		fmt.Printf("%s: %#v\n", valueName, vv)
	}
}
"#;

/// Initialize tracing for easydebug components
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["easydebug_core=info", "easydebug=info"] {
        let directive: tracing_subscriber::filter::Directive = directive
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into());
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

/// What a run does to the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Insert a dump call after every binding and append the helper
    Inject,
    /// Remove every helper call and the helper definition
    Extract,
}

impl Mode {
    /// Map the numeric command-line mode. Unknown numbers map to `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Mode::Inject),
            1 => Some(Mode::Extract),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Inject => "inject",
            Mode::Extract => "extract",
        }
    }
}

/// Run configuration, built once at startup and passed down by reference
#[derive(Debug, Clone)]
pub struct EasyDebugConfig {
    /// Transformation to apply
    pub mode: Mode,
    /// Go source file rewritten in place
    pub target: PathBuf,
    /// Directory for the staging file. Defaults to the target's own
    /// directory so the final rename never crosses filesystems.
    pub temp_dir: Option<PathBuf>,
}

impl Default for EasyDebugConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Inject,
            target: PathBuf::new(),
            temp_dir: None,
        }
    }
}

impl EasyDebugConfig {
    pub fn new(mode: Mode, target: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}
