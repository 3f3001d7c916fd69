/*!
# FileTracer - File Rewrite Driver

Parses one Go file, applies the mode's rule, renders the result and
replaces the file atomically. The target is only ever touched by the final
rename, so any failure leaves it byte-identical.
*/

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ast::render_file;
use crate::errors::{EasyDebugError, Result};
use crate::parser::GoParser;
use crate::{EasyDebugConfig, Mode};

use super::rules::rule_for;
use super::walker::Walker;
use super::TransformSummary;

/// Prefix of the staging file created next to the target
const TEMP_PREFIX: &str = ".easydebug-";

pub struct FileTracer {
    parser: GoParser,
}

impl FileTracer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: GoParser::new()?,
        })
    }

    /// Transform the configured file in place
    pub fn run(&mut self, config: &EasyDebugConfig) -> Result<TransformSummary> {
        let target = config.target.as_path();
        info!(mode = config.mode.name(), file = %target.display(), "transforming file");

        let source =
            fs::read_to_string(target).map_err(|e| EasyDebugError::filesystem(target, e))?;
        let (output, summary) = self.transform_source(&source, config.mode)?;

        let staging = staging_dir(config);
        replace_atomically(target, &staging, &output)?;

        info!(
            functions = summary.functions_visited,
            inserted = summary.dumps_inserted,
            removed = summary.dumps_removed,
            helpers_appended = summary.helpers_appended,
            helpers_removed = summary.helpers_removed,
            "rewrote {}",
            target.display()
        );
        Ok(summary)
    }

    /// Parse, transform and render source text without touching the disk
    pub fn transform_source(&mut self, source: &str, mode: Mode) -> Result<(String, TransformSummary)> {
        let mut file = self.parser.parse(source)?;

        let rule = rule_for(mode);
        debug!(rule = rule.name(), "{}", rule.description());
        let mut walker = Walker::new(rule.as_ref());
        walker.transform_file(&mut file)?;
        let summary = walker.into_summary();

        let mut output = render_file(&file)?;
        if let Some(epilogue) = rule.epilogue() {
            output.push_str(epilogue);
        }

        // Never hand back text that would not parse again
        if !self.parser.is_well_formed(&output) {
            return Err(EasyDebugError::format(format!(
                "{} produced source that no longer parses",
                rule.name()
            )));
        }

        debug!(rule = rule.name(), bytes = output.len(), "rendered file");
        Ok((output, summary))
    }
}

fn staging_dir(config: &EasyDebugConfig) -> PathBuf {
    if let Some(dir) = &config.temp_dir {
        return dir.clone();
    }
    match config.target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write `contents` to a fresh file in `staging`, then rename it over
/// `target`. The staging file is deleted if anything fails before the rename.
fn replace_atomically(target: &Path, staging: &Path, contents: &str) -> Result<()> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".go")
        .tempfile_in(staging)
        .map_err(|e| EasyDebugError::filesystem(staging, e))?;
    debug!(temp = %temp.path().display(), "staging output");

    temp.write_all(contents.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| EasyDebugError::filesystem(temp.path(), e))?;

    // Staging files are created owner-only; keep the target's mode instead
    let permissions = fs::metadata(target)
        .map_err(|e| EasyDebugError::filesystem(target, e))?
        .permissions();
    fs::set_permissions(temp.path(), permissions)
        .map_err(|e| EasyDebugError::filesystem(temp.path(), e))?;

    temp.persist(target)
        .map_err(|e| EasyDebugError::filesystem(target, e.error))?;
    Ok(())
}
