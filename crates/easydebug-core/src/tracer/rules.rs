/*!
# Transformation Rules

Core trait for the per-statement half of a transformation.
*/

use crate::ast::{SourceFile, Stmt};
use crate::errors::Result;
use crate::Mode;

use super::dump_rules::{ExtractDumps, InjectDumps};
use super::TransformSummary;

/// A rewrite applied by the [`Walker`](super::Walker)
///
/// The walker owns recursion into compound statements. A rule only ever sees
/// statements that have no nested body and decides what to push in their
/// place: the statement itself, nothing, or the statement plus extra ones.
pub trait StatementRule {
    /// Human-readable name for this rule
    fn name(&self) -> &'static str;

    /// What this rule does
    fn description(&self) -> &'static str;

    /// Handle one non-compound statement
    fn apply(&self, stmt: Stmt, summary: &mut TransformSummary, out: &mut Vec<Stmt>) -> Result<()>;

    /// File-scope pass, run once after every function body has been walked
    fn finish_file(&self, file: &mut SourceFile, summary: &mut TransformSummary) -> Result<()> {
        let _ = (file, summary);
        Ok(())
    }

    /// Text appended verbatim after the rendered file
    fn epilogue(&self) -> Option<&'static str> {
        None
    }
}

/// The rule implementing a mode
pub fn rule_for(mode: Mode) -> Box<dyn StatementRule> {
    match mode {
        Mode::Inject => Box::new(InjectDumps::new()),
        Mode::Extract => Box::new(ExtractDumps::new()),
    }
}
