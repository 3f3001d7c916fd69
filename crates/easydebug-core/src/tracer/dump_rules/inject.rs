/*!
# Dump Injection

Follows every binding statement with one helper call per bound identifier.
*/

use tracing::{debug, warn};

use crate::ast::{DeclKind, DumpCall, SourceFile, Stmt, StmtKind, ToSource};
use crate::errors::Result;
use crate::tracer::rules::StatementRule;
use crate::tracer::TransformSummary;
use crate::{HELPER_NAME, HELPER_SOURCE};

/// Inserts `dmp("name", name)` after each binding, left to right, and
/// appends the helper definition once per file.
///
/// Blank and non-identifier targets (`_`, `s.f`, `a[i]`, `*p`) get no dump.
#[derive(Debug, Default)]
pub struct InjectDumps;

impl InjectDumps {
    pub fn new() -> Self {
        Self
    }
}

impl StatementRule for InjectDumps {
    fn name(&self) -> &'static str {
        "InjectDumps"
    }

    fn description(&self) -> &'static str {
        "Inserts a helper call after every binding for each bound identifier"
    }

    fn apply(&self, stmt: Stmt, summary: &mut TransformSummary, out: &mut Vec<Stmt>) -> Result<()> {
        let names: Vec<String> = match &stmt.kind {
            StmtKind::Assign(assign) => assign.bound_names().map(str::to_string).collect(),
            _ => {
                out.push(stmt);
                return Ok(());
            }
        };

        let mut anchor = stmt.span.end;
        out.push(stmt);

        for name in names {
            if name == HELPER_NAME {
                // dmp("dmp", dmp) would call the shadowing variable
                warn!(name = %name, "binding shadows the dump helper, not instrumented");
                continue;
            }
            let dump = DumpCall::after(anchor, &name)?;
            anchor = dump.span.end;
            out.push(dump);
            summary.dumps_inserted += 1;
        }

        Ok(())
    }

    fn finish_file(&self, file: &mut SourceFile, summary: &mut TransformSummary) -> Result<()> {
        if file.declares(HELPER_NAME) {
            warn!("file already defines {HELPER_NAME}, appending another definition");
        }

        let imports_fmt = file.decls.iter().any(|decl| match &decl.kind {
            DeclKind::Other(text) => {
                text.first.starts_with("import") && text.to_source().contains("\"fmt\"")
            }
            _ => false,
        });
        if !imports_fmt {
            warn!("{HELPER_NAME} prints with fmt.Printf but the file does not import \"fmt\"");
        }

        summary.helpers_appended += 1;
        debug!(dumps = summary.dumps_inserted, "injection finished");
        Ok(())
    }

    fn epilogue(&self) -> Option<&'static str> {
        Some(HELPER_SOURCE)
    }
}
