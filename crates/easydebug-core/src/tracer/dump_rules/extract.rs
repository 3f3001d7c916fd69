/*!
# Dump Extraction

Removes helper calls and the helper definition. Recognition is purely by
name, so hand-written calls to the helper go too.
*/

use std::mem;

use tracing::{debug, trace};

use crate::ast::{Decl, SourceFile, Stmt};
use crate::errors::Result;
use crate::tracer::patterns::{HelperCallMatcher, StmtPattern};
use crate::tracer::rules::StatementRule;
use crate::tracer::TransformSummary;
use crate::HELPER_NAME;

/// Drops every direct call of the helper and every file-scope function named
/// like it, along with the comment block sitting directly on top of it.
#[derive(Debug)]
pub struct ExtractDumps {
    matcher: HelperCallMatcher,
}

impl ExtractDumps {
    pub fn new() -> Self {
        Self {
            matcher: HelperCallMatcher::new(HELPER_NAME),
        }
    }
}

impl Default for ExtractDumps {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementRule for ExtractDumps {
    fn name(&self) -> &'static str {
        "ExtractDumps"
    }

    fn description(&self) -> &'static str {
        "Removes helper calls and the helper definition"
    }

    fn apply(&self, stmt: Stmt, summary: &mut TransformSummary, out: &mut Vec<Stmt>) -> Result<()> {
        if self.matcher.matches(&stmt) {
            trace!(row = stmt.span.start.row, "removing helper call");
            summary.dumps_removed += 1;
        } else {
            out.push(stmt);
        }
        Ok(())
    }

    fn finish_file(&self, file: &mut SourceFile, summary: &mut TransformSummary) -> Result<()> {
        let decls = mem::take(&mut file.decls);
        let mut kept: Vec<Decl> = Vec::with_capacity(decls.len());

        for decl in decls {
            if !self.matcher.matches_decl(&decl) {
                kept.push(decl);
                continue;
            }

            // Doc comment lines directly above the definition go with it
            let mut attached = !decl.blank_before;
            while attached && kept.last().is_some_and(Decl::is_comment) {
                match kept.pop() {
                    Some(comment) => attached = !comment.blank_before,
                    None => break,
                }
            }
            summary.helpers_removed += 1;
        }

        file.decls = kept;
        debug!(
            dumps = summary.dumps_removed,
            helpers = summary.helpers_removed,
            "extraction finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{render_file, DumpCall, StmtKind};
    use crate::parser::GoParser;
    use crate::tracer::Walker;

    fn extract(source: &str) -> (SourceFile, TransformSummary) {
        let mut file = GoParser::new().unwrap().parse(source).unwrap();
        let rule = ExtractDumps::new();
        let mut walker = Walker::new(&rule);
        walker.transform_file(&mut file).unwrap();
        (file, walker.into_summary())
    }

    #[test]
    fn test_removes_helper_calls() {
        let (file, summary) =
            extract("package main\n\nfunc f() {\n\tx := 1\n\tdmp(\"x\", x)\n\ty := 2\n}\n");
        let body = file.functions().next().unwrap().body.as_ref().unwrap();

        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|stmt| matches!(stmt.kind, StmtKind::Assign(_))));
        assert_eq!(summary.dumps_removed, 1);
    }

    #[test]
    fn test_hand_written_calls_are_removed_too() {
        let (file, summary) = extract(
            "package main\n\nfunc f(v int) {\n\tdmp(\"checkpoint\", v, v+1)\n\tprintln(v)\n}\n",
        );
        let body = file.functions().next().unwrap().body.as_ref().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(summary.dumps_removed, 1);
    }

    #[test]
    fn test_keeps_calls_that_only_mention_the_helper() {
        let (file, summary) = extract(
            "package main\n\nfunc f() {\n\tx := dmp(\"a\")\n\tgo dmp(\"b\")\n\tdefer dmp(\"c\")\n\tobj.dmp(\"d\")\n}\n",
        );
        let body = file.functions().next().unwrap().body.as_ref().unwrap();
        assert_eq!(body.len(), 4);
        assert_eq!(summary.dumps_removed, 0);
    }

    #[test]
    fn test_removes_helper_declaration_and_its_doc_comment() {
        let source = "package main\n\n// keep me\nvar v = 1\n\n// generated from goeasydebug\n// function for data dump\nfunc dmp(valueName string, v ...interface{}) {\n\tprintln(valueName)\n}\n";
        let (file, summary) = extract(source);

        assert_eq!(summary.helpers_removed, 1);
        assert!(!file.declares(HELPER_NAME));
        assert_eq!(render_file(&file).unwrap(), "package main\n\n// keep me\nvar v = 1\n");
    }

    #[test]
    fn test_detached_comment_above_helper_survives() {
        let source = "package main\n\n// unrelated note\n\nfunc dmp(valueName string, v ...interface{}) {\n}\n";
        let (file, _) = extract(source);
        assert_eq!(render_file(&file).unwrap(), "package main\n\n// unrelated note\n");
    }

    #[test]
    fn test_labeled_helper_call_leaves_the_label() {
        let (file, summary) = extract(
            "package main\n\nfunc f(x int) {\nL:\n\tdmp(\"x\", x)\n\tgoto L\n}\n",
        );
        let body = file.functions().next().unwrap().body.as_ref().unwrap();

        assert_eq!(summary.dumps_removed, 1);
        assert!(matches!(&body[0].kind, StmtKind::Labeled(labeled) if labeled.stmt.is_none()));
        assert_eq!(
            render_file(&file).unwrap(),
            "package main\n\nfunc f(x int) {\nL:\n\tgoto L\n}\n"
        );
    }

    #[test]
    fn test_synthesized_dumps_are_removed_without_rendering() {
        let mut file = GoParser::new()
            .unwrap()
            .parse("package main\n\nfunc f() {\n\tx := 1\n}\n")
            .unwrap();
        let body = file.functions_mut().next().unwrap().body.as_mut().unwrap();
        let anchor = body[0].span.end;
        body.push(DumpCall::after(anchor, "x").unwrap());

        let rule = ExtractDumps::new();
        let mut walker = Walker::new(&rule);
        walker.transform_file(&mut file).unwrap();

        let body = file.functions().next().unwrap().body.as_ref().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(walker.summary().dumps_removed, 1);
    }
}
