/*!
# Statement Pattern Matching

Recognition of dump calls for extraction. The helper's name is the only
marker: a hand-written call to it is indistinguishable from an injected one
and is removed just the same.
*/

use crate::ast::{Decl, DeclKind, Stmt, StmtKind};

/// Pattern matcher for statements
pub trait StmtPattern {
    /// Check if this pattern matches the given statement
    fn matches(&self, stmt: &Stmt) -> bool;
}

/// Matches expression statements that call the helper directly by name,
/// and synthesized dump statements not yet rendered
#[derive(Debug, Clone)]
pub struct HelperCallMatcher {
    name: String,
}

impl HelperCallMatcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Matches the helper's own function declaration
    pub fn matches_decl(&self, decl: &Decl) -> bool {
        matches!(&decl.kind, DeclKind::Func(func) if func.name == self.name)
    }
}

impl StmtPattern for HelperCallMatcher {
    fn matches(&self, stmt: &Stmt) -> bool {
        match &stmt.kind {
            StmtKind::Expr(expr) => expr.calls(&self.name),
            StmtKind::Dump(call) => call.helper == self.name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DumpCall, ExprStmt, Pos, Span, Verbatim};
    use crate::HELPER_NAME;

    fn expr(text: &str, callee: Option<&str>) -> Stmt {
        Stmt::new(
            StmtKind::Expr(ExprStmt {
                text: Verbatim::single(text),
                callee: callee.map(str::to_string),
            }),
            Span::default(),
        )
    }

    #[test]
    fn test_matches_direct_helper_call() {
        let matcher = HelperCallMatcher::new(HELPER_NAME);
        assert!(matcher.matches(&expr("dmp(\"x\", x)", Some("dmp"))));
    }

    #[test]
    fn test_ignores_other_calls() {
        let matcher = HelperCallMatcher::new(HELPER_NAME);
        assert!(!matcher.matches(&expr("fmt.Println(x)", None)));
        assert!(!matcher.matches(&expr("dump(x)", Some("dump"))));
    }

    #[test]
    fn test_matches_synthesized_dump() {
        let matcher = HelperCallMatcher::new(HELPER_NAME);
        let dump = DumpCall::after(Pos::default(), "x").unwrap();
        assert!(matcher.matches(&dump));
    }
}
