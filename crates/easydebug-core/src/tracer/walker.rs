/*!
# Walker - Shared Recursive Statement Walk

Descends into every compound statement kind and delegates everything else
to a [`StatementRule`]. Nesting depth is not limited.
*/

use std::mem;

use tracing::{debug, trace};

use crate::ast::{ElseBranch, IfStmt, SourceFile, Stmt, StmtKind};
use crate::errors::Result;

use super::rules::StatementRule;
use super::TransformSummary;

pub struct Walker<'r> {
    rule: &'r dyn StatementRule,
    summary: TransformSummary,
    depth: usize,
}

impl<'r> Walker<'r> {
    pub fn new(rule: &'r dyn StatementRule) -> Self {
        Self {
            rule,
            summary: TransformSummary::new(),
            depth: 0,
        }
    }

    /// Walk every function body in place, then run the rule's file pass
    pub fn transform_file(&mut self, file: &mut SourceFile) -> Result<()> {
        for func in file.functions_mut() {
            if let Some(body) = func.body.take() {
                debug!(rule = self.rule.name(), function = %func.name, "walking function body");
                func.body = Some(self.walk(body)?);
                self.summary.functions_visited += 1;
            }
        }
        self.rule.finish_file(file, &mut self.summary)
    }

    /// Rewrite one statement sequence
    pub fn walk(&mut self, stmts: Vec<Stmt>) -> Result<Vec<Stmt>> {
        self.depth += 1;
        let mut out = Vec::with_capacity(stmts.len());
        for mut stmt in stmts {
            if self.descend(&mut stmt)? {
                out.push(stmt);
            } else {
                self.apply_leaf(stmt, &mut out)?;
            }
        }
        self.depth -= 1;
        Ok(out)
    }

    /// Hand a leaf statement to the rule. A label around a leaf stays on the
    /// first statement the rule produces; anything else the rule adds
    /// follows it.
    fn apply_leaf(&mut self, mut stmt: Stmt, out: &mut Vec<Stmt>) -> Result<()> {
        let StmtKind::Labeled(labeled) = &mut stmt.kind else {
            return self.rule.apply(stmt, &mut self.summary, out);
        };
        let Some(inner) = labeled.stmt.take() else {
            out.push(stmt);
            return Ok(());
        };

        let mut produced = Vec::new();
        self.apply_leaf(*inner, &mut produced)?;
        let mut produced = produced.into_iter();
        labeled.stmt = produced.next().map(Box::new);
        out.push(stmt);
        out.extend(produced);
        Ok(())
    }

    /// Rewrite the nested bodies of a compound statement. Returns `false` for
    /// statements without nested bodies, labeled or not, which belong to the
    /// rule.
    fn descend(&mut self, stmt: &mut Stmt) -> Result<bool> {
        trace!(depth = self.depth, row = stmt.span.start.row, "visiting statement");
        match &mut stmt.kind {
            StmtKind::If(inner) => self.walk_if(inner)?,
            StmtKind::Block(body) => *body = self.walk(mem::take(body))?,
            StmtKind::Switch(switch) | StmtKind::TypeSwitch(switch) | StmtKind::Select(switch) => {
                for clause in &mut switch.clauses {
                    clause.body = self.walk(mem::take(&mut clause.body))?;
                }
            }
            StmtKind::For(looped) | StmtKind::Range(looped) => {
                looped.body = self.walk(mem::take(&mut looped.body))?;
            }
            StmtKind::Labeled(labeled) => {
                if let Some(inner) = &mut labeled.stmt {
                    if !self.descend(inner)? {
                        return Ok(false);
                    }
                }
            }
            StmtKind::Expr(_)
            | StmtKind::Assign(_)
            | StmtKind::Dump(_)
            | StmtKind::Comment(_)
            | StmtKind::Other(_) => return Ok(false),
        }
        Ok(true)
    }

    fn walk_if(&mut self, stmt: &mut IfStmt) -> Result<()> {
        stmt.body = self.walk(mem::take(&mut stmt.body))?;
        match &mut stmt.alternative {
            Some(ElseBranch::If(next)) => self.walk_if(next)?,
            Some(ElseBranch::Block(body)) => *body = self.walk(mem::take(body))?,
            None => {}
        }
        Ok(())
    }

    pub fn summary(&self) -> &TransformSummary {
        &self.summary
    }

    pub fn into_summary(self) -> TransformSummary {
        self.summary
    }
}
