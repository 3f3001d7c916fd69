// Source code generation from the statement tree
// Verbatim fragments are copied through; only block structure, indentation
// and synthesized calls are produced here. Bodies are indented with tabs.

use super::*;

/// Trait for fragments that can generate their source code representation
pub trait ToSource {
    fn to_source(&self) -> String;
}

impl ToSource for Verbatim {
    fn to_source(&self) -> String {
        let mut result = self.first.clone();
        for line in &self.rest {
            result.push('\n');
            result.push_str(&line.text);
        }
        result
    }
}

impl ToSource for Target {
    fn to_source(&self) -> String {
        match self {
            Target::Ident(name) => name.clone(),
            Target::Blank => "_".to_string(),
            Target::Other(text) => text.clone(),
        }
    }
}

impl ToSource for DumpCall {
    fn to_source(&self) -> String {
        let args = self
            .args()
            .iter()
            .map(|arg| arg.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.helper, args)
    }
}

/// Render a whole file
pub fn render_file(file: &SourceFile) -> Result<String> {
    let mut writer = SourceWriter::new();
    writer.write_file(file)?;
    Ok(writer.finish())
}

/// Indentation-aware writer for the statement tree
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rendered text, terminated by exactly one newline
    pub fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out.push('\n');
        self.out
    }

    pub fn write_file(&mut self, file: &SourceFile) -> Result<()> {
        for (index, decl) in file.decls.iter().enumerate() {
            if index > 0 && decl.blank_before {
                self.out.push('\n');
            }
            self.write_decl(decl)?;
        }
        Ok(())
    }

    fn write_decl(&mut self, decl: &Decl) -> Result<()> {
        match &decl.kind {
            DeclKind::Func(func) => {
                self.write_verbatim(&func.header);
                if let Some(body) = &func.body {
                    self.out.push(' ');
                    self.write_block(body)?;
                }
            }
            DeclKind::Comment(text) | DeclKind::Other(text) => self.write_verbatim(text),
        }
        self.write_trailing(decl.trailing_comment.as_deref());
        self.out.push('\n');
        Ok(())
    }

    /// Write a statement list one level deeper than the current indentation
    pub fn write_stmts(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.indent += 1;
        for (index, stmt) in stmts.iter().enumerate() {
            if index > 0 && stmt.blank_before {
                self.out.push('\n');
            }
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        Ok(())
    }

    fn write_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        if let StmtKind::Labeled(labeled) = &stmt.kind {
            // Labels sit one level left of the statement they name
            self.push_indent(self.indent.saturating_sub(1));
            self.out.push_str(&labeled.label);
            self.out.push(':');
            if let Some(inner) = &labeled.stmt {
                self.out.push('\n');
                self.push_indent(self.indent);
                self.write_kind(&inner.kind)?;
                self.write_trailing(inner.trailing_comment.as_deref());
            }
        } else {
            self.push_indent(self.indent);
            self.write_kind(&stmt.kind)?;
        }
        self.write_trailing(stmt.trailing_comment.as_deref());
        self.out.push('\n');
        Ok(())
    }

    fn write_kind(&mut self, kind: &StmtKind) -> Result<()> {
        match kind {
            StmtKind::Expr(expr) => self.write_verbatim(&expr.text),
            StmtKind::Assign(assign) => self.write_verbatim(&assign.text),
            StmtKind::Comment(text) | StmtKind::Other(text) => self.write_verbatim(text),
            StmtKind::Dump(call) => self.write_dump(call)?,
            StmtKind::Block(body) => self.write_block(body)?,
            StmtKind::If(stmt) => self.write_if(stmt)?,
            StmtKind::Switch(stmt) | StmtKind::TypeSwitch(stmt) | StmtKind::Select(stmt) => {
                self.write_switch(stmt)?
            }
            StmtKind::For(stmt) | StmtKind::Range(stmt) => {
                self.write_verbatim(&stmt.header);
                self.out.push(' ');
                self.write_block(&stmt.body)?;
            }
            StmtKind::Labeled(labeled) => {
                // Only reachable for a label nested directly in another label
                self.out.push_str(&labeled.label);
                self.out.push(':');
                if let Some(inner) = &labeled.stmt {
                    self.out.push(' ');
                    self.write_kind(&inner.kind)?;
                }
            }
        }
        Ok(())
    }

    fn write_dump(&mut self, call: &DumpCall) -> Result<()> {
        let [first, second] = call.args();
        if second.pos <= first.pos {
            return Err(EasyDebugError::format(format!(
                "arguments of {}(\"{}\") are not in position order ({} >= {})",
                call.helper, call.name, first.pos.offset, second.pos.offset
            )));
        }
        self.out.push_str(&call.to_source());
        Ok(())
    }

    fn write_if(&mut self, stmt: &IfStmt) -> Result<()> {
        self.write_verbatim(&stmt.header);
        self.out.push(' ');
        self.write_block(&stmt.body)?;
        match &stmt.alternative {
            Some(ElseBranch::If(next)) => {
                self.out.push_str(" else ");
                self.write_if(next)?;
            }
            Some(ElseBranch::Block(body)) => {
                self.out.push_str(" else ");
                self.write_block(body)?;
            }
            None => {}
        }
        Ok(())
    }

    fn write_switch(&mut self, stmt: &SwitchStmt) -> Result<()> {
        self.write_verbatim(&stmt.header);
        self.out.push_str(" {\n");
        for (index, clause) in stmt.clauses.iter().enumerate() {
            if index > 0 && clause.blank_before {
                self.out.push('\n');
            }
            for comment in &clause.leading_comments {
                self.push_indent(self.indent);
                self.write_verbatim(comment);
                self.out.push('\n');
            }
            self.push_indent(self.indent);
            self.write_verbatim(&clause.header);
            self.out.push('\n');
            self.write_stmts(&clause.body)?;
        }
        self.push_indent(self.indent);
        self.out.push('}');
        Ok(())
    }

    fn write_block(&mut self, body: &[Stmt]) -> Result<()> {
        if body.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push_str("{\n");
        self.write_stmts(body)?;
        self.push_indent(self.indent);
        self.out.push('}');
        Ok(())
    }

    fn write_verbatim(&mut self, text: &Verbatim) {
        self.out.push_str(&text.first);
        for line in &text.rest {
            self.out.push('\n');
            if line.raw {
                self.out.push_str(&line.text);
            } else if !line.text.is_empty() {
                self.push_indent(self.indent);
                self.out.push_str(&line.text);
            }
        }
    }

    fn write_trailing(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.out.push(' ');
            self.out.push_str(comment);
        }
    }

    fn push_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push('\t');
        }
    }
}
