// Go parser: tree-sitter concrete syntax tree lowered into the statement tree
use std::ops::Range;

use tracing::{debug, trace};
use tree_sitter::{Node, Point};

use crate::ast::{
    AssignStmt, CaseClause, Decl, DeclKind, ElseBranch, ExprStmt, FuncDecl, IfStmt, LabeledStmt,
    LoopStmt, Pos, SourceFile, Span, Stmt, StmtKind, SwitchStmt, Target, Verbatim, VerbatimLine,
};
use crate::errors::{EasyDebugError, Result};


/// Go parser backed by tree-sitter-go
pub struct GoParser {
    parser: tree_sitter::Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser.set_language(&language).map_err(|e| {
            EasyDebugError::parse_at(Point::default(), format!("failed to load Go grammar: {e}"))
        })?;

        Ok(Self { parser })
    }

    /// Parse source text into a [`SourceFile`]. Any syntax error is fatal.
    pub fn parse(&mut self, source: &str) -> Result<SourceFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| EasyDebugError::parse_at(Point::default(), "parser produced no tree"))?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(first_syntax_error(root, source));
        }

        let file = Lowering { source }.source_file(root)?;
        debug!(decls = file.decls.len(), "parsed Go source");
        Ok(file)
    }

    /// Whether `source` parses without syntax errors
    pub fn is_well_formed(&mut self, source: &str) -> bool {
        self.parser
            .parse(source, None)
            .is_some_and(|tree| !tree.root_node().has_error())
    }
}

/// Locate the first ERROR or MISSING node, depth first
fn first_syntax_error(root: Node, source: &str) -> EasyDebugError {
    let mut node = root;
    loop {
        if node.is_missing() {
            return EasyDebugError::parse_at(
                node.start_position(),
                format!("missing `{}`", node.kind()),
            );
        }
        if node.is_error() {
            let snippet: String = source[node.byte_range()]
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(24)
                .collect();
            return EasyDebugError::parse_at(
                node.start_position(),
                format!("unexpected `{}`", snippet.trim()),
            );
        }
        let next = {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .find(|child| child.has_error() || child.is_missing());
            found
        };
        if let Some(child) = next {
            node = child;
            continue;
        }
        return EasyDebugError::parse_at(node.start_position(), "syntax error");
    }
}

/// Layout bookkeeping shared by declarations and statements
trait Layout {
    fn set_blank_before(&mut self, blank: bool);
    fn push_trailing(&mut self, comment: &str);
}

impl Layout for Decl {
    fn set_blank_before(&mut self, blank: bool) {
        self.blank_before = blank;
    }

    fn push_trailing(&mut self, comment: &str) {
        push_comment(&mut self.trailing_comment, comment);
    }
}

impl Layout for Stmt {
    fn set_blank_before(&mut self, blank: bool) {
        self.blank_before = blank;
    }

    fn push_trailing(&mut self, comment: &str) {
        push_comment(&mut self.trailing_comment, comment);
    }
}

fn push_comment(slot: &mut Option<String>, comment: &str) {
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(comment);
        }
        None => *slot = Some(comment.to_string()),
    }
}

struct Lowering<'a> {
    source: &'a str,
}

impl<'a> Lowering<'a> {
    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn pos(point: Point, offset: usize) -> Pos {
        Pos::new(offset, point.row, point.column)
    }

    fn span(node: Node) -> Span {
        Span::new(
            Self::pos(node.start_position(), node.start_byte()),
            Self::pos(node.end_position(), node.end_byte()),
        )
    }

    fn source_file(&self, root: Node) -> Result<SourceFile> {
        let nodes = named_children(root);
        let decls = self.lay_out(&nodes, |node| self.decl(node))?;
        Ok(SourceFile::new(decls))
    }

    /// Lower a node sequence, recording blank lines and folding comments that
    /// share a row with the previous node into its trailing comment
    fn lay_out<T: Layout>(
        &self,
        nodes: &[Node],
        mut lower: impl FnMut(Node) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items: Vec<T> = Vec::with_capacity(nodes.len());
        let mut prev_end_row: Option<usize> = None;

        for &node in nodes {
            let start_row = node.start_position().row;
            if node.kind() == "comment" && prev_end_row == Some(start_row) {
                if let Some(last) = items.last_mut() {
                    last.push_trailing(self.text(node).trim_end());
                    prev_end_row = Some(node.end_position().row);
                    continue;
                }
            }

            let mut item = lower(node)?;
            item.set_blank_before(prev_end_row.is_some_and(|row| start_row > row + 1));
            items.push(item);
            prev_end_row = Some(node.end_position().row);
        }

        Ok(items)
    }

    fn decl(&self, node: Node) -> Result<Decl> {
        let kind = match node.kind() {
            "function_declaration" | "method_declaration" => DeclKind::Func(self.func_decl(node)?),
            "comment" => DeclKind::Comment(self.verbatim_node(node)),
            _ => DeclKind::Other(self.verbatim_node(node)),
        };
        Ok(Decl::new(kind, Self::span(node)))
    }

    fn func_decl(&self, node: Node) -> Result<FuncDecl> {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_string())
            .ok_or_else(|| EasyDebugError::parse_at(node.start_position(), "function without a name"))?;

        match node.child_by_field_name("body") {
            Some(body) => Ok(FuncDecl {
                name,
                header: self.verbatim(node, node.start_byte(), body.start_byte()),
                body: Some(self.block(body)?),
            }),
            None => Ok(FuncDecl {
                name,
                header: self.verbatim_node(node),
                body: None,
            }),
        }
    }

    fn block(&self, node: Node) -> Result<Vec<Stmt>> {
        let nodes = body_nodes(node, node.start_byte());
        self.lay_out(&nodes, |child| self.statement(child))
    }

    fn statement(&self, node: Node) -> Result<Stmt> {
        trace!(kind = node.kind(), row = node.start_position().row, "lowering statement");
        let kind = match node.kind() {
            "expression_statement" => StmtKind::Expr(self.expr_stmt(node)),
            "short_var_declaration" | "assignment_statement" => {
                StmtKind::Assign(self.assign_stmt(node))
            }
            "if_statement" => StmtKind::If(self.if_stmt(node)?),
            "block" => StmtKind::Block(self.block(node)?),
            "expression_switch_statement" => StmtKind::Switch(self.switch_stmt(node)?),
            "type_switch_statement" => StmtKind::TypeSwitch(self.switch_stmt(node)?),
            "select_statement" => StmtKind::Select(self.switch_stmt(node)?),
            "for_statement" => self.for_stmt(node)?,
            "labeled_statement" => StmtKind::Labeled(self.labeled_stmt(node)?),
            "comment" => StmtKind::Comment(self.verbatim_node(node)),
            _ => StmtKind::Other(self.verbatim_node(node)),
        };
        Ok(Stmt::new(kind, Self::span(node)))
    }

    fn expr_stmt(&self, node: Node) -> ExprStmt {
        let callee = named_children(node)
            .into_iter()
            .find(|child| child.kind() != "comment")
            .filter(|expr| expr.kind() == "call_expression")
            .and_then(|call| call.child_by_field_name("function"))
            .filter(|function| function.kind() == "identifier")
            .map(|function| self.text(function).to_string());

        ExprStmt {
            text: self.verbatim_node(node),
            callee,
        }
    }

    fn assign_stmt(&self, node: Node) -> AssignStmt {
        let operator = if node.kind() == "short_var_declaration" {
            ":=".to_string()
        } else {
            node.child_by_field_name("operator")
                .map(|op| self.text(op).to_string())
                .unwrap_or_else(|| "=".to_string())
        };

        let targets = match node.child_by_field_name("left") {
            Some(left) if left.kind() == "expression_list" => named_children(left)
                .into_iter()
                .filter(|target| target.kind() != "comment")
                .map(|target| self.target(target))
                .collect(),
            Some(left) => vec![self.target(left)],
            None => Vec::new(),
        };

        AssignStmt {
            text: self.verbatim_node(node),
            operator,
            targets,
        }
    }

    fn target(&self, node: Node) -> Target {
        let text = self.text(node);
        match node.kind() {
            "identifier" if text == "_" => Target::Blank,
            "identifier" => Target::Ident(text.to_string()),
            _ => Target::Other(text.to_string()),
        }
    }

    fn if_stmt(&self, node: Node) -> Result<IfStmt> {
        let consequence = required_field(node, "consequence")?;
        let alternative = match node.child_by_field_name("alternative") {
            Some(alt) if alt.kind() == "if_statement" => {
                Some(ElseBranch::If(Box::new(self.if_stmt(alt)?)))
            }
            Some(alt) => Some(ElseBranch::Block(self.block(alt)?)),
            None => None,
        };

        Ok(IfStmt {
            header: self.verbatim(node, node.start_byte(), consequence.start_byte()),
            body: self.block(consequence)?,
            alternative,
        })
    }

    fn switch_stmt(&self, node: Node) -> Result<SwitchStmt> {
        let brace = child_of_kind(node, "{").ok_or_else(|| {
            EasyDebugError::parse_at(node.start_position(), format!("{} without a body", node.kind()))
        })?;

        let mut clauses: Vec<CaseClause> = Vec::new();
        let mut pending: Vec<Verbatim> = Vec::new();
        let mut prev_end_row: Option<usize> = None;

        for child in named_children(node) {
            if child.start_byte() < brace.end_byte() {
                continue;
            }
            let start_row = child.start_position().row;
            match child.kind() {
                "expression_case" | "type_case" | "communication_case" | "default_case" => {
                    let mut clause = self.case_clause(child)?;
                    clause.leading_comments = std::mem::take(&mut pending);
                    clause.blank_before = prev_end_row.is_some_and(|row| start_row > row + 1);
                    clauses.push(clause);
                }
                "comment" => pending.push(self.verbatim_node(child)),
                other => {
                    return Err(EasyDebugError::parse_at(
                        child.start_position(),
                        format!("unexpected `{other}` in {}", node.kind()),
                    ))
                }
            }
            prev_end_row = Some(child.end_position().row);
        }

        // Comments after the last clause stay at the end of its body
        if let Some(last) = clauses.last_mut() {
            last.body.extend(pending.into_iter().map(|comment| {
                Stmt::new(StmtKind::Comment(comment), Self::span(node))
            }));
        }

        Ok(SwitchStmt {
            header: self.verbatim(node, node.start_byte(), brace.start_byte()),
            clauses,
        })
    }

    fn case_clause(&self, node: Node) -> Result<CaseClause> {
        let colon = child_of_kind(node, ":").ok_or_else(|| {
            EasyDebugError::parse_at(node.start_position(), "case clause without `:`")
        })?;
        let nodes = body_nodes(node, colon.end_byte());

        Ok(CaseClause {
            leading_comments: Vec::new(),
            header: self.verbatim(node, node.start_byte(), colon.end_byte()),
            body: self.lay_out(&nodes, |child| self.statement(child))?,
            blank_before: false,
        })
    }

    fn for_stmt(&self, node: Node) -> Result<StmtKind> {
        let body = required_field(node, "body")?;
        let is_range = named_children(node)
            .iter()
            .any(|child| child.kind() == "range_clause");

        let stmt = LoopStmt {
            header: self.verbatim(node, node.start_byte(), body.start_byte()),
            body: self.block(body)?,
        };

        Ok(if is_range {
            StmtKind::Range(stmt)
        } else {
            StmtKind::For(stmt)
        })
    }

    fn labeled_stmt(&self, node: Node) -> Result<LabeledStmt> {
        let children = named_children(node);
        let label = node
            .child_by_field_name("label")
            .or_else(|| children.first().copied())
            .ok_or_else(|| EasyDebugError::parse_at(node.start_position(), "label without a name"))?;

        let inner = children
            .into_iter()
            .find(|child| child.start_byte() > label.start_byte() && child.kind() != "comment");

        Ok(LabeledStmt {
            label: self.text(label).to_string(),
            stmt: match inner {
                Some(inner) => Some(Box::new(self.statement(inner)?)),
                None => None,
            },
        })
    }

    fn verbatim_node(&self, node: Node) -> Verbatim {
        self.verbatim(node, node.start_byte(), node.end_byte())
    }

    /// Capture `source[start..end]`, stripping the indentation of the line
    /// `start` sits on from every continuation line that is not inside a raw
    /// string or block comment. Trailing whitespace is only dropped where the
    /// line break after it is outside those regions.
    fn verbatim(&self, node: Node, start: usize, end: usize) -> Verbatim {
        let text = self.source[start..end].trim_end();
        let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
        let base_indent: &str = {
            let line = &self.source[line_start..];
            let width = line.len() - line.trim_start_matches([' ', '\t']).len();
            &line[..width]
        };

        let mut raw = Vec::new();
        collect_raw_regions(node, start..end, self.source, &mut raw);
        let inside_raw = |offset: usize| {
            raw.iter()
                .any(|region| region.start < offset && offset < region.end)
        };
        let trim_tail = |line: &str, line_end: usize| -> String {
            if inside_raw(line_end) {
                line.to_string()
            } else {
                line.trim_end().to_string()
            }
        };

        let mut lines = text.split('\n');
        let head = lines.next().unwrap_or_default();
        let first = trim_tail(head, start + head.len());
        let mut line_offset = start + head.len() + 1;
        let mut rest = Vec::new();

        for line in lines {
            let line_end = line_offset + line.len();
            let in_raw = inside_raw(line_offset);
            let text = if in_raw {
                line.to_string()
            } else {
                let unindented = line
                    .strip_prefix(base_indent)
                    .unwrap_or_else(|| line.trim_start());
                trim_tail(unindented, line_end)
            };
            rest.push(VerbatimLine { text, raw: in_raw });
            line_offset = line_end + 1;
        }

        Verbatim { first, rest }
    }
}

/// Byte ranges of raw string literals and block comments overlapping `range`
fn collect_raw_regions(node: Node, range: Range<usize>, source: &str, out: &mut Vec<Range<usize>>) {
    if node.end_byte() <= range.start || node.start_byte() >= range.end {
        return;
    }
    let is_raw = match node.kind() {
        "raw_string_literal" => true,
        "comment" => source[node.byte_range()].starts_with("/*"),
        _ => false,
    };
    if is_raw {
        out.push(node.byte_range());
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_raw_regions(child, range.clone(), source, out);
    }
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn required_field<'t>(node: Node<'t>, field: &str) -> Result<Node<'t>> {
    node.child_by_field_name(field).ok_or_else(|| {
        EasyDebugError::parse_at(
            node.start_position(),
            format!("{} without `{field}`", node.kind()),
        )
    })
}

/// Statement nodes of a body starting after byte `after`. Grammar versions
/// differ on whether statements are wrapped in a `statement_list`, so both
/// shapes are flattened.
fn body_nodes(node: Node, after: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in named_children(node) {
        if child.start_byte() < after {
            continue;
        }
        if child.kind() == "statement_list" {
            nodes.extend(named_children(child));
        } else {
            nodes.push(child);
        }
    }
    nodes
}
