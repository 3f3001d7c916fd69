// Statement-level tree for Go source files
// Only the statement structure is modelled. Expressions, declarations and
// headers are carried as verbatim source text and re-emitted as-is.

pub mod source_gen;
pub use source_gen::{render_file, SourceWriter, ToSource};

#[cfg(test)]
mod source_gen_tests;

use crate::errors::{EasyDebugError, Result};
use crate::HELPER_NAME;

/// Position of a node: byte offset plus zero-based row and column.
///
/// Synthetic nodes carry synthetic positions derived from the node they
/// follow; see [`DumpCall::after`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub offset: usize,
    pub row: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(offset: usize, row: usize, column: usize) -> Self {
        Self { offset, row, column }
    }

    /// The position `width` bytes further along the same line
    pub fn advance(self, width: usize) -> Self {
        Self {
            offset: self.offset + width,
            row: self.row,
            column: self.column + width,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }
}

/// One continuation line of a [`Verbatim`] block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbatimLine {
    /// Line text with the owning statement's indentation stripped
    pub text: String,
    /// Line sits inside a raw string or block comment and must be emitted
    /// byte for byte, without re-indentation
    pub raw: bool,
}

/// Source text that the generator copies through untouched apart from the
/// indentation of its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verbatim {
    pub first: String,
    pub rest: Vec<VerbatimLine>,
}

impl Verbatim {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            first: text.into(),
            rest: Vec::new(),
        }
    }
}

/// A parsed Go file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|decl| match &decl.kind {
            DeclKind::Func(func) => Some(func),
            _ => None,
        })
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut FuncDecl> {
        self.decls.iter_mut().filter_map(|decl| match &mut decl.kind {
            DeclKind::Func(func) => Some(func),
            _ => None,
        })
    }

    /// Whether a function (or method) with this name is declared at file scope
    pub fn declares(&self, name: &str) -> bool {
        self.functions().any(|func| func.name == name)
    }
}

/// Top-level declaration together with its layout
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
    /// An empty line separated this declaration from the previous one
    pub blank_before: bool,
    pub trailing_comment: Option<String>,
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Self {
            kind,
            span,
            blank_before: false,
            trailing_comment: None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, DeclKind::Comment(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// Function or method declaration
    Func(FuncDecl),
    /// Free-standing comment at file scope
    Comment(Verbatim),
    /// Package clause, imports, types, vars, consts
    Other(Verbatim),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Everything from `func` up to the opening brace of the body
    pub header: Verbatim,
    /// `None` for declarations implemented outside Go
    pub body: Option<Vec<Stmt>>,
}

/// A statement with its layout
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub blank_before: bool,
    pub trailing_comment: Option<String>,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self {
            kind,
            span,
            blank_before: false,
            trailing_comment: None,
        }
    }
}

/// Statement kinds. The tracer walker matches on this exhaustively, so a new
/// compound kind only needs a variant here and one arm there.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Simple expression statement
    Expr(ExprStmt),
    /// `:=`, `=` or `op=` assignment
    Assign(AssignStmt),
    If(IfStmt),
    Block(Vec<Stmt>),
    /// Expression switch
    Switch(SwitchStmt),
    /// Type switch
    TypeSwitch(SwitchStmt),
    /// `select` over channel operations
    Select(SwitchStmt),
    /// `for` with a condition, a three-part clause, or nothing
    For(LoopStmt),
    /// `for ... range`
    Range(LoopStmt),
    Labeled(LabeledStmt),
    /// Synthesized dump call
    Dump(DumpCall),
    Comment(Verbatim),
    /// Anything else, passed through untouched
    Other(Verbatim),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub text: Verbatim,
    /// Callee when the expression is a direct call of a plain identifier
    pub callee: Option<String>,
}

impl ExprStmt {
    pub fn calls(&self, name: &str) -> bool {
        self.callee.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub text: Verbatim,
    /// `:=`, `=`, `+=`, ...
    pub operator: String,
    /// Left-hand side in source order
    pub targets: Vec<Target>,
}

impl AssignStmt {
    /// Names bound by plain identifier targets, left to right
    pub fn bound_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().filter_map(|target| match target {
            Target::Ident(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Ident(String),
    /// The blank identifier `_`
    Blank,
    /// Field, index, dereference or any other non-identifier target
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// `if [init;] cond`
    pub header: Verbatim,
    pub body: Vec<Stmt>,
    pub alternative: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Vec<Stmt>),
}

/// Shared shape of expression switches, type switches and selects
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    /// Everything before the opening brace
    pub header: Verbatim,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Comments between the previous clause and this one
    pub leading_comments: Vec<Verbatim>,
    /// `case ...:` or `default:`
    pub header: Verbatim,
    pub body: Vec<Stmt>,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStmt {
    /// `for ...` up to the body
    pub header: Verbatim,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    pub label: String,
    pub stmt: Option<Box<Stmt>>,
}

/// One argument of a synthesized call, with the position the generator uses
/// to order it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpArg {
    pub text: String,
    pub pos: Pos,
}

/// `dmp("name", name)`
///
/// The generator emits call arguments in position order and rejects a call
/// whose arguments are not strictly increasing. Build these only through
/// [`DumpCall::after`], which lays the positions out the way the generator
/// expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpCall {
    pub helper: String,
    pub name: String,
    pub literal: DumpArg,
    pub value: DumpArg,
}

impl DumpCall {
    /// Synthesize the dump statement for `name`, placed directly after the
    /// node ending at `anchor`.
    ///
    /// The call starts at `anchor`, the name literal follows the helper's
    /// opening parenthesis and the reference argument sits one literal width
    /// plus the `", "` separator after it. The statement's span stays on the
    /// anchor's row so layout decisions keyed on rows are unaffected.
    pub fn after(anchor: Pos, name: &str) -> Result<Stmt> {
        if !is_identifier(name) {
            return Err(EasyDebugError::synthesis(name, "not a Go identifier"));
        }
        if name == "_" {
            return Err(EasyDebugError::synthesis(name, "blank identifier has no value"));
        }

        let literal_text = format!("\"{name}\"");
        let literal_pos = anchor.advance(HELPER_NAME.len() + 1);
        let value_pos = literal_pos.advance(literal_text.len() + 2);
        let end = value_pos.advance(name.len() + 1);

        let call = DumpCall {
            helper: HELPER_NAME.to_string(),
            name: name.to_string(),
            literal: DumpArg {
                text: literal_text,
                pos: literal_pos,
            },
            value: DumpArg {
                text: name.to_string(),
                pos: value_pos,
            },
        };

        Ok(Stmt::new(StmtKind::Dump(call), Span::new(anchor, end)))
    }

    /// Arguments in emission order
    pub fn args(&self) -> [&DumpArg; 2] {
        [&self.literal, &self.value]
    }
}

/// Go identifier: a letter or underscore followed by letters, digits or
/// underscores
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
