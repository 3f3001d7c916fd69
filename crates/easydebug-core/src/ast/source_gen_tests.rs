// Tests for source generation from hand-built and parsed trees

use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EasyDebugError;
use crate::parser::GoParser;

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(kind, Span::default())
}

fn assign(text: &str, name: &str) -> Stmt {
    stmt(StmtKind::Assign(AssignStmt {
        text: Verbatim::single(text),
        operator: ":=".to_string(),
        targets: vec![Target::Ident(name.to_string())],
    }))
}

fn other(text: &str) -> Stmt {
    stmt(StmtKind::Other(Verbatim::single(text)))
}

fn file_with_body(body: Vec<Stmt>) -> SourceFile {
    SourceFile::new(vec![
        Decl::new(DeclKind::Other(Verbatim::single("package main")), Span::default()),
        Decl {
            blank_before: true,
            ..Decl::new(
                DeclKind::Func(FuncDecl {
                    name: "f".to_string(),
                    header: Verbatim::single("func f()"),
                    body: Some(body),
                }),
                Span::default(),
            )
        },
    ])
}

fn render_body(body: Vec<Stmt>) -> String {
    render_file(&file_with_body(body)).unwrap()
}

#[test]
fn test_dump_call_to_source() {
    let dump = DumpCall::after(Pos::default(), "total").unwrap();
    let StmtKind::Dump(call) = &dump.kind else {
        panic!("expected dump");
    };
    assert_eq!(call.to_source(), "dmp(\"total\", total)");
}

#[test]
fn test_empty_body_renders_braces() {
    assert_eq!(render_body(vec![]), "package main\n\nfunc f() {}\n");
}

#[test]
fn test_statements_are_tab_indented() {
    let anchor = Pos::new(20, 3, 7);
    let body = vec![assign("x := 1", "x"), DumpCall::after(anchor, "x").unwrap()];

    assert_eq!(
        render_body(body),
        "package main\n\nfunc f() {\n\tx := 1\n\tdmp(\"x\", x)\n}\n"
    );
}

#[test]
fn test_out_of_order_dump_arguments_are_rejected() {
    let mut dump = DumpCall::after(Pos::new(10, 1, 4), "x").unwrap();
    if let StmtKind::Dump(call) = &mut dump.kind {
        std::mem::swap(&mut call.literal.pos, &mut call.value.pos);
    }

    let err = render_file(&file_with_body(vec![dump])).unwrap_err();
    assert!(matches!(err, EasyDebugError::Format { .. }), "{err:?}");
}

#[test]
fn test_blank_lines_and_trailing_comments() {
    let mut second = assign("y := 2", "y");
    second.blank_before = true;
    second.trailing_comment = Some("// why".to_string());

    assert_eq!(
        render_body(vec![assign("x := 1", "x"), second]),
        "package main\n\nfunc f() {\n\tx := 1\n\n\ty := 2 // why\n}\n"
    );
}

#[test]
fn test_nested_blocks_indent_one_level_each() {
    let body = vec![stmt(StmtKind::If(IfStmt {
        header: Verbatim::single("if ok"),
        body: vec![stmt(StmtKind::Block(vec![assign("z := 3", "z")]))],
        alternative: Some(ElseBranch::If(Box::new(IfStmt {
            header: Verbatim::single("if !ok"),
            body: vec![],
            alternative: Some(ElseBranch::Block(vec![other("return")])),
        }))),
    }))];

    assert_eq!(
        render_body(body),
        "package main\n\nfunc f() {\n\tif ok {\n\t\t{\n\t\t\tz := 3\n\t\t}\n\t} else if !ok {} else {\n\t\treturn\n\t}\n}\n"
    );
}

#[test]
fn test_switch_clauses_align_with_switch() {
    let body = vec![stmt(StmtKind::Switch(SwitchStmt {
        header: Verbatim::single("switch n"),
        clauses: vec![
            CaseClause {
                leading_comments: vec![],
                header: Verbatim::single("case 1:"),
                body: vec![assign("a := n", "a")],
                blank_before: false,
            },
            CaseClause {
                leading_comments: vec![Verbatim::single("// otherwise")],
                header: Verbatim::single("default:"),
                body: vec![],
                blank_before: true,
            },
        ],
    }))];

    assert_eq!(
        render_body(body),
        "package main\n\nfunc f() {\n\tswitch n {\n\tcase 1:\n\t\ta := n\n\n\t// otherwise\n\tdefault:\n\t}\n}\n"
    );
}

#[test]
fn test_labels_are_outdented() {
    let body = vec![
        stmt(StmtKind::Labeled(LabeledStmt {
            label: "outer".to_string(),
            stmt: Some(Box::new(stmt(StmtKind::For(LoopStmt {
                header: Verbatim::single("for"),
                body: vec![other("break outer")],
            })))),
        })),
        stmt(StmtKind::Labeled(LabeledStmt {
            label: "done".to_string(),
            stmt: None,
        })),
    ];

    assert_eq!(
        render_body(body),
        "package main\n\nfunc f() {\nouter:\n\tfor {\n\t\tbreak outer\n\t}\ndone:\n}\n"
    );
}

#[test]
fn test_continuation_lines_follow_statement_indent() {
    let text = Verbatim {
        first: "q := query(`".to_string(),
        rest: vec![
            VerbatimLine {
                text: "  SELECT 1`,".to_string(),
                raw: true,
            },
            VerbatimLine {
                text: String::new(),
                raw: false,
            },
            VerbatimLine {
                text: ")".to_string(),
                raw: false,
            },
        ],
    };
    let body = vec![stmt(StmtKind::Block(vec![stmt(StmtKind::Assign(AssignStmt {
        text,
        operator: ":=".to_string(),
        targets: vec![Target::Ident("q".to_string())],
    }))]))];

    assert_eq!(
        render_body(body),
        "package main\n\nfunc f() {\n\t{\n\t\tq := query(`\n  SELECT 1`,\n\n\t\t)\n\t}\n}\n"
    );
}

#[test]
fn test_output_ends_with_single_newline() {
    let file = SourceFile::new(vec![Decl::new(
        DeclKind::Comment(Verbatim {
            first: "/* note".to_string(),
            rest: vec![VerbatimLine {
                text: "*/".to_string(),
                raw: true,
            }],
        }),
        Span::default(),
    )]);
    assert_eq!(render_file(&file).unwrap(), "/* note\n*/\n");
}

#[test]
fn test_formatted_source_renders_unchanged() {
    let source = "package main

import \"fmt\"

// main entry
func main() {
\tx := 1 // one

\tif x > 0 {
\t\ty := 2
\t\tfmt.Println(y)
\t} else if x < 0 {
\t\tz := 3
\t\t_ = z
\t} else {
\t\tfmt.Println(\"zero\")
\t}

outer:
\tfor i := 0; i < 3; i++ {
\t\tfor _, v := range items {
\t\t\tif v == i {
\t\t\t\tcontinue outer
\t\t\t}
\t\t}
\t}

\tq := `raw
  text`
\tfmt.Println(q)
}
";
    let file = GoParser::new().unwrap().parse(source).unwrap();
    assert_eq!(render_file(&file).unwrap(), source);
}
