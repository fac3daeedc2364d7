//! Tests for symbol resolution and expression typing.

use colang_analyzer::{Program, analyze};
use colang_analyzer::program::{ExpressionKind, TypedStatement};
use colang_diagnostic::{Issue, IssueCode, Severity};
use pretty_assertions::assert_eq;
use colang_source::types::{FileID, SourceFile};

const PRELUDE: &str = "\
native struct void;
native struct bool;
native struct int;
native struct double;
native struct string;

native void print(int);
native void print(double);
native void print(string);
";

fn analyze_source(source: &str) -> (Program, Vec<Issue>) {
    let prelude_file =
        SourceFile::new(FileID::new(1), "prelude.co".to_string(), PRELUDE.to_string());
    let source_file =
        SourceFile::new(FileID::new(2), "main.co".to_string(), source.to_string());

    let (prelude_unit, prelude_issues) = colang_parser::parse_file(&prelude_file);
    assert!(prelude_issues.is_empty(), "prelude should parse cleanly: {prelude_issues:?}");
    let (unit, parse_issues) = colang_parser::parse_file(&source_file);
    assert!(parse_issues.is_empty(), "source should parse cleanly: {parse_issues:?}");

    analyze(&prelude_unit, &unit)
}

fn error_codes(issues: &[Issue]) -> Vec<IssueCode> {
    issues.iter().filter(|i| i.severity == Severity::Error).map(|i| i.code).collect()
}

/// The body statements of the named function.
fn body_of<'p>(program: &'p Program, name: &str) -> &'p [TypedStatement] {
    let (_, function) = program
        .functions()
        .find(|(_, f)| f.name == name && !f.native)
        .unwrap_or_else(|| panic!("no function `{name}`"));
    &function.body.as_ref().unwrap().statements
}

#[test]
fn test_hello_world_resolves_cleanly() {
    let (_, issues) = analyze_source("void main() { print(42); }");

    assert_eq!(issues, vec![]);
}

#[test]
fn test_prelude_symbols_are_visible_everywhere() {
    let (_, issues) = analyze_source(
        "void before() { print(1); }\nvoid main() { before(); print(2.5); }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_forward_references_resolve() {
    let (_, issues) = analyze_source(
        "void main() { later(count); }\nvoid later(int x) { print(x); }\nint count = 3;",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_duplicate_symbol_reports_both_spans() {
    let (_, issues) = analyze_source("int x = 1;\nint x = 2;\nvoid main() { print(x); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::DuplicateSymbol]);
    let issue = issues.iter().find(|i| i.code == IssueCode::DuplicateSymbol).unwrap();
    assert_eq!(issue.notes.len(), 1);
    assert!(issue.notes[0].span.is_some());
    assert!(issue.notes[0].span.unwrap().start.line < issue.span.start.line);
}

#[test]
fn test_duplicate_overload_signature_is_rejected() {
    let (_, issues) =
        analyze_source("int f() { return 1; }\ndouble f() { return 2.5; }\nvoid main() { f(); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::DuplicateSymbol]);
}

#[test]
fn test_unknown_identifier() {
    let (_, issues) = analyze_source("void main() { print(nope); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownIdentifier]);
}

#[test]
fn test_unknown_type() {
    let (_, issues) = analyze_source("void main() { Widget w; w = w; }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownType]);
}

#[test]
fn test_method_dispatch() {
    let (_, issues) = analyze_source(
        "struct Counter { int next(int c) { return c + 1; } }\n\
         void main() { Counter c; print(c.next(1)); }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_unknown_method() {
    let (_, issues) = analyze_source(
        "struct Counter { }\nvoid main() { Counter c; c.bump(); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownMethod]);
}

#[test]
fn test_methods_are_not_named_symbols() {
    // A method is reachable only through its owner; as a free name it is
    // simply unknown.
    let (_, issues) = analyze_source(
        "struct Counter { int next(int c) { return c; } }\nvoid main() { next(1); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownIdentifier]);
}

#[test]
fn test_subscript_resolves_to_the_get_method() {
    let (program, issues) = analyze_source(
        "struct Buf { int get(int i) { return i; } }\n\
         void main() { Buf b; print(b[2]); }",
    );

    assert_eq!(issues, vec![]);

    // `b[2]` lowers to a method call on `get`.
    let TypedStatement::Expression(expr) = &body_of(&program, "main")[1] else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Call { arguments, .. } = &expr.kind else {
        panic!("expected the print call");
    };
    assert!(matches!(arguments[0].kind, ExpressionKind::MethodCall { .. }));
}

#[test]
fn test_subscript_without_get_method_is_rejected() {
    let (_, issues) =
        analyze_source("struct Buf { }\nvoid main() { Buf b; b[0]; }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownMethod]);
}

#[test]
fn test_assignment_requires_a_place() {
    let (_, issues) = analyze_source("void main() { 1 = 2; }");

    assert_eq!(error_codes(&issues), vec![IssueCode::NotAssignable]);
}

#[test]
fn test_condition_must_be_bool_but_branches_still_analyze() {
    let (_, issues) = analyze_source("void main() { if (1) { print(nope); } }");

    assert_eq!(
        error_codes(&issues),
        vec![IssueCode::TypeMismatch, IssueCode::UnknownIdentifier]
    );
}

#[test]
fn test_initializer_conversion_inserts_a_coercion_node() {
    let (program, issues) = analyze_source("void main() { double d = 1; print(d); }");

    assert_eq!(issues, vec![]);

    let TypedStatement::Variable(init) = &body_of(&program, "main")[0] else {
        panic!("expected a variable statement");
    };
    let initializer = init.initializer.as_ref().unwrap();
    assert!(matches!(initializer.kind, ExpressionKind::Convert { .. }));
}

#[test]
fn test_assignment_type_mismatch() {
    let (_, issues) = analyze_source("void main() { int x = 0; x = \"s\"; print(x); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::TypeMismatch]);
}

#[test]
fn test_string_concatenation_and_comparison() {
    let (_, issues) = analyze_source(
        "void main() { string s = \"a\" + \"b\"; if (s == \"ab\") { print(s); } }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_arithmetic_on_mixed_numerics_widens() {
    let (_, issues) = analyze_source("void main() { double d = 1 + 2.5; print(d); }");

    assert_eq!(issues, vec![]);
}

#[test]
fn test_modulo_requires_ints() {
    let (_, issues) = analyze_source("void main() { print(1.5 % 2.0); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::TypeMismatch]);
}

#[test]
fn test_postfix_increment_requires_int_place() {
    let (_, issues) = analyze_source("void main() { int i = 0; i++; print(i); }");
    assert_eq!(issues, vec![]);

    let (_, issues) = analyze_source("void main() { 1++; }");
    assert_eq!(error_codes(&issues), vec![IssueCode::NotAssignable]);

    let (_, issues) = analyze_source("void main() { double d = 0.0; d++; print(d); }");
    assert_eq!(error_codes(&issues), vec![IssueCode::TypeMismatch]);
}

#[test]
fn test_shadowing_in_nested_scope_is_allowed() {
    let (_, issues) = analyze_source(
        "void main() { int x = 1; { int x = 2; print(x); } print(x); }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_unused_variable_warns() {
    let (_, issues) = analyze_source("void main() { int x = 1; }");

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::UnusedSymbol);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_write_only_variable_still_warns() {
    let (_, issues) = analyze_source("void main() { int x = 1; x = 2; }");

    assert_eq!(error_codes(&issues), vec![]);
    assert!(issues.iter().any(|i| i.code == IssueCode::UnusedSymbol));
}

#[test]
fn test_uncalled_function_warns_but_main_does_not() {
    let (_, issues) = analyze_source("void helper() { }\nvoid main() { }");

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::UnusedSymbol);
    assert!(issues[0].message.contains("helper"));
}

#[test]
fn test_prelude_symbols_never_warn() {
    // Nothing from the prelude is called here, yet no unused warnings appear
    // for it.
    let (_, issues) = analyze_source("void main() { }");

    assert_eq!(issues, vec![]);
}

#[test]
fn test_error_type_absorbs_downstream_checks() {
    // One unknown identifier, and exactly one issue: the uses of `x` after
    // the failure stay silent.
    let (_, issues) = analyze_source("void main() { int x = nope; x = x + 1; print(x); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownIdentifier]);
}

#[test]
fn test_entry_point_is_detected() {
    let (program, _) = analyze_source("void main() { }");

    let entry = program.entry.expect("main should be the entry");
    assert_eq!(program.function(entry).name, "main");
}
