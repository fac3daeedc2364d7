//! Tests for call-site overload selection.

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
    assert!(prelude_issues.is_empty());
    let (unit, parse_issues) = colang_parser::parse_file(&source_file);
    assert!(parse_issues.is_empty(), "source should parse cleanly: {parse_issues:?}");

    analyze(&prelude_unit, &unit)
}

fn error_codes(issues: &[Issue]) -> Vec<IssueCode> {
    issues.iter().filter(|i| i.severity == Severity::Error).map(|i| i.code).collect()
}

/// The function selected by the first call statement in `main`, rendered as
/// `name(param types)` for easy assertions.
fn first_selected(program: &Program) -> Option<String> {
    let (_, main) = program.functions().find(|(_, f)| f.name == "main")?;
    let expr = main.body.as_ref()?.statements.iter().find_map(|stmt| match stmt {
        TypedStatement::Expression(expr) => Some(expr),
        _ => None,
    })?;

    let call = match &expr.kind {
        ExpressionKind::Call { function, .. } => *function,
        ExpressionKind::MethodCall { method, .. } => *method,
        _ => return None,
    };

    let f = program.function(call);
    let params: Vec<&str> =
        f.parameters.iter().map(|&p| program.ty(program.variable(p).ty).name.as_str()).collect();
    Some(format!("{}({})", f.name, params.join(", ")))
}

#[test]
fn test_exact_match_beats_converted_match() {
    let (program, issues) = analyze_source(
        "int pick(int x) { return x; }\n\
         int pick(double x) { return 0; }\n\
         void main() { pick(1); }",
    );

    assert_eq!(error_codes(&issues), vec![]);
    assert_eq!(first_selected(&program).as_deref(), Some("pick(int)"));
}

#[test]
fn test_converted_match_is_used_when_no_exact_exists() {
    let (program, issues) = analyze_source(
        "int pick(double x) { return 0; }\nvoid main() { pick(1); }",
    );

    assert_eq!(error_codes(&issues), vec![]);
    assert_eq!(first_selected(&program).as_deref(), Some("pick(double)"));
}

#[test]
fn test_conversion_becomes_an_explicit_coercion() {
    let (program, issues) = analyze_source(
        "void f(double d) { print(d); }\nvoid main() { f(1); }",
    );

    assert_eq!(issues, vec![]);

    let (_, main) = program.functions().find(|(_, f)| f.name == "main").unwrap();
    let TypedStatement::Expression(expr) = &main.body.as_ref().unwrap().statements[0] else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Call { arguments, .. } = &expr.kind else {
        panic!("expected a call");
    };
    assert!(matches!(arguments[0].kind, ExpressionKind::Convert { .. }));
}

#[test]
fn test_ambiguous_call_lists_candidates() {
    let (_, issues) = analyze_source(
        "void f(int a, double b) { }\n\
         void f(double a, int b) { }\n\
         void main() { f(1, 2); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::AmbiguousCall]);
    let issue = issues.iter().find(|i| i.code == IssueCode::AmbiguousCall).unwrap();
    assert_eq!(issue.notes.len(), 2);
}

#[test]
fn test_no_matching_overload_on_wrong_type() {
    let (_, issues) =
        analyze_source("void f(string s) { print(s); }\nvoid main() { f(1); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::NoMatchingOverload]);
}

#[test]
fn test_no_matching_overload_on_wrong_arity() {
    let (_, issues) =
        analyze_source("void f(int a) { print(a); }\nvoid main() { f(1, 2); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::NoMatchingOverload]);
}

#[test]
fn test_method_overloads_resolve_like_free_functions() {
    let (program, issues) = analyze_source(
        "struct Fmt {\n\
           int show(int x) { return x; }\n\
           int show(double x) { return 0; }\n\
         }\n\
         void main() { Fmt f; f.show(3); }",
    );

    assert_eq!(error_codes(&issues), vec![]);
    assert_eq!(first_selected(&program).as_deref(), Some("show(int)"));
}

#[test]
fn test_unresolved_signature_does_not_compete() {
    // The first overload's parameter type is unknown; that is diagnosed at
    // its definition, and the call still resolves cleanly to the second.
    let (program, issues) = analyze_source(
        "int f(Bogus x) { return 1; }\n\
         int f(int x) { return 2; }\n\
         void main() { f(1); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownType]);
    assert_eq!(first_selected(&program).as_deref(), Some("f(int)"));
}

#[test]
fn test_call_through_fully_unresolved_overload_stays_quiet() {
    // The lone overload was already diagnosed at its definition; the call
    // site adds nothing.
    let (_, issues) =
        analyze_source("void f(Bogus x) { }\nvoid main() { f(1); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnknownType]);
}

#[test]
fn test_selection_is_deterministic() {
    let source = "void f(int a, double b) { }\n\
                  void f(double a, int b) { }\n\
                  void main() { f(1, 2); }";

    let (_, first) = analyze_source(source);
    let (_, second) = analyze_source(source);

    assert_eq!(first, second);
}

#[test]
fn test_calling_a_variable_is_not_callable() {
    let (_, issues) = analyze_source("void main() { int x = 1; x(); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::NotCallable]);
}
