//! Tests for the return-flow checker.

use colang_analyzer::{Program, analyze};
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

#[test]
fn test_missing_return_in_empty_body() {
    let source = "int f() { }\nvoid main() { print(f()); }";
    let (_, issues) = analyze_source(source);

    assert_eq!(error_codes(&issues), vec![IssueCode::MissingReturnStatement]);

    // The diagnostic sits immediately before the body's closing brace.
    let issue = issues.iter().find(|i| i.code == IssueCode::MissingReturnStatement).unwrap();
    assert!(issue.span.is_empty());
    assert_eq!(issue.span.start.offset, source.find('}').unwrap());
}

#[test]
fn test_unreachable_code_after_return() {
    let (_, issues) =
        analyze_source("int f() { return 1; return 2; }\nvoid main() { print(f()); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::UnreachableCode]);

    let issue = issues.iter().find(|i| i.code == IssueCode::UnreachableCode).unwrap();
    assert_eq!(issue.span.start.column, "int f() { return 1; ".len() + 1);
}

#[test]
fn test_if_else_where_both_branches_return() {
    let (_, issues) = analyze_source(
        "double f(bool c) { if (c) return 1; else return 2.5; }\n\
         void main() { print(f(true)); }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_if_without_else_is_conservative() {
    let (_, issues) = analyze_source(
        "int f(bool c) { if (c) return 1; }\nvoid main() { print(f(true)); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::MissingReturnStatement]);
}

#[test]
fn test_if_without_else_followed_by_tail_return() {
    let (_, issues) = analyze_source(
        "int f(bool c) { if (c) return 1; return 0; }\nvoid main() { print(f(true)); }",
    );

    assert_eq!(issues, vec![]);
}

#[test]
fn test_while_body_may_never_run() {
    let (_, issues) = analyze_source(
        "int f() { while (true) { return 1; } }\nvoid main() { print(f()); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::MissingReturnStatement]);
}

#[test]
fn test_return_without_value_in_non_void() {
    let (_, issues) =
        analyze_source("int f() { return; }\nvoid main() { print(f()); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::ReturnWithoutValue]);
}

#[test]
fn test_return_with_value_in_void() {
    let (_, issues) = analyze_source("void f() { return 1; }\nvoid main() { f(); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::ReturnWithValueInVoid]);
}

#[test]
fn test_return_value_must_convert_to_return_type() {
    let (_, issues) =
        analyze_source("int f() { return \"no\"; }\nvoid main() { print(f()); }");

    assert_eq!(error_codes(&issues), vec![IssueCode::TypeMismatch]);
}

#[test]
fn test_nested_block_return_counts() {
    let (_, issues) =
        analyze_source("int f() { { return 1; } }\nvoid main() { print(f()); }");

    assert_eq!(issues, vec![]);
}

#[test]
fn test_unreachable_after_exhaustive_if_else() {
    let (_, issues) = analyze_source(
        "int f(bool c) { if (c) return 1; else return 2; print(0); }\n\
         void main() { print(f(true)); }",
    );

    assert_eq!(error_codes(&issues), vec![IssueCode::UnreachableCode]);
}

#[test]
fn test_void_function_needs_no_return() {
    let (_, issues) = analyze_source("void f() { print(1); }\nvoid main() { f(); }");

    assert_eq!(issues, vec![]);
}
