//! Tests for parser error recovery.
//!
//! The parser must never abort: malformed regions produce diagnostics while
//! later productions keep parsing, and enclosed productions synthesize their
//! missing closers.

use colang_ast::nodes::{GlobalDefinition, TranslationUnit};
use colang_diagnostic::{Issue, IssueCode};
use colang_source::types::{FileID, SourceFile};

fn parse(source: &str) -> (TranslationUnit, Vec<Issue>) {
    let file = SourceFile::new(FileID::new(1), "test.co".to_string(), source.to_string());
    colang_parser::parse_file(&file)
}

#[test]
fn test_missing_closing_braces_are_synthesized() {
    // Both the method body's `}` and the type body's `}` are missing.
    let (unit, issues) = parse("struct S { void m() { ");

    let missing: Vec<&Issue> =
        issues.iter().filter(|i| i.code == IssueCode::MissingToken).collect();
    assert!(missing.len() >= 2, "expected two missing-brace errors, got {issues:?}");

    // The translation unit still contains S with its method.
    let GlobalDefinition::Type(def) = &unit.definitions[0] else {
        panic!("expected a type definition");
    };
    assert_eq!(def.name.name, "S");
    let body = def.body.as_ref().unwrap();
    assert_eq!(body.methods.len(), 1);
    assert!(body.methods[0].body.is_some());
}

#[test]
fn test_synthesized_closer_sits_at_end_of_file() {
    let source = "void f() {";
    let (_, issues) = parse(source);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::MissingToken);
    assert!(issues[0].span.is_empty());
    assert_eq!(issues[0].span.start.offset, source.len());
}

#[test]
fn test_missing_type_name_is_synthesized() {
    let (unit, issues) = parse("struct { void m() { } } void f() { }");

    assert!(issues.iter().any(|i| i.code == IssueCode::MissingToken));

    // The nameless type is present, and the following function still parses.
    let GlobalDefinition::Type(def) = &unit.definitions[0] else {
        panic!("expected a type definition");
    };
    assert!(def.name.synthesized);
    assert!(matches!(unit.definitions[1], GlobalDefinition::Function(_)));
}

#[test]
fn test_missing_semicolon_keeps_the_definition() {
    let (unit, issues) = parse("int x = 1\nvoid f() { }");

    assert!(issues.iter().any(|i| i.code == IssueCode::MissingToken));
    assert_eq!(unit.definitions.len(), 2);
    assert!(matches!(unit.definitions[0], GlobalDefinition::Variable(_)));
    assert!(matches!(unit.definitions[1], GlobalDefinition::Function(_)));
}

#[test]
fn test_stray_tokens_between_definitions_are_skipped() {
    let (unit, issues) = parse("void f() { } ;;; void g() { }");

    assert!(issues.iter().all(|i| i.code == IssueCode::UnexpectedToken));
    assert_eq!(unit.definitions.len(), 2);
}

#[test]
fn test_missing_operand_is_reported_once() {
    let (_, issues) = parse("void f() { x = 1 + ; }");

    assert!(issues.iter().any(|i| i.code == IssueCode::MissingToken));
}

#[test]
fn test_missing_condition_paren_stops_quietly() {
    // `stop_if_absent` on `(`: one missing-token error, no cascade from the
    // skipped condition and body elements.
    let (_, issues) = parse("void f() { if x < 1 { return; } }");

    let missing =
        issues.iter().filter(|i| i.code == IssueCode::MissingToken).count();
    assert_eq!(missing, 1);
}

#[test]
fn test_parser_terminates_and_spans_stay_in_bounds_on_mangled_input() {
    // A corpus of truncations of a valid program: lexer + parser must
    // terminate and every reported span must lie within the file.
    let source = "struct S { int m(int x) { if (x < 1) { return 0; } return x; } }\n\
                  int add(int a, int b) { return a + b; }\n\
                  void main() { add(1, 2); }\n";

    for end in 0..source.len() {
        if !source.is_char_boundary(end) {
            continue;
        }

        let truncated = &source[..end];
        let file = SourceFile::new(
            FileID::new(1),
            "test.co".to_string(),
            truncated.to_string(),
        );
        let extent = file.extent();
        let (unit, issues) = colang_parser::parse_file(&file);

        assert!(extent.contains(&unit.span), "unit span escapes at cut {end}");
        for issue in &issues {
            assert!(extent.contains(&issue.span), "issue span escapes at cut {end}: {issue:?}");
        }
    }
}
