//! Tests for the concrete grammar: definitions, statements, expressions.

use colang_ast::nodes::{
    BinaryOp,
    Expression,
    GlobalDefinition,
    SpecifierKind,
    Statement,
    TranslationUnit,
};
use colang_diagnostic::{Issue, IssueCode, Severity};
use pretty_assertions::assert_eq;
use colang_source::types::{FileID, SourceFile};

fn parse(source: &str) -> (TranslationUnit, Vec<Issue>) {
    let file = SourceFile::new(FileID::new(1), "test.co".to_string(), source.to_string());
    colang_parser::parse_file(&file)
}

fn parse_clean(source: &str) -> TranslationUnit {
    let (unit, issues) = parse(source);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    unit
}

/// The body of `void f() { <fragment> }`, for statement-level tests.
fn parse_statement(fragment: &str) -> Statement {
    let unit = parse_clean(&format!("void f() {{ {fragment} }}"));
    let GlobalDefinition::Function(def) = &unit.definitions[0] else {
        panic!("expected a function definition");
    };
    def.body.as_ref().unwrap().statements[0].clone()
}

/// The expression of `void f() { <fragment>; }`.
fn parse_expression(fragment: &str) -> Expression {
    match parse_statement(&format!("{fragment};")) {
        Statement::Expression(stmt) => stmt.expression,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn test_function_definition() {
    let unit = parse_clean("int add(int a, int b) { return a + b; }");

    let GlobalDefinition::Function(def) = &unit.definitions[0] else {
        panic!("expected a function definition");
    };
    assert_eq!(def.name.name, "add");
    assert_eq!(def.return_type.name.name, "int");
    assert_eq!(def.parameters.parameters.len(), 2);
    assert_eq!(def.parameters.parameters[1].name.name, "b");
    assert_eq!(def.body.as_ref().unwrap().statements.len(), 1);
}

#[test]
fn test_native_function_definition() {
    let unit = parse_clean("native void print(int);");

    let GlobalDefinition::Function(def) = &unit.definitions[0] else {
        panic!("expected a function definition");
    };
    assert!(def.specifiers.iter().any(|s| s.kind == SpecifierKind::Native));
    assert!(def.body.is_none());
}

#[test]
fn test_type_definition_with_methods() {
    let unit = parse_clean("struct Counter { int next(int c) { return c + 1; } void reset() { } }");

    let GlobalDefinition::Type(def) = &unit.definitions[0] else {
        panic!("expected a type definition");
    };
    assert_eq!(def.name.name, "Counter");
    let body = def.body.as_ref().unwrap();
    assert_eq!(body.methods.len(), 2);
    assert_eq!(body.methods[0].name.name, "next");
    assert_eq!(body.methods[1].name.name, "reset");
}

#[test]
fn test_native_type_definition() {
    let unit = parse_clean("native struct int;");

    let GlobalDefinition::Type(def) = &unit.definitions[0] else {
        panic!("expected a type definition");
    };
    assert!(def.body.is_none());
    assert!(def.specifiers.iter().any(|s| s.kind == SpecifierKind::Native));
}

#[test]
fn test_global_variable_definition() {
    let unit = parse_clean("int answer = 42;");

    let GlobalDefinition::Variable(def) = &unit.definitions[0] else {
        panic!("expected a variable definition");
    };
    assert_eq!(def.name.name, "answer");
    assert!(def.initializer.is_some());
}

#[test]
fn test_duplicate_specifier_warns() {
    let (unit, issues) = parse("native native struct int;");

    assert_eq!(unit.definitions.len(), 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::DuplicateSpecifier);
    assert_eq!(issues[0].severity, Severity::Warning);
}

#[test]
fn test_native_on_variable_is_an_error_and_discarded() {
    let (unit, issues) = parse("native int x = 1;");

    let GlobalDefinition::Variable(def) = &unit.definitions[0] else {
        panic!("expected a variable definition");
    };
    assert!(def.specifiers.is_empty());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, IssueCode::IllegalSpecifier);
}

#[test]
fn test_assignment_is_right_associative() {
    let Expression::Binary(outer) = parse_expression("a = b = c") else {
        panic!("expected a binary expression");
    };

    assert_eq!(outer.op, BinaryOp::Assign);
    assert!(matches!(*outer.lhs, Expression::Reference(_)));
    let Expression::Binary(inner) = *outer.rhs else {
        panic!("expected the right operand to be the nested assignment");
    };
    assert_eq!(inner.op, BinaryOp::Assign);
}

#[test]
fn test_precedence_multiplication_binds_tighter_than_addition() {
    let Expression::Binary(outer) = parse_expression("a + b * c") else {
        panic!("expected a binary expression");
    };

    assert_eq!(outer.op, BinaryOp::Add);
    let Expression::Binary(inner) = *outer.rhs else {
        panic!("expected the right operand to be the product");
    };
    assert_eq!(inner.op, BinaryOp::Mul);
}

#[test]
fn test_equal_precedence_groups_left() {
    let Expression::Binary(outer) = parse_expression("a - b - c") else {
        panic!("expected a binary expression");
    };

    assert_eq!(outer.op, BinaryOp::Sub);
    let Expression::Binary(inner) = *outer.lhs else {
        panic!("expected the left operand to be the nested subtraction");
    };
    assert_eq!(inner.op, BinaryOp::Sub);
}

#[test]
fn test_postfix_operators_fold_left_to_right() {
    // ((f(1))(2)): a call of a call.
    let Expression::Call(outer) = parse_expression("f(1)(2)") else {
        panic!("expected a call");
    };
    let Expression::Call(inner) = *outer.callee else {
        panic!("expected the callee to be the first call");
    };
    assert!(matches!(*inner.callee, Expression::Reference(_)));
}

#[test]
fn test_method_call_shape() {
    let Expression::Call(call) = parse_expression("a.m(1, 2)") else {
        panic!("expected a call");
    };
    assert_eq!(call.arguments.len(), 2);

    let Expression::Member(member) = *call.callee else {
        panic!("expected a member callee");
    };
    assert_eq!(member.member.name, "m");
}

#[test]
fn test_subscript_and_increment() {
    let Expression::Postfix(postfix) = parse_expression("a[1]++") else {
        panic!("expected a postfix expression");
    };
    assert!(matches!(*postfix.target, Expression::Subscript(_)));
}

#[test]
fn test_parenthesized_expression_overrides_precedence() {
    let Expression::Binary(outer) = parse_expression("(a + b) * c") else {
        panic!("expected a binary expression");
    };

    assert_eq!(outer.op, BinaryOp::Mul);
    assert!(matches!(*outer.lhs, Expression::Binary(_)));
}

#[test]
fn test_if_else_and_while() {
    let Statement::If(stmt) = parse_statement("if (a < b) { f(); } else g();") else {
        panic!("expected an if statement");
    };
    assert!(stmt.else_branch.is_some());

    let Statement::While(stmt) = parse_statement("while (true) { }") else {
        panic!("expected a while statement");
    };
    assert!(matches!(*stmt.body, Statement::Block(_)));
}

#[test]
fn test_local_variable_statement() {
    let Statement::Variable(def) = parse_statement("double d = 1.5;") else {
        panic!("expected a variable definition");
    };
    assert_eq!(def.ty.name.name, "double");
    assert_eq!(def.name.name, "d");
}

#[test]
fn test_every_node_span_is_inside_the_file() {
    let source = "struct S { int m(int x) { if (x < 1) return 0; return x; } }\nint g = 2;\n";
    let file = SourceFile::new(FileID::new(1), "test.co".to_string(), source.to_string());
    let extent = file.extent();
    let (unit, issues) = colang_parser::parse_file(&file);

    assert!(issues.is_empty());
    assert!(extent.contains(&unit.span));
    for definition in &unit.definitions {
        assert!(extent.contains(&definition.span()));
    }
}
