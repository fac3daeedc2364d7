//! Top-level definition parsing: translation units, types, functions, variables.

use colang_ast::nodes::{
    FunctionDefinition,
    GlobalDefinition,
    Identifier,
    Parameter,
    ParameterList,
    Specifier,
    SpecifierKind,
    TranslationUnit,
    TypeBody,
    TypeDefinition,
    TypeExpression,
    VariableDefinition,
};
use colang_diagnostic::{Issue, IssueCode};

use super::{code_block, expression};
use crate::lexer::{Token, TokenKind};
use crate::strategy::{
    Group,
    ParseOutcome,
    StrategyUnion,
    TokenCursor,
    enclosed_sequence,
    identifier,
    single_token,
};

/// Parses a whole token stream into a translation unit.
///
/// Never fails: stray tokens between definitions are reported and skipped, so
/// the cursor always reaches the end-of-file token.
#[must_use]
pub fn parse_translation_unit<'a>(tokens: &'a [Token<'a>]) -> (TranslationUnit, Vec<Issue>) {
    let mut cursor = TokenCursor::new(tokens);
    let full_span = cursor.peek().span.combine(&tokens[tokens.len() - 1].span);
    let mut definitions = Vec::new();
    let mut issues = Vec::new();

    while !cursor.is_at_end() {
        match global_definition(cursor) {
            ParseOutcome::Success { node, issues: inner, cursor: next } => {
                definitions.push(node);
                issues.extend(inner);
                cursor = progress(cursor, next);
            }
            ParseOutcome::Malformed { issues: inner, cursor: next } => {
                issues.extend(inner);
                cursor = progress(cursor, next);
            }
            ParseOutcome::NoMatch => {
                let token = cursor.peek();
                issues.push(Issue::error(
                    IssueCode::UnexpectedToken,
                    token.span,
                    format!("expected a definition, found {}", token.kind.describe()),
                ));
                cursor = cursor.advance();
            }
        }
    }

    (TranslationUnit { definitions, span: full_span }, issues)
}

/// Dispatches one global symbol definition.
///
/// The union order is what disambiguates: a `struct` keyword anchors a type,
/// a parenthesis after `Type name` anchors a function, and `=` or `;` after
/// `Type name` anchors a variable.
pub(crate) fn global_definition<'a>(
    cursor: TokenCursor<'a>,
) -> ParseOutcome<'a, GlobalDefinition> {
    let as_type = |c: TokenCursor<'a>| type_definition(c).map(GlobalDefinition::Type);
    let as_function = |c: TokenCursor<'a>| function_definition(c).map(GlobalDefinition::Function);
    let as_variable = |c: TokenCursor<'a>| variable_definition(c).map(GlobalDefinition::Variable);

    StrategyUnion::new(&[&as_type, &as_function, &as_variable]).apply(cursor)
}

/// Parses `[specifiers] struct Name [{ methods }] [;]`.
fn type_definition<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, TypeDefinition> {
    let (specifiers, specifier_issues, cursor) = specifier_list(cursor);

    let mut group = Group::new(cursor);
    let Some(struct_token) = group.defining(&single_token(TokenKind::Struct)) else {
        return ParseOutcome::NoMatch;
    };
    for issue in specifier_issues {
        group.report(issue);
    }

    let name = group.required_or(&identifier, "type name", Identifier::synthesized);
    let body = group.optional(&type_body);

    let end_span = if body.is_none() {
        group.expect_token(TokenKind::Semicolon, "`;` after type definition")
    } else {
        group.eat_token(TokenKind::Semicolon)
    };

    let start = specifiers.first().map_or(struct_token.span, |s| s.span);
    let end = end_span
        .or_else(|| body.as_ref().map(|b| b.span))
        .unwrap_or(name.span);

    group.finish(TypeDefinition { specifiers, name, body, span: start.combine(&end) })
}

/// Parses a brace-delimited method list.
fn type_body<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, TypeBody> {
    enclosed_sequence(cursor, TokenKind::LeftBrace, &function_definition, TokenKind::RightBrace)
        .map(|body| TypeBody { methods: body.items, span: body.span })
}

/// Parses `[specifiers] ReturnType name ( params ) { body }` or the native
/// form terminated by `;`.
pub(crate) fn function_definition<'a>(
    cursor: TokenCursor<'a>,
) -> ParseOutcome<'a, FunctionDefinition> {
    let (specifiers, specifier_issues, after_specifiers) = specifier_list(cursor);

    let mut group = Group::new(after_specifiers);
    let Some(return_type) = group.defining(&type_expression) else {
        return ParseOutcome::NoMatch;
    };
    let Some(name) = group.defining(&identifier) else {
        return ParseOutcome::NoMatch;
    };

    // The parenthesized parameter list is the defining anchor that separates
    // a function from a variable definition.
    if !group.cursor().at(TokenKind::LeftParen) {
        return ParseOutcome::NoMatch;
    }
    for issue in specifier_issues {
        group.report(issue);
    }

    let Some(parameters) = group.defining(&parameter_list) else {
        return ParseOutcome::NoMatch;
    };

    let body = group.optional(&code_block);
    let end_span = if body.is_none() {
        group.expect_token(TokenKind::Semicolon, "`;` after function without a body")
    } else {
        None
    };

    let start = specifiers.first().map_or(return_type.span, |s| s.span);
    let end = end_span
        .or_else(|| body.as_ref().map(|b| b.span))
        .unwrap_or(parameters.span);

    group.finish(FunctionDefinition {
        specifiers,
        return_type,
        name,
        parameters,
        body,
        span: start.combine(&end),
    })
}

/// Parses `( Type name, ... )`.
fn parameter_list<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, ParameterList> {
    enclosed_sequence(cursor, TokenKind::LeftParen, &parameter, TokenKind::RightParen)
        .map(|list| ParameterList { parameters: list.items, span: list.span })
}

/// Parses one `Type [name]` parameter and its separating comma.
///
/// The name is optional: native declarations conventionally leave their
/// parameters unnamed. A nameless parameter is simply unbindable in a body.
fn parameter<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Parameter> {
    let mut group = Group::new(cursor);
    let Some(ty) = group.defining(&type_expression) else {
        return ParseOutcome::NoMatch;
    };
    let name =
        group.optional(&identifier).unwrap_or_else(|| Identifier::synthesized(group.gap()));

    if group.eat_token(TokenKind::Comma).is_none()
        && !group.cursor().at(TokenKind::RightParen)
        && !group.cursor().is_at_end()
    {
        let _ = group.expect_token(TokenKind::Comma, "`,` between parameters");
    }

    let span = ty.span.combine(&name.span);
    group.finish(Parameter { ty, name, span })
}

/// Parses `[specifiers] Type name [= initializer] ;`.
///
/// The `=` or `;` after the name is the defining anchor; without it the
/// production does not commit, letting a function definition (or nothing)
/// claim the tokens.
pub(crate) fn variable_definition<'a>(
    cursor: TokenCursor<'a>,
) -> ParseOutcome<'a, VariableDefinition> {
    let (mut specifiers, specifier_issues, after_specifiers) = specifier_list(cursor);

    let mut group = Group::new(after_specifiers);
    let Some(ty) = group.defining(&type_expression) else {
        return ParseOutcome::NoMatch;
    };
    let Some(name) = group.defining(&identifier) else {
        return ParseOutcome::NoMatch;
    };

    if !group.cursor().at(TokenKind::Assign) && !group.cursor().at(TokenKind::Semicolon) {
        return ParseOutcome::NoMatch;
    }
    for issue in specifier_issues {
        group.report(issue);
    }

    // No specifier is legal on a variable; report and discard them.
    for specifier in specifiers.drain(..) {
        group.report(Issue::error(
            IssueCode::IllegalSpecifier,
            specifier.span,
            "`native` is not legal on a variable definition",
        ));
    }

    let initializer = if group.eat_token(TokenKind::Assign).is_some() {
        group.required(&expression, "initializer expression")
    } else {
        None
    };

    let end_span = group.expect_token(TokenKind::Semicolon, "`;` after variable definition");

    let start = ty.span;
    let end = end_span
        .or_else(|| initializer.as_ref().map(|e| e.span()))
        .unwrap_or(name.span);

    group.finish(VariableDefinition {
        specifiers,
        ty,
        name,
        initializer,
        span: start.combine(&end),
    })
}

/// Parses a bare type name into a type expression.
pub(crate) fn type_expression<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, TypeExpression> {
    identifier(cursor).map(|name| TypeExpression { span: name.span, name })
}

/// Collects leading specifiers into a set, warning on duplicates.
fn specifier_list<'a>(
    start: TokenCursor<'a>,
) -> (Vec<Specifier>, Vec<Issue>, TokenCursor<'a>) {
    let mut specifiers: Vec<Specifier> = Vec::new();
    let mut issues = Vec::new();
    let mut cursor = start;

    while cursor.at(TokenKind::Native) {
        let span = cursor.peek().span;
        if specifiers.iter().any(|s| s.kind == SpecifierKind::Native) {
            issues.push(Issue::warning(
                IssueCode::DuplicateSpecifier,
                span,
                "duplicate `native` specifier",
            ));
        } else {
            specifiers.push(Specifier { kind: SpecifierKind::Native, span });
        }
        cursor = cursor.advance();
    }

    (specifiers, issues, cursor)
}

/// Advances past a region a sub-parse failed to consume.
fn progress<'a>(before: TokenCursor<'a>, after: TokenCursor<'a>) -> TokenCursor<'a> {
    if after.position() > before.position() || before.is_at_end() { after } else { before.advance() }
}
