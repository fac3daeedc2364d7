//! Statement parsing.

use colang_ast::nodes::{
    CodeBlock,
    ExpressionStatement,
    IfStatement,
    ReturnStatement,
    Statement,
    WhileStatement,
};

use super::definitions::variable_definition;
use super::expressions::expression;
use crate::lexer::TokenKind;
use crate::strategy::{
    DefiningOutcome,
    Group,
    ParseOutcome,
    StrategyUnion,
    TokenCursor,
    enclosed_sequence,
    single_token,
};

/// Dispatches one statement.
pub(crate) fn statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Statement> {
    let as_block = |c: TokenCursor<'a>| code_block(c).map(Statement::Block);
    let as_if = |c: TokenCursor<'a>| if_statement(c).map(Statement::If);
    let as_while = |c: TokenCursor<'a>| while_statement(c).map(Statement::While);
    let as_return = |c: TokenCursor<'a>| return_statement(c).map(Statement::Return);
    let as_variable = |c: TokenCursor<'a>| variable_definition(c).map(Statement::Variable);
    let as_expression = |c: TokenCursor<'a>| expression_statement(c).map(Statement::Expression);

    StrategyUnion::new(&[&as_block, &as_if, &as_while, &as_return, &as_variable, &as_expression])
        .apply(cursor)
}

/// Parses a brace-delimited statement sequence.
pub(crate) fn code_block<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, CodeBlock> {
    enclosed_sequence(cursor, TokenKind::LeftBrace, &synced_statement, TokenKind::RightBrace).map(
        |block| CodeBlock { statements: block.items, close_span: block.close_span, span: block.span },
    )
}

/// A statement that resynchronizes after going malformed.
///
/// Skipping to the next statement boundary keeps the leftovers of a broken
/// statement from being reinterpreted as fresh statements, which would turn
/// one mistake into a cascade.
fn synced_statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Statement> {
    match statement(cursor) {
        ParseOutcome::Malformed { issues, mut cursor } => {
            while !cursor.is_at_end()
                && !cursor.at(TokenKind::RightBrace)
                && !starts_statement(cursor.peek().kind)
            {
                let at_terminator = cursor.at(TokenKind::Semicolon);
                cursor = cursor.advance();
                if at_terminator {
                    break;
                }
            }

            ParseOutcome::Malformed { issues, cursor }
        }
        other => other,
    }
}

/// Tokens that can begin a statement, used as recovery synchronization
/// points.
const fn starts_statement(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::If | TokenKind::While | TokenKind::Return | TokenKind::LeftBrace)
}

/// Parses `if ( cond ) stmt [else stmt]`.
fn if_statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, IfStatement> {
    let boxed_statement = |c: TokenCursor<'a>| statement(c).map(Box::new);

    let mut group = Group::new(cursor);
    let Some(if_token) = group.defining(&single_token(TokenKind::If)) else {
        return ParseOutcome::NoMatch;
    };

    if group.required_stop(&single_token(TokenKind::LeftParen), "`(` after `if`").is_none() {
        return group.finish_malformed();
    }
    let condition = group.required(&expression, "condition expression");
    let _ = group.expect_token(TokenKind::RightParen, "`)` after condition");
    let then_branch = group.required(&boxed_statement, "statement after `if`");

    let else_branch = if group.eat_token(TokenKind::Else).is_some() {
        group.required(&boxed_statement, "statement after `else`")
    } else {
        None
    };

    let (Some(condition), Some(then_branch)) = (condition, then_branch) else {
        return group.finish_malformed();
    };

    let end = else_branch.as_ref().map_or(then_branch.span(), |e| e.span());
    let span = if_token.span.combine(&end);
    group.finish(IfStatement { condition, then_branch, else_branch, span })
}

/// Parses `while ( cond ) stmt`.
fn while_statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, WhileStatement> {
    let boxed_statement = |c: TokenCursor<'a>| statement(c).map(Box::new);

    let mut group = Group::new(cursor);
    let Some(while_token) = group.defining(&single_token(TokenKind::While)) else {
        return ParseOutcome::NoMatch;
    };

    if group.required_stop(&single_token(TokenKind::LeftParen), "`(` after `while`").is_none() {
        return group.finish_malformed();
    }
    let condition = group.required(&expression, "condition expression");
    let _ = group.expect_token(TokenKind::RightParen, "`)` after condition");
    let body = group.required(&boxed_statement, "loop body");

    let (Some(condition), Some(body)) = (condition, body) else {
        return group.finish_malformed();
    };

    let span = while_token.span.combine(&body.span());
    group.finish(WhileStatement { condition, body, span })
}

/// Parses `return [expr] ;`.
fn return_statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, ReturnStatement> {
    let mut group = Group::new(cursor);
    let Some(return_token) = group.defining(&single_token(TokenKind::Return)) else {
        return ParseOutcome::NoMatch;
    };

    let value = group.optional(&expression);
    let end_span = group.expect_token(TokenKind::Semicolon, "`;` after return statement");

    let end = end_span
        .or_else(|| value.as_ref().map(|v| v.span()))
        .unwrap_or(return_token.span);

    let span = return_token.span.combine(&end);
    group.finish(ReturnStatement { value, span })
}

/// Parses `expr ;`.
fn expression_statement<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, ExpressionStatement> {
    let mut group = Group::new(cursor);
    let expr = match group.defining_committed(&expression) {
        DefiningOutcome::Matched(expr) => expr,
        DefiningOutcome::Absent => return ParseOutcome::NoMatch,
        DefiningOutcome::Broken => return group.finish_malformed(),
    };

    let end_span = group.expect_token(TokenKind::Semicolon, "`;` after expression");

    let span = expr.span().combine(&end_span.unwrap_or_else(|| expr.span()));
    group.finish(ExpressionStatement { expression: expr, span })
}
