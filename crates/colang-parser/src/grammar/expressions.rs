//! Expression parsing: the three grammatical tiers.
//!
//! Primary expressions are atoms, secondary expressions apply postfix
//! operators left-to-right, and tertiary expressions combine binary infix
//! operators by precedence climbing over the table on
//! [`BinaryOp::precedence`]. Equal precedence groups left-associatively
//! except assignment, which groups to the right.

use colang_ast::nodes::{
    BinaryExpression,
    BinaryOp,
    BoolLiteral,
    CallExpression,
    Expression,
    FloatLiteral,
    Identifier,
    IntLiteral,
    MemberExpression,
    PostfixExpression,
    PostfixOp,
    StringLiteral,
    SubscriptExpression,
};
use colang_diagnostic::{Issue, IssueCode};

use crate::lexer::{TokenKind, TokenValue};
use crate::strategy::{
    DefiningOutcome,
    Group,
    ParseOutcome,
    TokenCursor,
    enclosed_sequence,
    single_token,
};

/// Parses one expression (the tertiary tier).
pub(crate) fn expression<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Expression> {
    binary_expression(cursor, 1)
}

/// Precedence-climbing loop over binary infix operators.
fn binary_expression<'a>(
    start: TokenCursor<'a>,
    min_precedence: u8,
) -> ParseOutcome<'a, Expression> {
    let (mut lhs, mut issues, mut cursor) = match secondary_expression(start) {
        ParseOutcome::Success { node, issues, cursor } => (node, issues, cursor),
        other => return other,
    };

    loop {
        let token = cursor.peek();
        let Some(op) = binary_op_of(token.kind) else { break };
        let precedence = op.precedence();
        if precedence < min_precedence {
            break;
        }

        let op_span = token.span;
        let next_min = if op.is_right_associative() { precedence } else { precedence + 1 };

        match binary_expression(cursor.advance(), next_min) {
            ParseOutcome::Success { node: rhs, issues: inner, cursor: next } => {
                issues.extend(inner);
                let span = lhs.span().combine(&rhs.span());
                lhs = Expression::Binary(BinaryExpression {
                    op,
                    op_span,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                });
                cursor = next;
            }
            ParseOutcome::Malformed { issues: inner, cursor: next } => {
                issues.extend(inner);
                return ParseOutcome::Malformed { issues, cursor: next };
            }
            ParseOutcome::NoMatch => {
                let after_op = cursor.advance();
                issues.push(Issue::error(
                    IssueCode::MissingToken,
                    after_op.gap(),
                    format!("missing expression after {}", op.symbol()),
                ));
                return ParseOutcome::Malformed { issues, cursor: after_op };
            }
        }
    }

    ParseOutcome::Success { node: lhs, issues, cursor }
}

/// Parses a primary expression followed by its postfix operators.
///
/// Postfix operators apply left-to-right: each one wraps the accumulated
/// expression, so `a.m(1)[2]++` folds as `((a.m)(1))[2] ++`.
fn secondary_expression<'a>(start: TokenCursor<'a>) -> ParseOutcome<'a, Expression> {
    let (mut expr, mut issues, mut cursor) = match primary_expression(start) {
        ParseOutcome::Success { node, issues, cursor } => (node, issues, cursor),
        other => return other,
    };

    loop {
        match cursor.peek().kind {
            TokenKind::LeftParen => {
                let ParseOutcome::Success { node: list, issues: inner, cursor: next } =
                    enclosed_sequence(cursor, TokenKind::LeftParen, &argument, TokenKind::RightParen)
                else {
                    break;
                };
                issues.extend(inner);
                let span = expr.span().combine(&list.span);
                expr = Expression::Call(CallExpression {
                    callee: Box::new(expr),
                    arguments: list.items,
                    span,
                });
                cursor = next;
            }
            TokenKind::Dot => {
                let after_dot = cursor.advance();
                let member = if after_dot.at(TokenKind::Identifier) {
                    let token = after_dot.peek();
                    cursor = after_dot.advance();
                    Identifier::new(token.lexeme, token.span)
                } else {
                    issues.push(Issue::error(
                        IssueCode::MissingToken,
                        after_dot.gap(),
                        "missing member name after `.`",
                    ));
                    cursor = after_dot;
                    Identifier::synthesized(after_dot.gap())
                };
                let span = expr.span().combine(&member.span);
                expr = Expression::Member(MemberExpression {
                    receiver: Box::new(expr),
                    member,
                    span,
                });
            }
            TokenKind::LeftBracket => {
                let after_open = cursor.advance();
                let index = match expression(after_open) {
                    ParseOutcome::Success { node, issues: inner, cursor: next } => {
                        issues.extend(inner);
                        cursor = next;
                        node
                    }
                    ParseOutcome::Malformed { issues: inner, cursor: next } => {
                        issues.extend(inner);
                        return ParseOutcome::Malformed { issues, cursor: next };
                    }
                    ParseOutcome::NoMatch => {
                        issues.push(Issue::error(
                            IssueCode::MissingToken,
                            after_open.gap(),
                            "missing index expression after `[`",
                        ));
                        return ParseOutcome::Malformed { issues, cursor: after_open };
                    }
                };

                let close = if cursor.at(TokenKind::RightBracket) {
                    let span = cursor.peek().span;
                    cursor = cursor.advance();
                    span
                } else {
                    let span = cursor.gap();
                    issues.push(Issue::error(
                        IssueCode::MissingToken,
                        span,
                        "expected closing `]`",
                    ));
                    span
                };

                let span = expr.span().combine(&close);
                expr = Expression::Subscript(SubscriptExpression {
                    receiver: Box::new(expr),
                    index: Box::new(index),
                    span,
                });
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let token = cursor.peek();
                let op = if token.kind == TokenKind::PlusPlus {
                    PostfixOp::Increment
                } else {
                    PostfixOp::Decrement
                };
                let span = expr.span().combine(&token.span);
                expr = Expression::Postfix(PostfixExpression {
                    target: Box::new(expr),
                    op,
                    span,
                });
                cursor = cursor.advance();
            }
            _ => break,
        }
    }

    ParseOutcome::Success { node: expr, issues, cursor }
}

/// Parses one call argument and its separating comma.
fn argument<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Expression> {
    let mut group = Group::new(cursor);
    let expr = match group.defining_committed(&expression) {
        DefiningOutcome::Matched(expr) => expr,
        DefiningOutcome::Absent => return ParseOutcome::NoMatch,
        DefiningOutcome::Broken => return group.finish_malformed(),
    };

    if group.eat_token(TokenKind::Comma).is_none()
        && !group.cursor().at(TokenKind::RightParen)
        && !group.cursor().is_at_end()
    {
        let _ = group.expect_token(TokenKind::Comma, "`,` between arguments");
    }

    group.finish(expr)
}

/// Parses an atom: a literal, an identifier reference, or a parenthesized
/// expression (which folds to its inner node).
fn primary_expression<'a>(cursor: TokenCursor<'a>) -> ParseOutcome<'a, Expression> {
    let token = cursor.peek();

    match token.kind {
        TokenKind::IntLiteral => {
            let value = match &token.value {
                TokenValue::Int(value) => *value,
                _ => 0,
            };
            ParseOutcome::success(
                Expression::IntLiteral(IntLiteral { value, span: token.span }),
                cursor.advance(),
            )
        }
        TokenKind::FloatLiteral => {
            let value = match &token.value {
                TokenValue::Float(value) => *value,
                _ => 0.0,
            };
            ParseOutcome::success(
                Expression::FloatLiteral(FloatLiteral { value, span: token.span }),
                cursor.advance(),
            )
        }
        TokenKind::StringLiteral => {
            let value = match &token.value {
                TokenValue::Str(value) => value.clone(),
                _ => String::new(),
            };
            ParseOutcome::success(
                Expression::StringLiteral(StringLiteral { value, span: token.span }),
                cursor.advance(),
            )
        }
        TokenKind::True | TokenKind::False => ParseOutcome::success(
            Expression::BoolLiteral(BoolLiteral {
                value: token.kind == TokenKind::True,
                span: token.span,
            }),
            cursor.advance(),
        ),
        TokenKind::Identifier => ParseOutcome::success(
            Expression::Reference(Identifier::new(token.lexeme, token.span)),
            cursor.advance(),
        ),
        TokenKind::LeftParen => {
            let mut group = Group::new(cursor);
            let Some(_open) = group.defining(&single_token(TokenKind::LeftParen)) else {
                return ParseOutcome::NoMatch;
            };
            let inner = group.required(&expression, "expression after `(`");
            let _ = group.expect_token(TokenKind::RightParen, "`)` after expression");

            match inner {
                Some(expr) => group.finish(expr),
                None => group.finish_malformed(),
            }
        }
        _ => ParseOutcome::NoMatch,
    }
}

/// Maps a token to its binary operator, if it is one.
const fn binary_op_of(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Assign => Some(BinaryOp::Assign),
        TokenKind::OrOr => Some(BinaryOp::Or),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::Equal => Some(BinaryOp::Eq),
        TokenKind::NotEqual => Some(BinaryOp::NotEq),
        TokenKind::LessThan => Some(BinaryOp::Less),
        TokenKind::LessEqual => Some(BinaryOp::LessEq),
        TokenKind::GreaterThan => Some(BinaryOp::Greater),
        TokenKind::GreaterEqual => Some(BinaryOp::GreaterEq),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        _ => None,
    }
}
