//! Return-flow checking.
//!
//! For every function with a non-void return type, proves that every path
//! through the body returns, and flags statements after a statically
//! guaranteed return as unreachable.
//!
//! The analysis is a structural fold: each statement yields either
//! `WillReturn` (with the returned value type, when one is known) or
//! `WontReturn`. CO has no `break` or `continue`, so the fold is exact:
//!
//! - an `if` without an `else` never guarantees a return (the branch's
//!   issues are kept, its return knowledge deliberately dropped);
//! - an `if`/`else` guarantees a return iff both branches do, and the
//!   inferred value type is the least upper bound of the branches';
//! - a `while` never guarantees a return, since the body may never run.

use colang_diagnostic::{Issue, IssueCode};

use crate::program::{Program, TypeId, TypedBlock, TypedStatement};

/// Whether a statement guarantees a return on every path through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Every path returns; carries the value type when one is inferable
    WillReturn(Option<TypeId>),
    /// Some path falls through
    WontReturn,
}

/// Checks one function body.
///
/// Emits `ReturnWithoutValue` for bare `return;` in a non-void function,
/// `UnreachableCode` for statements after a guaranteed return, and
/// `MissingReturnStatement`, anchored immediately before the body's closing
/// brace, when a non-void function can fall off the end.
#[must_use]
pub fn check_function(
    program: &Program,
    void: TypeId,
    function_name: &str,
    return_type: TypeId,
    body: &TypedBlock,
) -> Vec<Issue> {
    let mut checker = ReturnChecker { program, void, return_type, issues: Vec::new() };

    let flow = checker.block_flow(body);
    let needs_return = return_type != void && !program.is_error(return_type);
    if flow == Flow::WontReturn && needs_return {
        checker.issues.push(Issue::error(
            IssueCode::MissingReturnStatement,
            body.close_span.before(),
            format!(
                "missing return statement: `{function_name}` must return `{}` on every path",
                program.ty(return_type).name
            ),
        ));
    }

    checker.issues
}

struct ReturnChecker<'p> {
    program: &'p Program,
    void: TypeId,
    return_type: TypeId,
    issues: Vec<Issue>,
}

impl ReturnChecker<'_> {
    /// Folds a block left-to-right; everything after the first guaranteed
    /// return is unreachable.
    fn block_flow(&mut self, block: &TypedBlock) -> Flow {
        let mut flow = Flow::WontReturn;

        for statement in &block.statements {
            if let Flow::WillReturn(_) = flow {
                self.issues.push(Issue::error(
                    IssueCode::UnreachableCode,
                    statement.span(),
                    "unreachable code",
                ));
                continue;
            }

            flow = self.statement_flow(statement);
        }

        flow
    }

    fn statement_flow(&mut self, statement: &TypedStatement) -> Flow {
        match statement {
            TypedStatement::Return(ret) => match &ret.value {
                Some(value) => Flow::WillReturn(Some(value.ty)),
                None => {
                    let needs_value =
                        self.return_type != self.void && !self.program.is_error(self.return_type);
                    if needs_value {
                        self.issues.push(Issue::error(
                            IssueCode::ReturnWithoutValue,
                            ret.span,
                            format!(
                                "return without a value in a function returning `{}`",
                                self.program.ty(self.return_type).name
                            ),
                        ));
                    }
                    Flow::WillReturn(None)
                }
            },
            TypedStatement::If(stmt) => match &stmt.else_branch {
                None => {
                    // Conservative: without an else, the then-branch's return
                    // knowledge is dropped, but its issues are kept.
                    let _ = self.statement_flow(&stmt.then_branch);
                    Flow::WontReturn
                }
                Some(else_branch) => {
                    let then_flow = self.statement_flow(&stmt.then_branch);
                    let else_flow = self.statement_flow(else_branch);

                    match (then_flow, else_flow) {
                        (Flow::WillReturn(a), Flow::WillReturn(b)) => {
                            let value = match (a, b) {
                                (Some(a), Some(b)) => self.program.lub(a, b),
                                _ => None,
                            };
                            Flow::WillReturn(value)
                        }
                        _ => Flow::WontReturn,
                    }
                }
            },
            TypedStatement::While(stmt) => {
                // The loop body may never run.
                let _ = self.statement_flow(&stmt.body);
                Flow::WontReturn
            }
            TypedStatement::Block(block) => self.block_flow(block),
            TypedStatement::Variable(_) | TypedStatement::Expression(_) => Flow::WontReturn,
        }
    }
}
