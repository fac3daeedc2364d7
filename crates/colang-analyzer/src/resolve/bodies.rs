//! Phase 2: statement and expression resolution.
//!
//! Everything here is best-effort: an unresolvable expression becomes an
//! error-typed placeholder and analysis continues, so one mistake produces
//! one diagnostic instead of a cascade.

use colang_ast::nodes as ast;
use colang_ast::nodes::BinaryOp;
use colang_diagnostic::{Issue, IssueCode, Note};
use colang_source::types::SourceSpan;

use super::Analyzer;
use super::overloads::{OverloadOutcome, resolve_overload};
use crate::program::{
    ExpressionKind,
    FunctionId,
    TypeId,
    TypedBlock,
    TypedExpression,
    TypedIf,
    TypedReturn,
    TypedStatement,
    TypedVariableInit,
    TypedWhile,
    Variable,
    VariableKind,
};
use crate::scope::SymbolEntry;

impl Analyzer {
    /// Resolves a code block in a fresh child scope.
    pub(crate) fn resolve_block(&mut self, block: &ast::CodeBlock) -> TypedBlock {
        self.scopes.push();
        let statements =
            block.statements.iter().map(|stmt| self.resolve_statement(stmt)).collect();
        self.scopes.pop();

        TypedBlock { statements, close_span: block.close_span, span: block.span }
    }

    /// Resolves one statement.
    fn resolve_statement(&mut self, stmt: &ast::Statement) -> TypedStatement {
        match stmt {
            ast::Statement::Block(block) => TypedStatement::Block(self.resolve_block(block)),
            ast::Statement::If(stmt) => self.resolve_if(stmt),
            ast::Statement::While(stmt) => self.resolve_while(stmt),
            ast::Statement::Return(stmt) => self.resolve_return(stmt),
            ast::Statement::Variable(def) => self.resolve_local_variable(def),
            ast::Statement::Expression(stmt) => {
                TypedStatement::Expression(self.resolve_expression(&stmt.expression))
            }
        }
    }

    /// Resolves an `if`, requiring a boolean condition but analyzing the
    /// branches regardless.
    fn resolve_if(&mut self, stmt: &ast::IfStatement) -> TypedStatement {
        let condition = self.resolve_condition(&stmt.condition, "`if` condition");
        let then_branch = Box::new(self.resolve_statement(&stmt.then_branch));
        let else_branch =
            stmt.else_branch.as_ref().map(|s| Box::new(self.resolve_statement(s)));

        TypedStatement::If(TypedIf { condition, then_branch, else_branch, span: stmt.span })
    }

    /// Resolves a `while`, requiring a boolean condition.
    fn resolve_while(&mut self, stmt: &ast::WhileStatement) -> TypedStatement {
        let condition = self.resolve_condition(&stmt.condition, "`while` condition");
        let body = Box::new(self.resolve_statement(&stmt.body));

        TypedStatement::While(TypedWhile { condition, body, span: stmt.span })
    }

    /// Resolves a condition expression and checks it is `bool`.
    fn resolve_condition(&mut self, condition: &ast::Expression, what: &str) -> TypedExpression {
        let resolved = self.resolve_expression(condition);
        if !self.program.is_error(resolved.ty) && resolved.ty != self.builtins.bool_ {
            self.issues.push(Issue::error(
                IssueCode::TypeMismatch,
                resolved.span,
                format!("{what} must be `bool`, found `{}`", self.type_name(resolved.ty)),
            ));
        }

        resolved
    }

    /// Resolves a `return`, coercing the value to the function's return type.
    ///
    /// A value in a `void` function is reported here; a missing value in a
    /// non-void function is the return-flow checker's concern.
    fn resolve_return(&mut self, stmt: &ast::ReturnStatement) -> TypedStatement {
        let value = stmt.value.as_ref().map(|value| {
            let resolved = self.resolve_expression(value);
            let void = self.builtins.void;
            if self.current_return_type == void && !self.program.is_error(void) {
                self.issues.push(Issue::error(
                    IssueCode::ReturnWithValueInVoid,
                    resolved.span,
                    "cannot return a value from a function returning `void`",
                ));
                resolved
            } else {
                self.coerce(resolved, self.current_return_type, "return value")
            }
        });

        TypedStatement::Return(TypedReturn { value, span: stmt.span })
    }

    /// Resolves a local variable definition.
    fn resolve_local_variable(&mut self, def: &ast::VariableDefinition) -> TypedStatement {
        let ty = self.resolve_type_expression(&def.ty);
        let id = self.program.add_variable(Variable {
            name: def.name.name.clone(),
            ty,
            kind: VariableKind::Local,
            initializer: None,
            def_span: def.name.span,
        });

        if !def.name.synthesized {
            let scope = self.scopes.leaf();
            if let Err(error) = scope.define_variable(&self.program, &def.name.name, id, def.name.span)
            {
                self.issues.push(error.into());
            }
        }

        let initializer = def.initializer.as_ref().map(|init| {
            let resolved = self.resolve_expression(init);
            self.coerce(resolved, ty, "variable initializer")
        });

        TypedStatement::Variable(TypedVariableInit { variable: id, initializer, span: def.span })
    }

    /// Resolves one expression; the result always carries a type.
    pub(crate) fn resolve_expression(&mut self, expr: &ast::Expression) -> TypedExpression {
        match expr {
            ast::Expression::IntLiteral(lit) => TypedExpression {
                kind: ExpressionKind::IntLiteral(lit.value),
                ty: self.builtins.int,
                span: lit.span,
            },
            ast::Expression::FloatLiteral(lit) => TypedExpression {
                kind: ExpressionKind::FloatLiteral(lit.value),
                ty: self.builtins.double,
                span: lit.span,
            },
            ast::Expression::StringLiteral(lit) => TypedExpression {
                kind: ExpressionKind::StringLiteral(lit.value.clone()),
                ty: self.builtins.string,
                span: lit.span,
            },
            ast::Expression::BoolLiteral(lit) => TypedExpression {
                kind: ExpressionKind::BoolLiteral(lit.value),
                ty: self.builtins.bool_,
                span: lit.span,
            },
            ast::Expression::Reference(ident) => self.resolve_reference(ident, true),
            ast::Expression::Call(call) => self.resolve_call(call),
            ast::Expression::Member(member) => {
                // CO types have no fields; a member access is only meaningful
                // as the callee of a method call.
                let receiver = self.resolve_expression(&member.receiver);
                if !self.program.is_error(receiver.ty) && !member.member.synthesized {
                    self.issues.push(Issue::error(
                        IssueCode::UnknownMethod,
                        member.span,
                        format!(
                            "method `{}` of type `{}` must be called",
                            member.member.name,
                            self.type_name(receiver.ty)
                        ),
                    ));
                }
                self.error_expression(member.span)
            }
            ast::Expression::Subscript(subscript) => self.resolve_subscript(subscript),
            ast::Expression::Postfix(postfix) => self.resolve_postfix(postfix),
            ast::Expression::Binary(binary) => self.resolve_binary(binary),
        }
    }

    /// Resolves an identifier reference.
    ///
    /// `mark_used` is false for assignment targets, so write-only variables
    /// still get an unused warning.
    fn resolve_reference(&mut self, ident: &ast::Identifier, mark_used: bool) -> TypedExpression {
        if ident.synthesized {
            return self.error_expression(ident.span);
        }

        match self.scopes.lookup(&ident.name) {
            Some(SymbolEntry::Variable(id)) => {
                let id = *id;
                if mark_used {
                    let _ = self.used_variables.insert(id);
                }
                TypedExpression {
                    kind: ExpressionKind::Variable(id),
                    ty: self.program.variable(id).ty,
                    span: ident.span,
                }
            }
            Some(SymbolEntry::Type(_)) => {
                self.issues.push(Issue::error(
                    IssueCode::TypeMismatch,
                    ident.span,
                    format!("expected a value, found type `{}`", ident.name),
                ));
                self.error_expression(ident.span)
            }
            Some(SymbolEntry::Functions(_)) => {
                self.issues.push(Issue::error(
                    IssueCode::TypeMismatch,
                    ident.span,
                    format!("function `{}` used as a value; call it instead", ident.name),
                ));
                self.error_expression(ident.span)
            }
            None => {
                self.issues.push(Issue::error(
                    IssueCode::UnknownIdentifier,
                    ident.span,
                    format!("unknown identifier `{}`", ident.name),
                ));
                self.error_expression(ident.span)
            }
        }
    }

    /// Resolves a call: free function or method, selected by overload.
    fn resolve_call(&mut self, call: &ast::CallExpression) -> TypedExpression {
        let arguments: Vec<TypedExpression> =
            call.arguments.iter().map(|arg| self.resolve_expression(arg)).collect();

        match call.callee.as_ref() {
            ast::Expression::Member(member) => {
                let receiver = self.resolve_expression(&member.receiver);
                if self.program.is_error(receiver.ty) || member.member.synthesized {
                    return self.error_expression(call.span);
                }

                let candidates = self.program.methods_named(receiver.ty, &member.member.name);
                if candidates.is_empty() {
                    self.issues.push(Issue::error(
                        IssueCode::UnknownMethod,
                        member.member.span,
                        format!(
                            "type `{}` has no method `{}`",
                            self.type_name(receiver.ty),
                            member.member.name
                        ),
                    ));
                    return self.error_expression(call.span);
                }

                let Some(method) =
                    self.select_overload(&candidates, &arguments, &member.member.name, call.span)
                else {
                    return self.error_expression(call.span);
                };

                let arguments = self.coerce_arguments(method, arguments);
                TypedExpression {
                    ty: self.program.function(method).return_type,
                    kind: ExpressionKind::MethodCall {
                        method,
                        receiver: Box::new(receiver),
                        arguments,
                    },
                    span: call.span,
                }
            }
            ast::Expression::Reference(ident) => {
                if ident.synthesized {
                    return self.error_expression(call.span);
                }

                let candidates = match self.scopes.lookup(&ident.name) {
                    Some(SymbolEntry::Functions(overloads)) => overloads.clone(),
                    Some(_) => {
                        self.issues.push(Issue::error(
                            IssueCode::NotCallable,
                            ident.span,
                            format!("`{}` is not a function", ident.name),
                        ));
                        return self.error_expression(call.span);
                    }
                    None => {
                        self.issues.push(Issue::error(
                            IssueCode::UnknownIdentifier,
                            ident.span,
                            format!("unknown identifier `{}`", ident.name),
                        ));
                        return self.error_expression(call.span);
                    }
                };

                let Some(function) =
                    self.select_overload(&candidates, &arguments, &ident.name, call.span)
                else {
                    return self.error_expression(call.span);
                };

                let arguments = self.coerce_arguments(function, arguments);
                TypedExpression {
                    ty: self.program.function(function).return_type,
                    kind: ExpressionKind::Call { function, arguments },
                    span: call.span,
                }
            }
            other => {
                let callee = self.resolve_expression(other);
                if !self.program.is_error(callee.ty) {
                    self.issues.push(Issue::error(
                        IssueCode::NotCallable,
                        callee.span,
                        "this expression is not callable",
                    ));
                }
                self.error_expression(call.span)
            }
        }
    }

    /// Resolves `receiver[index]` as a call to the receiver's `get` method.
    fn resolve_subscript(&mut self, subscript: &ast::SubscriptExpression) -> TypedExpression {
        let receiver = self.resolve_expression(&subscript.receiver);
        let index = self.resolve_expression(&subscript.index);

        if self.program.is_error(receiver.ty) {
            return self.error_expression(subscript.span);
        }

        let candidates = self.program.methods_named(receiver.ty, "get");
        if candidates.is_empty() {
            self.issues.push(Issue::error(
                IssueCode::UnknownMethod,
                subscript.span,
                format!(
                    "type `{}` does not support indexing (no `get` method)",
                    self.type_name(receiver.ty)
                ),
            ));
            return self.error_expression(subscript.span);
        }

        let arguments = vec![index];
        let Some(method) = self.select_overload(&candidates, &arguments, "get", subscript.span)
        else {
            return self.error_expression(subscript.span);
        };

        let arguments = self.coerce_arguments(method, arguments);
        TypedExpression {
            ty: self.program.function(method).return_type,
            kind: ExpressionKind::MethodCall { method, receiver: Box::new(receiver), arguments },
            span: subscript.span,
        }
    }

    /// Resolves a postfix `++`/`--`: an `int` place expression.
    fn resolve_postfix(&mut self, postfix: &ast::PostfixExpression) -> TypedExpression {
        let op_name = match postfix.op {
            ast::PostfixOp::Increment => "++",
            ast::PostfixOp::Decrement => "--",
        };

        let target = match postfix.target.as_ref() {
            ast::Expression::Reference(ident) => self.resolve_reference(ident, true),
            other => self.resolve_expression(other),
        };

        if self.program.is_error(target.ty) {
            return self.error_expression(postfix.span);
        }

        if !target.is_place() {
            self.issues.push(Issue::error(
                IssueCode::NotAssignable,
                target.span,
                format!("target of `{op_name}` is not assignable"),
            ));
            return self.error_expression(postfix.span);
        }

        if target.ty != self.builtins.int {
            self.issues.push(Issue::error(
                IssueCode::TypeMismatch,
                target.span,
                format!("`{op_name}` requires `int`, found `{}`", self.type_name(target.ty)),
            ));
            return self.error_expression(postfix.span);
        }

        TypedExpression {
            ty: self.builtins.int,
            kind: ExpressionKind::Step {
                target: Box::new(target),
                increment: postfix.op == ast::PostfixOp::Increment,
            },
            span: postfix.span,
        }
    }

    /// Resolves a binary expression: assignment or a built-in operator.
    fn resolve_binary(&mut self, binary: &ast::BinaryExpression) -> TypedExpression {
        if binary.op == BinaryOp::Assign {
            return self.resolve_assignment(binary);
        }

        let lhs = self.resolve_expression(&binary.lhs);
        let rhs = self.resolve_expression(&binary.rhs);
        self.builtin_binary(binary.op, lhs, rhs, binary.span)
    }

    /// Resolves `lhs = rhs`, requiring a place on the left.
    fn resolve_assignment(&mut self, binary: &ast::BinaryExpression) -> TypedExpression {
        let target = match binary.lhs.as_ref() {
            // The target is written, not read; skip the used-marking so
            // write-only variables still warn.
            ast::Expression::Reference(ident) => self.resolve_reference(ident, false),
            other => self.resolve_expression(other),
        };
        let value = self.resolve_expression(&binary.rhs);

        if self.program.is_error(target.ty) {
            return self.error_expression(binary.span);
        }

        if !target.is_place() {
            self.issues.push(Issue::error(
                IssueCode::NotAssignable,
                target.span,
                "left-hand side of `=` is not assignable",
            ));
            return self.error_expression(binary.span);
        }

        let value = self.coerce(value, target.ty, "assignment");
        TypedExpression {
            ty: target.ty,
            kind: ExpressionKind::Assign { target: Box::new(target), value: Box::new(value) },
            span: binary.span,
        }
    }

    /// Types a built-in binary operator from its operand types.
    fn builtin_binary(
        &mut self,
        op: BinaryOp,
        lhs: TypedExpression,
        rhs: TypedExpression,
        span: SourceSpan,
    ) -> TypedExpression {
        if self.program.is_error(lhs.ty) || self.program.is_error(rhs.ty) {
            return self.error_expression(span);
        }

        let b = self.builtins;
        let numeric =
            |t: TypeId| t == b.int || t == b.double;
        let both = |t: TypeId| lhs.ty == t && rhs.ty == t;

        let result = match op {
            BinaryOp::And | BinaryOp::Or => both(b.bool_).then_some((b.bool_, b.bool_)),
            BinaryOp::Rem => both(b.int).then_some((b.int, b.int)),
            BinaryOp::Add if both(b.string) => Some((b.string, b.string)),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if both(b.int) {
                    Some((b.int, b.int))
                } else if numeric(lhs.ty) && numeric(rhs.ty) {
                    Some((b.double, b.double))
                } else {
                    None
                }
            }
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
                if both(b.int) {
                    Some((b.bool_, b.int))
                } else if numeric(lhs.ty) && numeric(rhs.ty) {
                    Some((b.bool_, b.double))
                } else {
                    None
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq => {
                if both(b.int) {
                    Some((b.bool_, b.int))
                } else if numeric(lhs.ty) && numeric(rhs.ty) {
                    Some((b.bool_, b.double))
                } else if both(b.bool_) || both(b.string) {
                    Some((b.bool_, lhs.ty))
                } else {
                    None
                }
            }
            BinaryOp::Assign => None,
        };

        let Some((result_ty, operand_ty)) = result else {
            self.issues.push(Issue::error(
                IssueCode::TypeMismatch,
                span,
                format!(
                    "operator `{}` cannot be applied to `{}` and `{}`",
                    op.symbol(),
                    self.type_name(lhs.ty),
                    self.type_name(rhs.ty)
                ),
            ));
            return self.error_expression(span);
        };

        let lhs = self.coerce(lhs, operand_ty, "operand");
        let rhs = self.coerce(rhs, operand_ty, "operand");

        TypedExpression {
            ty: result_ty,
            kind: ExpressionKind::Builtin { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            span,
        }
    }

    /// Runs overload selection and reports its failures.
    fn select_overload(
        &mut self,
        candidates: &[FunctionId],
        arguments: &[TypedExpression],
        name: &str,
        span: SourceSpan,
    ) -> Option<FunctionId> {
        let argument_types: Vec<TypeId> = arguments.iter().map(|a| a.ty).collect();

        // An error-typed argument means something upstream already failed;
        // stay silent rather than report a spurious resolution failure.
        if argument_types.iter().any(|&t| self.program.is_error(t)) {
            return None;
        }

        match resolve_overload(&self.program, candidates, &argument_types) {
            OverloadOutcome::Selected(function) => {
                let _ = self.called_functions.insert(function);
                Some(function)
            }
            OverloadOutcome::NoMatch => {
                // When every candidate's signature failed to resolve, the
                // definitions were already diagnosed; a second complaint at
                // the call site would be noise.
                let all_unresolved = candidates.iter().all(|&candidate| {
                    self.program
                        .parameter_types(candidate)
                        .iter()
                        .any(|&param| self.program.is_error(param))
                });
                if all_unresolved {
                    return None;
                }

                let rendered: Vec<String> =
                    argument_types.iter().map(|&t| self.type_name(t).to_string()).collect();
                self.issues.push(Issue::error(
                    IssueCode::NoMatchingOverload,
                    span,
                    format!("no matching overload of `{name}` for ({})", rendered.join(", ")),
                ));
                None
            }
            OverloadOutcome::Ambiguous(minimal) => {
                let mut issue = Issue::error(
                    IssueCode::AmbiguousCall,
                    span,
                    format!("ambiguous call to `{name}`"),
                );
                for candidate in minimal {
                    issue = issue.with_note(Note::spanned(
                        self.program.function(candidate).def_span,
                        "candidate defined here",
                    ));
                }
                self.issues.push(issue);
                None
            }
        }
    }

    /// Coerces each argument to its parameter type.
    fn coerce_arguments(
        &mut self,
        function: FunctionId,
        arguments: Vec<TypedExpression>,
    ) -> Vec<TypedExpression> {
        let parameter_types = self.program.parameter_types(function);
        arguments
            .into_iter()
            .zip(parameter_types)
            .map(|(argument, target)| self.coerce(argument, target, "argument"))
            .collect()
    }

    /// Coerces an expression to a target type, inserting a conversion node
    /// when a registered implicit conversion applies.
    pub(crate) fn coerce(
        &mut self,
        expr: TypedExpression,
        to: TypeId,
        context: &str,
    ) -> TypedExpression {
        if expr.ty == to || self.program.is_error(expr.ty) || self.program.is_error(to) {
            return expr;
        }

        if self.program.ty(expr.ty).conversions_to.contains(&to) {
            return TypedExpression {
                span: expr.span,
                ty: to,
                kind: ExpressionKind::Convert { value: Box::new(expr) },
            };
        }

        self.issues.push(Issue::error(
            IssueCode::TypeMismatch,
            expr.span,
            format!(
                "type mismatch in {context}: expected `{}`, found `{}`",
                self.type_name(to),
                self.type_name(expr.ty)
            ),
        ));
        expr
    }

    /// An error-typed placeholder expression.
    fn error_expression(&self, span: SourceSpan) -> TypedExpression {
        TypedExpression { kind: ExpressionKind::Error, ty: self.program.error_type(), span }
    }

    /// The display name of a type.
    fn type_name(&self, id: TypeId) -> &str { &self.program.ty(id).name }
}
