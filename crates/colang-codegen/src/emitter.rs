// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The colang project
// SPDX-FileName: crates/colang-codegen/src/emitter.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! Lowering of the resolved program to C text.

use std::fmt::Write as _;

use colang_analyzer::program::{
    ExpressionKind,
    Function,
    FunctionId,
    Program,
    TypeId,
    TypedBlock,
    TypedExpression,
    TypedStatement,
    VariableKind,
};
use colang_ast::nodes::BinaryOp;

use crate::names::VerboseNames;

/// The static runtime backing the prelude's native declarations.
const RUNTIME: &str = r#"#include <stdbool.h>
#include <stdint.h>
#include <stdio.h>
#include <stdlib.h>
#include <string.h>

static const char *co_string_concat(const char *a, const char *b) {
    size_t la = strlen(a);
    size_t lb = strlen(b);
    char *out = (char *)malloc(la + lb + 1);
    if (out == NULL) {
        abort();
    }
    memcpy(out, a, la);
    memcpy(out + la, b, lb + 1);
    return out;
}

static bool co_string_eq(const char *a, const char *b) {
    return strcmp(a, b) == 0;
}

static void co_print_int(int64_t v) { printf("%lld", (long long)v); }
static void co_print_double(double v) { printf("%g", v); }
static void co_print_string(const char *v) { printf("%s", v); }
static void co_println_int(int64_t v) { printf("%lld\n", (long long)v); }
static void co_println_double(double v) { printf("%g\n", v); }
static void co_println_string(const char *v) { printf("%s\n", v); }
static void co_println(void) { printf("\n"); }

static int64_t co_readInt(void) {
    long long v = 0;
    if (scanf("%lld", &v) != 1) {
        v = 0;
    }
    return (int64_t)v;
}

static double co_readDouble(void) {
    double v = 0;
    if (scanf("%lf", &v) != 1) {
        v = 0;
    }
    return v;
}
"#;

/// Emits one C translation unit for a program.
#[derive(Debug)]
pub struct CEmitter<'p> {
    program: &'p Program,
    names: VerboseNames,
    out: String,
    indent: usize,
}

impl<'p> CEmitter<'p> {
    /// Creates an emitter, assigning C names for every symbol up front.
    #[must_use]
    pub fn new(program: &'p Program) -> Self {
        Self { program, names: VerboseNames::build(program), out: String::new(), indent: 0 }
    }

    /// Produces the whole translation unit.
    #[must_use]
    pub fn emit(mut self) -> String {
        self.out.push_str(RUNTIME);
        self.emit_struct_definitions();
        self.emit_global_variables();
        self.emit_prototypes();
        self.emit_global_initializer();
        self.emit_bodies();
        self.emit_main();

        self.out
    }

    /// One `typedef struct` per user type. CO structs carry no fields, but C
    /// forbids empty structs, so each gets a reserved byte.
    fn emit_struct_definitions(&mut self) {
        for (id, ty) in self.program.types() {
            if ty.native || self.program.is_error(id) {
                continue;
            }

            let _ = writeln!(self.out, "\ntypedef struct {{ char reserved_; }} {};", self.names.ty(id));
        }
    }

    fn emit_global_variables(&mut self) {
        let mut any = false;
        for (id, variable) in self.program.variables() {
            if variable.kind != VariableKind::Global {
                continue;
            }

            if !any {
                self.out.push('\n');
                any = true;
            }
            let _ = writeln!(
                self.out,
                "static {} {};",
                self.c_type(variable.ty),
                self.names.variable(id)
            );
        }
    }

    /// Prototypes for every user function, so bodies may call forward.
    fn emit_prototypes(&mut self) {
        self.out.push('\n');
        for (id, function) in self.program.functions() {
            if function.native {
                continue;
            }

            let signature = self.signature(id, function);
            let _ = writeln!(self.out, "{signature};");
        }
    }

    /// Global initializers run before `main`'s body; C static initializers
    /// must be constant, CO ones need not be.
    fn emit_global_initializer(&mut self) {
        self.out.push_str("\nstatic void co_init_globals(void) {\n");
        self.indent = 1;
        for (id, variable) in self.program.variables() {
            if variable.kind != VariableKind::Global {
                continue;
            }
            if let Some(initializer) = &variable.initializer {
                let value = self.expression(initializer);
                let name = self.names.variable(id).to_string();
                self.line(&format!("{name} = {value};"));
            }
        }
        self.indent = 0;
        self.out.push_str("}\n");
    }

    fn emit_bodies(&mut self) {
        for (id, function) in self.program.functions() {
            let Some(body) = &function.body else { continue };
            if function.native {
                continue;
            }

            let signature = self.signature(id, function);
            let _ = write!(self.out, "\n{signature} ");
            self.block(body);
        }
    }

    /// The `main` trampoline, when the program has an entry point.
    fn emit_main(&mut self) {
        let Some(entry) = self.program.entry else { return };

        let name = self.names.function(entry).to_string();
        let returns_int =
            self.native_name(self.program.function(entry).return_type) == Some("int");

        self.out.push_str("\nint main(void) {\n    co_init_globals();\n");
        if returns_int {
            let _ = writeln!(self.out, "    return (int){name}();");
        } else {
            let _ = writeln!(self.out, "    {name}();\n    return 0;");
        }
        self.out.push_str("}\n");
    }

    /// A function's C signature.
    fn signature(&self, id: FunctionId, function: &Function) -> String {
        let mut parameters = Vec::new();

        // Methods take their receiver by value as a leading parameter; CO
        // structs have no mutable state, so value passing is exact.
        if let Some(owner) = function.owner {
            parameters.push(format!("{} co__self", self.c_type(owner)));
        }
        for &parameter in &function.parameters {
            let variable = self.program.variable(parameter);
            parameters.push(format!("{} {}", self.c_type(variable.ty), self.names.variable(parameter)));
        }

        let parameter_list =
            if parameters.is_empty() { "void".to_string() } else { parameters.join(", ") };

        format!(
            "static {} {}({})",
            self.c_type(function.return_type),
            self.names.function(id),
            parameter_list
        )
    }

    fn block(&mut self, block: &TypedBlock) {
        self.out.push_str("{\n");
        self.indent += 1;
        for statement in &block.statements {
            self.statement(statement);
        }
        self.indent -= 1;
        self.line("}");
    }

    fn statement(&mut self, statement: &TypedStatement) {
        match statement {
            TypedStatement::Block(block) => {
                self.pad();
                self.block(block);
            }
            TypedStatement::If(stmt) => {
                let condition = self.expression(&stmt.condition);
                self.pad();
                let _ = write!(self.out, "if ({condition}) ");
                self.branch(&stmt.then_branch);
                if let Some(else_branch) = &stmt.else_branch {
                    self.pad();
                    self.out.push_str("else ");
                    self.branch(else_branch);
                }
            }
            TypedStatement::While(stmt) => {
                let condition = self.expression(&stmt.condition);
                self.pad();
                let _ = write!(self.out, "while ({condition}) ");
                self.branch(&stmt.body);
            }
            TypedStatement::Return(stmt) => match &stmt.value {
                Some(value) => {
                    let value = self.expression(value);
                    self.line(&format!("return {value};"));
                }
                None => self.line("return;"),
            },
            TypedStatement::Variable(stmt) => {
                let variable = self.program.variable(stmt.variable);
                let ty = self.c_type(variable.ty);
                let name = self.names.variable(stmt.variable).to_string();
                match &stmt.initializer {
                    Some(initializer) => {
                        let value = self.expression(initializer);
                        self.line(&format!("{ty} {name} = {value};"));
                    }
                    None => self.line(&format!("{ty} {name};")),
                }
            }
            TypedStatement::Expression(expr) => {
                let rendered = self.expression(expr);
                self.line(&format!("{rendered};"));
            }
        }
    }

    /// Emits a branch body, bracing single statements.
    fn branch(&mut self, statement: &TypedStatement) {
        if let TypedStatement::Block(block) = statement {
            self.block(block);
        } else {
            self.out.push_str("{\n");
            self.indent += 1;
            self.statement(statement);
            self.indent -= 1;
            self.line("}");
        }
    }

    fn expression(&self, expr: &TypedExpression) -> String {
        match &expr.kind {
            ExpressionKind::IntLiteral(value) => format!("INT64_C({value})"),
            ExpressionKind::FloatLiteral(value) => format!("{value:?}"),
            ExpressionKind::StringLiteral(value) => c_quote(value),
            ExpressionKind::BoolLiteral(value) => value.to_string(),
            ExpressionKind::Variable(id) => self.names.variable(*id).to_string(),
            ExpressionKind::Call { function, arguments } => {
                let arguments: Vec<String> =
                    arguments.iter().map(|a| self.expression(a)).collect();
                format!("{}({})", self.names.function(*function), arguments.join(", "))
            }
            ExpressionKind::MethodCall { method, receiver, arguments } => {
                let mut all = vec![self.expression(receiver)];
                all.extend(arguments.iter().map(|a| self.expression(a)));
                format!("{}({})", self.names.function(*method), all.join(", "))
            }
            ExpressionKind::Builtin { op, lhs, rhs } => self.builtin(*op, lhs, rhs),
            ExpressionKind::Assign { target, value } => {
                format!("({} = {})", self.expression(target), self.expression(value))
            }
            ExpressionKind::Step { target, increment } => {
                let op = if *increment { "++" } else { "--" };
                format!("({}{})", self.expression(target), op)
            }
            ExpressionKind::Convert { value } => {
                format!("(({})({}))", self.c_type(expr.ty), self.expression(value))
            }
            ExpressionKind::Error => "0".to_string(),
        }
    }

    /// Lowers a built-in operator; string concatenation and comparison go
    /// through the runtime instead of C operators.
    fn builtin(&self, op: BinaryOp, lhs: &TypedExpression, rhs: &TypedExpression) -> String {
        let left = self.expression(lhs);
        let right = self.expression(rhs);
        let on_strings = self.native_name(lhs.ty) == Some("string");

        if on_strings {
            return match op {
                BinaryOp::Add => format!("co_string_concat({left}, {right})"),
                BinaryOp::Eq => format!("co_string_eq({left}, {right})"),
                BinaryOp::NotEq => format!("!co_string_eq({left}, {right})"),
                _ => format!("({left} {} {right})", op.symbol()),
            };
        }

        format!("({left} {} {right})", op.symbol())
    }

    /// The C spelling of a type.
    fn c_type(&self, id: TypeId) -> String { self.names.ty(id).to_string() }

    /// The CO name of a native type, if the id is one.
    fn native_name(&self, id: TypeId) -> Option<&str> {
        let ty = self.program.ty(id);
        ty.native.then_some(ty.name.as_str())
    }

    fn line(&mut self, text: &str) {
        self.pad();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }
}

/// Renders a string as a C literal.
fn c_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out.push('"');

    out
}
