//! The two-phase analysis driver.
//!
//! Phase 1 registers every top-level symbol (and method header) so forward
//! references resolve; phase 2 resolves bodies and initializers against the
//! completed namespace. [`bodies`] holds the statement and expression
//! resolution, [`overloads`] the call-site overload selection.

mod bodies;
mod overloads;

use colang_ast::nodes::{
    CodeBlock,
    FunctionDefinition,
    GlobalDefinition,
    SpecifierKind,
    TranslationUnit,
    TypeExpression,
    VariableDefinition,
};
use colang_diagnostic::{Issue, IssueCode};
use colang_source::types::FileID;
pub use overloads::{OverloadOutcome, resolve_overload};
use rustc_hash::FxHashSet;

use crate::program::{
    Function,
    FunctionId,
    Program,
    Type,
    TypeId,
    Variable,
    VariableId,
    VariableKind,
};
use crate::returns;
use crate::scope::{Scope, ScopeStack, SymbolEntry};

/// Well-known prelude types, cached after symbol registration.
///
/// Each falls back to the absorbing error type when the prelude did not
/// provide it, so analysis of broken setups stays quiet instead of cascading.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    /// The `void` type
    pub void: TypeId,
    /// The `bool` type
    pub bool_: TypeId,
    /// The `int` type
    pub int: TypeId,
    /// The `double` type
    pub double: TypeId,
    /// The `string` type
    pub string: TypeId,
}

/// A function body waiting for phase 2.
struct PendingBody<'ast> {
    function: FunctionId,
    body: &'ast CodeBlock,
}

/// The semantic analyzer: owns the program being built, the scope chain, and
/// the accumulated issues.
pub struct Analyzer {
    pub(crate) program: Program,
    pub(crate) scopes: ScopeStack,
    pub(crate) issues: Vec<Issue>,
    pub(crate) builtins: Builtins,
    pub(crate) used_variables: FxHashSet<VariableId>,
    pub(crate) called_functions: FxHashSet<FunctionId>,
    pub(crate) current_return_type: TypeId,
    user_file: FileID,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").field("issues", &self.issues.len()).finish()
    }
}

impl Analyzer {
    /// Creates an analyzer for a compile whose user code lives in `user_file`.
    #[must_use]
    pub fn new(user_file: FileID) -> Self {
        let program = Program::new();
        let error = program.error_type();

        Self {
            program,
            scopes: ScopeStack::new(Scope::new()),
            issues: Vec::new(),
            builtins: Builtins { void: error, bool_: error, int: error, double: error, string: error },
            used_variables: FxHashSet::default(),
            called_functions: FxHashSet::default(),
            current_return_type: error,
            user_file,
        }
    }

    /// Runs both phases over the prelude and the user translation unit.
    #[must_use]
    pub fn run(mut self, prelude: &TranslationUnit, user: &TranslationUnit) -> (Program, Vec<Issue>) {
        // Phase 1: all types first, so function signatures can mention any of
        // them regardless of definition order.
        let prelude_types = self.register_types(prelude);
        let user_types = self.register_types(user);
        self.wire_builtins();

        let mut pending = Vec::new();
        let mut pending_globals = Vec::new();
        self.register_callables(prelude, &prelude_types, &mut pending, &mut pending_globals);
        self.register_callables(user, &user_types, &mut pending, &mut pending_globals);

        // Phase 2: initializers and bodies against the complete namespace.
        for (variable, definition) in pending_globals {
            self.resolve_global_initializer(variable, definition);
        }
        for entry in &pending {
            self.resolve_body(entry.function, entry.body);
        }

        self.report_unused();
        self.program.entry = match self.scopes.root().get("main") {
            Some(SymbolEntry::Functions(overloads)) => overloads.first().copied(),
            _ => None,
        };

        (self.program, self.issues)
    }

    /// Registers every type definition of a translation unit.
    ///
    /// Returns the created type ids, parallel to the unit's definitions.
    fn register_types(&mut self, unit: &TranslationUnit) -> Vec<Option<TypeId>> {
        unit.definitions
            .iter()
            .map(|definition| {
                let GlobalDefinition::Type(def) = definition else {
                    return None;
                };

                let native = def.specifiers.iter().any(|s| s.kind == SpecifierKind::Native);
                let id = self.program.add_type(Type {
                    name: def.name.name.clone(),
                    native,
                    methods: Vec::new(),
                    conversions_to: Vec::new(),
                    def_span: def.name.span,
                });

                if !def.name.synthesized {
                    let scope = self.scopes.leaf();
                    if let Err(error) =
                        scope.define_type(&self.program, &def.name.name, id, def.name.span)
                    {
                        self.issues.push(error.into());
                    }
                }

                Some(id)
            })
            .collect()
    }

    /// Caches the well-known prelude types and registers the implicit
    /// conversions only the prelude may introduce.
    fn wire_builtins(&mut self) {
        self.builtins = Builtins {
            void: self.native_type("void"),
            bool_: self.native_type("bool"),
            int: self.native_type("int"),
            double: self.native_type("double"),
            string: self.native_type("string"),
        };

        let (int, double) = (self.builtins.int, self.builtins.double);
        if !self.program.is_error(int) && !self.program.is_error(double) {
            self.program.register_conversion(int, double);
        }
    }

    /// Resolves a native prelude type by name, defaulting to the error type.
    fn native_type(&self, name: &str) -> TypeId {
        match self.scopes.root().get(name) {
            Some(SymbolEntry::Type(id)) if self.program.ty(*id).native => *id,
            _ => self.program.error_type(),
        }
    }

    /// Registers the functions, methods, and global variables of a unit.
    fn register_callables<'ast>(
        &mut self,
        unit: &'ast TranslationUnit,
        type_ids: &[Option<TypeId>],
        pending: &mut Vec<PendingBody<'ast>>,
        pending_globals: &mut Vec<(VariableId, &'ast VariableDefinition)>,
    ) {
        for (definition, type_id) in unit.definitions.iter().zip(type_ids) {
            match definition {
                GlobalDefinition::Function(def) => {
                    if let Some(entry) = self.register_function(def, None) {
                        pending.push(entry);
                    }
                }
                GlobalDefinition::Type(def) => {
                    let Some(body) = &def.body else { continue };
                    let Some(owner) = *type_id else { continue };
                    for method in &body.methods {
                        if let Some(entry) = self.register_function(method, Some(owner)) {
                            pending.push(entry);
                        }
                    }
                }
                GlobalDefinition::Variable(def) => {
                    if let Some(id) = self.register_global_variable(def) {
                        pending_globals.push((id, def));
                    }
                }
            }
        }
    }

    /// Registers one function or method header.
    fn register_function<'ast>(
        &mut self,
        def: &'ast FunctionDefinition,
        owner: Option<TypeId>,
    ) -> Option<PendingBody<'ast>> {
        let native = def.specifiers.iter().any(|s| s.kind == SpecifierKind::Native);
        let return_type = self.resolve_type_expression(&def.return_type);

        let parameters: Vec<VariableId> = def
            .parameters
            .parameters
            .iter()
            .map(|param| {
                let ty = self.resolve_type_expression(&param.ty);
                self.program.add_variable(Variable {
                    name: param.name.name.clone(),
                    ty,
                    kind: VariableKind::Parameter,
                    initializer: None,
                    def_span: param.name.span,
                })
            })
            .collect();

        let id = self.program.add_function(Function {
            name: def.name.name.clone(),
            parameters,
            return_type,
            body: None,
            native,
            owner,
            def_span: def.name.span,
        });

        if !def.name.synthesized {
            self.bind_function(id, &def.name.name, def.name.span, owner);
        }

        match (&def.body, native) {
            (None, false) => {
                self.issues.push(Issue::error(
                    IssueCode::MissingBody,
                    def.name.span,
                    format!("function `{}` has no body", def.name.name),
                ));
                None
            }
            (Some(_), true) => {
                self.issues.push(Issue::error(
                    IssueCode::IllegalSpecifier,
                    def.name.span,
                    format!("native function `{}` must not have a body", def.name.name),
                ));
                None
            }
            (Some(body), false) => Some(PendingBody { function: id, body }),
            (None, true) => None,
        }
    }

    /// Binds a function into the root namespace or its owner's method table.
    fn bind_function(
        &mut self,
        id: FunctionId,
        name: &str,
        span: colang_source::types::SourceSpan,
        owner: Option<TypeId>,
    ) {
        match owner {
            None => {
                let scope = self.scopes.leaf();
                if let Err(error) = scope.define_function(&self.program, name, id, span) {
                    self.issues.push(error.into());
                }
            }
            Some(owner) => {
                let signature = self.program.parameter_types(id);
                let clash = self
                    .program
                    .methods_named(owner, name)
                    .into_iter()
                    .find(|&m| self.program.parameter_types(m) == signature);

                if let Some(existing) = clash {
                    self.issues.push(
                        crate::error::SemanticError::DuplicateSymbol {
                            name: name.to_string(),
                            original_span: self.program.function(existing).def_span,
                            duplicate_span: span,
                        }
                        .into(),
                    );
                } else {
                    self.program.ty_mut(owner).methods.push(id);
                }
            }
        }
    }

    /// Registers one global variable.
    fn register_global_variable(&mut self, def: &VariableDefinition) -> Option<VariableId> {
        let ty = self.resolve_type_expression(&def.ty);
        let id = self.program.add_variable(Variable {
            name: def.name.name.clone(),
            ty,
            kind: VariableKind::Global,
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

        Some(id)
    }

    /// Resolves a type expression to a type id, or the error type.
    pub(crate) fn resolve_type_expression(&mut self, ty: &TypeExpression) -> TypeId {
        if ty.name.synthesized {
            return self.program.error_type();
        }

        match self.scopes.lookup(&ty.name.name) {
            Some(SymbolEntry::Type(id)) => *id,
            Some(_) => {
                self.issues.push(Issue::error(
                    IssueCode::UnknownType,
                    ty.span,
                    format!("`{}` is not a type", ty.name.name),
                ));
                self.program.error_type()
            }
            None => {
                self.issues.push(Issue::error(
                    IssueCode::UnknownType,
                    ty.span,
                    format!("unknown type `{}`", ty.name.name),
                ));
                self.program.error_type()
            }
        }
    }

    /// Resolves a global variable's initializer in the root scope.
    fn resolve_global_initializer(&mut self, variable: VariableId, def: &VariableDefinition) {
        let Some(initializer) = &def.initializer else { return };

        let resolved = self.resolve_expression(initializer);
        let target = self.program.variable(variable).ty;
        let coerced = self.coerce(resolved, target, "variable initializer");
        self.program.variable_mut(variable).initializer = Some(coerced);
    }

    /// Resolves one function body and runs the return-flow checker on it.
    fn resolve_body(&mut self, function: FunctionId, body: &CodeBlock) {
        let (return_type, parameters) = {
            let f = self.program.function(function);
            (f.return_type, f.parameters.clone())
        };
        self.current_return_type = return_type;

        self.scopes.push();
        for parameter in parameters {
            let (name, span) = {
                let v = self.program.variable(parameter);
                (v.name.clone(), v.def_span)
            };
            if name.is_empty() {
                continue;
            }
            let scope = self.scopes.leaf();
            if let Err(error) = scope.define_variable(&self.program, &name, parameter, span) {
                self.issues.push(error.into());
            }
        }

        let block = self.resolve_block(body);
        self.scopes.pop();

        let name = self.program.function(function).name.clone();
        let flow_issues = returns::check_function(
            &self.program,
            self.builtins.void,
            &name,
            return_type,
            &block,
        );
        self.issues.extend(flow_issues);

        self.program.function_mut(function).body = Some(block);
    }

    /// Warns about user-file symbols that are never used.
    fn report_unused(&mut self) {
        let mut warnings = Vec::new();

        for (id, variable) in self.program.variables() {
            if variable.kind != VariableKind::Parameter
                && variable.def_span.file_id == self.user_file
                && !variable.name.is_empty()
                && !self.used_variables.contains(&id)
            {
                warnings.push(Issue::warning(
                    IssueCode::UnusedSymbol,
                    variable.def_span,
                    format!("variable `{}` is never used", variable.name),
                ));
            }
        }

        for (id, function) in self.program.functions() {
            if !function.native
                && function.def_span.file_id == self.user_file
                && function.name != "main"
                && !function.name.is_empty()
                && !self.called_functions.contains(&id)
            {
                warnings.push(Issue::warning(
                    IssueCode::UnusedSymbol,
                    function.def_span,
                    format!("function `{}` is never called", function.name),
                ));
            }
        }

        self.issues.extend(warnings);
    }
}
