//! The resolved program representation.
//!
//! The root namespace is an arena: types, functions, and variables live in
//! vectors on [`Program`] and refer to each other through stable index ids.
//! Scopes and typed expressions hold those ids, which avoids cyclic owning
//! references between a type, its methods, and the namespace containing both.

mod typed;

use std::fmt;

use colang_source::types::SourceSpan;
pub use typed::*;

/// Stable identifier of a [`Type`] within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

/// Stable identifier of a [`Function`] within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(usize);

/// Stable identifier of a [`Variable`] within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableId(usize);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "type:{}", self.0) }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "function:{}", self.0) }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "variable:{}", self.0) }
}

/// A resolved type.
///
/// Identity is the arena id; two types are the same type iff their ids are
/// equal. Implicit conversions form a small directed graph of single-step
/// edges registered only for prelude types.
#[derive(Debug, Clone)]
pub struct Type {
    /// The type's name
    pub name: String,
    /// True for prelude-provided types backed by the C runtime
    pub native: bool,
    /// The type's own methods; methods are not inherited
    pub methods: Vec<FunctionId>,
    /// Types this type implicitly converts to, one step only
    pub conversions_to: Vec<TypeId>,
    /// Where the type was defined
    pub def_span: SourceSpan,
}

/// A resolved function or method.
#[derive(Debug, Clone)]
pub struct Function {
    /// The function's name
    pub name: String,
    /// The parameters, in order
    pub parameters: Vec<VariableId>,
    /// The declared return type
    pub return_type: TypeId,
    /// The resolved body; absent for native functions
    pub body: Option<TypedBlock>,
    /// True for prelude-provided functions backed by the C runtime
    pub native: bool,
    /// The containing type, for methods; a method is not itself a named
    /// symbol and is only reachable through its owner's method table
    pub owner: Option<TypeId>,
    /// Span of the function's name in its definition
    pub def_span: SourceSpan,
}

/// What kind of storage a variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// A top-level variable
    Global,
    /// A function-local variable
    Local,
    /// A function parameter
    Parameter,
}

/// A resolved variable.
#[derive(Debug, Clone)]
pub struct Variable {
    /// The variable's name
    pub name: String,
    /// The declared type
    pub ty: TypeId,
    /// Storage kind
    pub kind: VariableKind,
    /// The resolved initializer, for globals
    pub initializer: Option<TypedExpression>,
    /// Span of the variable's name in its definition
    pub def_span: SourceSpan,
}

/// The resolved root namespace: the arena of everything the backend needs.
#[derive(Debug)]
pub struct Program {
    types: Vec<Type>,
    functions: Vec<Function>,
    variables: Vec<Variable>,
    /// The absorbing placeholder type standing in for unresolvable types.
    ///
    /// It relates to every type by `<:` on both sides, which silences
    /// downstream checks once an error was reported.
    error_type: TypeId,
    /// The program entry point, when a top-level `main` exists
    pub entry: Option<FunctionId>,
}

impl Program {
    /// Creates an empty program containing only the error type.
    #[must_use]
    pub fn new() -> Self {
        let mut program = Self {
            types: Vec::new(),
            functions: Vec::new(),
            variables: Vec::new(),
            error_type: TypeId(0),
            entry: None,
        };
        program.error_type = program.add_type(Type {
            name: "<error>".to_string(),
            native: false,
            methods: Vec::new(),
            conversions_to: Vec::new(),
            def_span: SourceSpan::default(),
        });

        program
    }

    /// The absorbing error type.
    #[must_use]
    pub const fn error_type(&self) -> TypeId { self.error_type }

    /// True if the id is the absorbing error type.
    #[must_use]
    pub fn is_error(&self, id: TypeId) -> bool { id == self.error_type }

    /// Adds a type and returns its id.
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        self.types.push(ty);
        TypeId(self.types.len() - 1)
    }

    /// Adds a function and returns its id.
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        self.functions.push(function);
        FunctionId(self.functions.len() - 1)
    }

    /// Adds a variable and returns its id.
    pub fn add_variable(&mut self, variable: Variable) -> VariableId {
        self.variables.push(variable);
        VariableId(self.variables.len() - 1)
    }

    /// Looks up a type by id.
    #[must_use]
    pub fn ty(&self, id: TypeId) -> &Type { &self.types[id.0] }

    /// Looks up a type by id, mutably.
    pub fn ty_mut(&mut self, id: TypeId) -> &mut Type { &mut self.types[id.0] }

    /// Looks up a function by id.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> &Function { &self.functions[id.0] }

    /// Looks up a function by id, mutably.
    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function { &mut self.functions[id.0] }

    /// Looks up a variable by id.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &Variable { &self.variables[id.0] }

    /// Looks up a variable by id, mutably.
    pub fn variable_mut(&mut self, id: VariableId) -> &mut Variable { &mut self.variables[id.0] }

    /// Iterates over all types with their ids.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types.iter().enumerate().map(|(i, t)| (TypeId(i), t))
    }

    /// Iterates over all functions with their ids.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions.iter().enumerate().map(|(i, f)| (FunctionId(i), f))
    }

    /// Iterates over all variables with their ids.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().enumerate().map(|(i, v)| (VariableId(i), v))
    }

    /// The subtyping / implicit-conversion partial order `a <: b`.
    ///
    /// Holds for equal types, for a registered single-step conversion, and
    /// for the error type on either side (the error type absorbs).
    #[must_use]
    pub fn is_subtype(&self, a: TypeId, b: TypeId) -> bool {
        a == b || a == self.error_type || b == self.error_type
            || self.ty(a).conversions_to.contains(&b)
    }

    /// True if `a <: b` holds strictly, counting a conversion step as worse.
    #[must_use]
    pub fn is_strict_subtype(&self, a: TypeId, b: TypeId) -> bool {
        a != b && self.is_subtype(a, b)
    }

    /// The least upper bound of two types under `<:`, if one exists.
    #[must_use]
    pub fn lub(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if self.is_subtype(a, b) {
            return Some(b);
        }
        if self.is_subtype(b, a) {
            return Some(a);
        }

        // Common supertypes of both, minimal under <:.
        let common: Vec<TypeId> = self
            .types()
            .map(|(id, _)| id)
            .filter(|&t| self.is_subtype(a, t) && self.is_subtype(b, t))
            .collect();

        let minimal: Vec<TypeId> = common
            .iter()
            .copied()
            .filter(|&t| !common.iter().any(|&other| self.is_strict_subtype(other, t)))
            .collect();

        match minimal.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Registers a single-step implicit conversion `from -> to`.
    pub fn register_conversion(&mut self, from: TypeId, to: TypeId) {
        let conversions = &mut self.ty_mut(from).conversions_to;
        if !conversions.contains(&to) {
            conversions.push(to);
        }
    }

    /// Finds a method of `owner` by name.
    #[must_use]
    pub fn methods_named(&self, owner: TypeId, name: &str) -> Vec<FunctionId> {
        self.ty(owner)
            .methods
            .iter()
            .copied()
            .filter(|&m| self.function(m).name == name)
            .collect()
    }

    /// The parameter type vector of a function.
    #[must_use]
    pub fn parameter_types(&self, id: FunctionId) -> Vec<TypeId> {
        self.function(id).parameters.iter().map(|&p| self.variable(p).ty).collect()
    }
}

impl Default for Program {
    fn default() -> Self { Self::new() }
}
