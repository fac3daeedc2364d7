//! Scopes and name lookup.
//!
//! A scope maps identifiers to symbols. Function names map to whole overload
//! sets; selection between overloads happens at call sites, not at lookup.
//! Scopes form a chain during analysis; lookups walk leaf to root and the
//! first binding wins.

use colang_source::types::SourceSpan;
use rustc_hash::FxHashMap;

use crate::error::SemanticError;
use crate::program::{FunctionId, Program, TypeId, VariableId};

/// What a name is bound to in a scope.
#[derive(Debug, Clone)]
pub enum SymbolEntry {
    /// A type
    Type(TypeId),
    /// A variable
    Variable(VariableId),
    /// An overload set of functions sharing the name
    Functions(Vec<FunctionId>),
}

/// A single scope: a mapping from names to symbols.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: FxHashMap<String, SymbolEntry>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Looks a name up in this scope only.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> { self.symbols.get(name) }

    /// Binds a type.
    ///
    /// ## Errors
    ///
    /// Returns [`SemanticError::DuplicateSymbol`] if the name is taken.
    pub fn define_type(
        &mut self,
        program: &Program,
        name: &str,
        id: TypeId,
        span: SourceSpan,
    ) -> Result<(), SemanticError> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(duplicate(program, name, existing, span));
        }

        drop(self.symbols.insert(name.to_string(), SymbolEntry::Type(id)));
        Ok(())
    }

    /// Binds a variable.
    ///
    /// ## Errors
    ///
    /// Returns [`SemanticError::DuplicateSymbol`] if the name is taken.
    pub fn define_variable(
        &mut self,
        program: &Program,
        name: &str,
        id: VariableId,
        span: SourceSpan,
    ) -> Result<(), SemanticError> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(duplicate(program, name, existing, span));
        }

        drop(self.symbols.insert(name.to_string(), SymbolEntry::Variable(id)));
        Ok(())
    }

    /// Adds a function to the name's overload set.
    ///
    /// ## Errors
    ///
    /// Returns [`SemanticError::DuplicateSymbol`] if the name is bound to a
    /// non-function symbol, or if the set already contains an overload with
    /// the same parameter types.
    pub fn define_function(
        &mut self,
        program: &Program,
        name: &str,
        id: FunctionId,
        span: SourceSpan,
    ) -> Result<(), SemanticError> {
        match self.symbols.get_mut(name) {
            None => {
                drop(self.symbols.insert(name.to_string(), SymbolEntry::Functions(vec![id])));
                Ok(())
            }
            Some(SymbolEntry::Functions(overloads)) => {
                let signature = program.parameter_types(id);
                if let Some(&existing) =
                    overloads.iter().find(|&&f| program.parameter_types(f) == signature)
                {
                    return Err(SemanticError::DuplicateSymbol {
                        name: name.to_string(),
                        original_span: program.function(existing).def_span,
                        duplicate_span: span,
                    });
                }

                overloads.push(id);
                Ok(())
            }
            Some(existing) => Err(duplicate(program, name, existing, span)),
        }
    }
}

/// A chain of scopes, leaf last.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Creates a stack holding only the given root scope.
    #[must_use]
    pub fn new(root: Scope) -> Self { Self { scopes: vec![root] } }

    /// Pushes a fresh child scope.
    pub fn push(&mut self) { self.scopes.push(Scope::new()); }

    /// Pops the leaf scope.
    ///
    /// The root scope is never popped.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            drop(self.scopes.pop());
        }
    }

    /// The leaf scope.
    ///
    /// ## Panics
    ///
    /// Panics if the stack is empty, which cannot happen through this API.
    pub fn leaf(&mut self) -> &mut Scope {
        self.scopes.last_mut().unwrap_or_else(|| unreachable!("scope stack is never empty"))
    }

    /// The root scope.
    #[must_use]
    pub fn root(&self) -> &Scope { &self.scopes[0] }

    /// Walks the chain leaf to root; the first binding wins.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

/// Builds the duplicate-symbol error for an existing entry.
fn duplicate(
    program: &Program,
    name: &str,
    existing: &SymbolEntry,
    duplicate_span: SourceSpan,
) -> SemanticError {
    let original_span = match existing {
        SymbolEntry::Type(id) => program.ty(*id).def_span,
        SymbolEntry::Variable(id) => program.variable(*id).def_span,
        SymbolEntry::Functions(overloads) => overloads
            .first()
            .map_or_else(SourceSpan::default, |&f| program.function(f).def_span),
    };

    SemanticError::DuplicateSymbol {
        name: name.to_string(),
        original_span,
        duplicate_span,
    }
}
