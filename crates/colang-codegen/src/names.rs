// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The colang project
// SPDX-FileName: crates/colang-codegen/src/names.rs
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
//! The verbose-name generator.
//!
//! Every CO symbol gets a collision-free C identifier up front: user types
//! and functions are prefixed with `co_`, methods carry their owner's name,
//! overloads and shadowed variables get numeric suffixes, and native symbols
//! map to the names the emitted static runtime provides.

use colang_analyzer::program::{FunctionId, Program, TypeId, VariableId};
use rustc_hash::{FxHashMap, FxHashSet};

/// Precomputed C names for every symbol in a program.
#[derive(Debug)]
pub struct VerboseNames {
    types: FxHashMap<TypeId, String>,
    functions: FxHashMap<FunctionId, String>,
    variables: FxHashMap<VariableId, String>,
}

impl VerboseNames {
    /// Assigns names for every symbol in the program.
    #[must_use]
    pub fn build(program: &Program) -> Self {
        let mut taken = FxHashSet::default();
        let mut types = FxHashMap::default();
        let mut functions = FxHashMap::default();
        let mut variables = FxHashMap::default();

        for (id, ty) in program.types() {
            let name = if ty.native {
                native_type_name(&ty.name).to_string()
            } else {
                unique(&mut taken, &format!("co_{}", sanitize(&ty.name)))
            };
            drop(types.insert(id, name));
        }

        for (id, function) in program.functions() {
            let name = if function.native {
                let name = native_function_name(program, id);
                let _ = taken.insert(name.clone());
                name
            } else {
                let base = match function.owner {
                    Some(owner) => format!(
                        "co_{}_{}",
                        sanitize(&program.ty(owner).name),
                        sanitize(&function.name)
                    ),
                    None => format!("co_{}", sanitize(&function.name)),
                };
                unique(&mut taken, &base)
            };
            drop(functions.insert(id, name));
        }

        for (id, variable) in program.variables() {
            let name = unique(&mut taken, &format!("co_{}", sanitize(&variable.name)));
            drop(variables.insert(id, name));
        }

        Self { types, functions, variables }
    }

    /// The C type name for a resolved type.
    ///
    /// ## Panics
    ///
    /// Panics if the id was not part of the program the table was built from.
    #[must_use]
    pub fn ty(&self, id: TypeId) -> &str { &self.types[&id] }

    /// The C function name for a resolved function.
    ///
    /// ## Panics
    ///
    /// Panics if the id was not part of the program the table was built from.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> &str { &self.functions[&id] }

    /// The C variable name for a resolved variable.
    ///
    /// ## Panics
    ///
    /// Panics if the id was not part of the program the table was built from.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &str { &self.variables[&id] }
}

/// The C spelling of a native prelude type.
pub fn native_type_name(name: &str) -> &'static str {
    match name {
        "void" => "void",
        "bool" => "bool",
        "int" => "int64_t",
        "double" => "double",
        "string" => "const char *",
        _ => "void *",
    }
}

/// The registered runtime name of a native function: `co_<name>` with one
/// `_<param type>` segment per parameter, matching the static runtime.
fn native_function_name(program: &Program, id: FunctionId) -> String {
    let function = program.function(id);
    let mut name = format!("co_{}", sanitize(&function.name));
    for &parameter in &function.parameters {
        let ty = program.variable(parameter).ty;
        name.push('_');
        name.push_str(&sanitize(&program.ty(ty).name));
    }

    name
}

/// Keeps only identifier-safe characters.
fn sanitize(name: &str) -> String {
    let cleaned: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
    if cleaned.is_empty() { "anon".to_string() } else { cleaned }
}

/// Appends a numeric suffix until the name is unused.
fn unique(taken: &mut FxHashSet<String>, base: &str) -> String {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{base}_{counter}");
        counter += 1;
    }

    candidate
}
