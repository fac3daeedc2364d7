// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The colang project
// SPDX-FileName: crates/colang-codegen/src/lib.rs
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
//! C backend for the colang compiler.
//!
//! Consumes the resolved root namespace produced by `colang-analyzer` and
//! writes one self-contained C translation unit: a small static runtime for
//! the prelude's native functions, struct definitions for user types,
//! prototypes for every function (so forward references need no ordering),
//! then the lowered bodies and a `main` trampoline.
//!
//! The driver invokes this only when analysis emitted no error.

mod emitter;
mod names;

use colang_analyzer::Program;

/// Generates the C translation unit for a fully analyzed program.
#[must_use]
pub fn generate(program: &Program) -> String { emitter::CEmitter::new(program).emit() }
