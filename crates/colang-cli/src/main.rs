// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The colang project
// SPDX-FileName: crates/colang-cli/src/main.rs
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
//! colangc
//!
//! Command-line interface for the colang compiler: translates one CO source
//! file into a self-contained C translation unit.

mod driver;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colang_diagnostic::{IssueRenderer, Locale};

/// The CO to C compiler
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Input CO source file
    #[clap(value_parser)]
    input: PathBuf,

    /// Target C file; defaults to the source name with its extension
    /// replaced by `.c`
    #[clap(short = 'o', long = "out", value_parser)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Argument errors exit with code 2 (clap's default)
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("colangc: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Compiles the input; returns whether C was produced.
fn run(args: &Args) -> Result<bool> {
    let prelude = driver::find_prelude().context("cannot locate prelude.co")?;
    log::debug!("using prelude at {}", prelude.display());

    let outcome = driver::compile_files(&args.input, &prelude)?;

    // Diagnostics go to stderr, sorted, colored, with locale-aware labels.
    let renderer = IssueRenderer::new(&outcome.sources, Locale::detect(), true);
    eprint!("{}", renderer.render_all(&outcome.issues));

    let Some(c_source) = outcome.c_source else {
        return Ok(false);
    };

    let out_path = args.out.clone().unwrap_or_else(|| driver::default_output(&args.input));
    std::fs::write(&out_path, c_source)
        .with_context(|| format!("cannot write {}", out_path.display()))?;
    log::debug!("wrote {}", out_path.display());

    Ok(true)
}
