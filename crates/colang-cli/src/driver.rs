//! The compilation driver.
//!
//! Owns the top-level pipeline: read the prelude and the user source, lex and
//! parse both, analyze them into one root namespace, sort the accumulated
//! issues, and, iff no error was emitted anywhere, run the C backend.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colang_diagnostic::{Issue, issue};
use colang_source::types::SourceManager;

/// Everything a compile run produced.
#[derive(Debug)]
pub struct CompileOutcome {
    /// The source files, for diagnostic rendering
    pub sources: SourceManager,
    /// All issues from every phase, in presentation order
    pub issues: Vec<Issue>,
    /// The generated C, present iff no error-severity issue was emitted
    pub c_source: Option<String>,
}

/// Compiles a source file against a prelude file.
///
/// ## Errors
///
/// Returns an error only for I/O failures; compile problems are reported
/// through the outcome's issues.
pub fn compile_files(source: &Path, prelude: &Path) -> Result<CompileOutcome> {
    let prelude_text = std::fs::read_to_string(prelude)
        .with_context(|| format!("cannot read {}", prelude.display()))?;
    let source_text = std::fs::read_to_string(source)
        .with_context(|| format!("cannot read {}", source.display()))?;

    Ok(compile_sources(
        prelude.display().to_string(),
        prelude_text,
        source.display().to_string(),
        source_text,
    ))
}

/// Compiles in-memory sources; the testable core of the driver.
#[must_use]
pub fn compile_sources(
    prelude_name: String,
    prelude_text: String,
    source_name: String,
    source_text: String,
) -> CompileOutcome {
    let mut sources = SourceManager::new();
    let prelude_id = sources.add_file(prelude_name, prelude_text);
    let source_id = sources.add_file(source_name, source_text);

    let prelude_file =
        sources.get_file(prelude_id).unwrap_or_else(|| unreachable!("file was just added"));
    let source_file =
        sources.get_file(source_id).unwrap_or_else(|| unreachable!("file was just added"));

    let (prelude_unit, mut issues) = colang_parser::parse_file(prelude_file);
    let (source_unit, parse_issues) = colang_parser::parse_file(source_file);
    issues.extend(parse_issues);
    log::debug!(
        "parsed {} prelude and {} source definitions",
        prelude_unit.definitions.len(),
        source_unit.definitions.len()
    );

    let (program, semantic_issues) = colang_analyzer::analyze(&prelude_unit, &source_unit);
    issues.extend(semantic_issues);

    // Present prelude issues before source issues, each file's sorted by
    // position with enclosing spans first on ties.
    issues.sort_by_key(|issue| (issue.span.file_id, issue.sort_key()));

    let c_source = if issue::has_errors(&issues) {
        None
    } else {
        Some(colang_codegen::generate(&program))
    };

    CompileOutcome { sources, issues, c_source }
}

/// Locates `prelude.co` by probing the standard installation paths in order.
///
/// ## Errors
///
/// Returns an error naming the probed paths when none of them exists.
pub fn find_prelude() -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".colang-libs/prelude.co"));
    }
    candidates.push(PathBuf::from("/usr/local/lib/colang/prelude.co"));
    candidates.push(PathBuf::from("/usr/lib/colang/prelude.co"));
    candidates.push(PathBuf::from("/lib/colang/prelude.co"));

    for candidate in &candidates {
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }

    let probed: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    bail!("no prelude.co found; probed: {}", probed.join(", "))
}

/// The default output path: the source with its extension replaced by `.c`
/// (or `.c` appended when it has none).
#[must_use]
pub fn default_output(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    let _ = out.set_extension("c");
    out
}

#[cfg(test)]
mod tests {
    use colang_diagnostic::issue::has_errors;

    use super::*;

    const PRELUDE: &str = include_str!("../../../lib/prelude.co");

    fn compile(source: &str) -> CompileOutcome {
        compile_sources(
            "prelude.co".to_string(),
            PRELUDE.to_string(),
            "main.co".to_string(),
            source.to_string(),
        )
    }

    #[test]
    fn test_hello_world_compiles_cleanly() {
        let outcome = compile("void main() { print(42); }\n");

        assert_eq!(outcome.issues, vec![]);
        let c_source = outcome.c_source.expect("backend should run");
        assert!(!c_source.is_empty());
        assert!(c_source.contains("int main(void)"));
    }

    #[test]
    fn test_errors_block_the_backend() {
        let outcome = compile("int f() { }\nvoid main() { f(); }\n");

        assert!(has_errors(&outcome.issues));
        assert!(outcome.c_source.is_none());
    }

    #[test]
    fn test_warnings_do_not_block_the_backend() {
        let outcome = compile("void main() { int unused = 1; }\n");

        assert!(!has_errors(&outcome.issues));
        assert!(!outcome.issues.is_empty());
        assert!(outcome.c_source.is_some());
    }

    #[test]
    fn test_issues_are_sorted_per_file() {
        let outcome = compile("void main() { unknown1(); unknown2(); }\n");

        let mut sorted = outcome.issues.clone();
        sorted.sort_by_key(|issue| (issue.span.file_id, issue.sort_key()));
        assert_eq!(outcome.issues, sorted);
    }

    #[test]
    fn test_default_output_replaces_extension() {
        assert_eq!(default_output(Path::new("dir/x.co")), PathBuf::from("dir/x.c"));
        assert_eq!(default_output(Path::new("plain")), PathBuf::from("plain.c"));
    }
}
