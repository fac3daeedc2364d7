//! Tests for the C emitter.
//!
//! These drive the whole front-end and assert on the shape of the generated
//! translation unit.

use colang_source::types::{FileID, SourceFile};

const PRELUDE: &str = include_str!("../../../lib/prelude.co");

fn emit(source: &str) -> String {
    let prelude_file =
        SourceFile::new(FileID::new(1), "prelude.co".to_string(), PRELUDE.to_string());
    let source_file =
        SourceFile::new(FileID::new(2), "main.co".to_string(), source.to_string());

    let (prelude_unit, prelude_issues) = colang_parser::parse_file(&prelude_file);
    assert!(prelude_issues.is_empty(), "prelude should parse cleanly: {prelude_issues:?}");
    let (unit, parse_issues) = colang_parser::parse_file(&source_file);
    assert!(parse_issues.is_empty(), "source should parse cleanly: {parse_issues:?}");

    let (program, issues) = colang_analyzer::analyze(&prelude_unit, &unit);
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    assert!(errors.is_empty(), "analysis should succeed: {errors:?}");

    colang_codegen::generate(&program)
}

#[test]
fn test_hello_world_lowering() {
    let c = emit("void main() { print(42); }");

    assert!(c.contains("static void co_main(void);"));
    assert!(c.contains("co_print_int(INT64_C(42));"));
    assert!(c.contains("int main(void)"));
    assert!(c.contains("co_init_globals();"));
}

#[test]
fn test_native_overloads_map_to_distinct_runtime_names() {
    let c = emit("void main() { print(1); print(2.5); print(\"x\"); }");

    assert!(c.contains("co_print_int(INT64_C(1));"));
    assert!(c.contains("co_print_double(2.5);"));
    assert!(c.contains("co_print_string(\"x\");"));
}

#[test]
fn test_struct_and_method_lowering() {
    let c = emit(
        "struct Counter { int next(int c) { return c + 1; } }\n\
         void main() { Counter x; print(x.next(1)); }",
    );

    assert!(c.contains("typedef struct { char reserved_; } co_Counter;"));
    assert!(c.contains("static int64_t co_Counter_next(co_Counter co__self, int64_t co_c)"));
    assert!(c.contains("co_Counter_next(co_x, INT64_C(1))"));
}

#[test]
fn test_implicit_conversion_becomes_a_cast() {
    let c = emit("void main() { double d = 1; print(d); }");

    assert!(c.contains("double co_d = ((double)(INT64_C(1)));"));
}

#[test]
fn test_string_operations_use_the_runtime() {
    let c = emit(
        "void main() { string s = \"a\" + \"b\"; if (s == \"ab\") { print(s); } }",
    );

    assert!(c.contains("co_string_concat(\"a\", \"b\")"));
    assert!(c.contains("co_string_eq(co_s, \"ab\")"));
}

#[test]
fn test_globals_are_initialized_before_main() {
    let c = emit("int g = 2;\nvoid main() { print(g); }");

    assert!(c.contains("static int64_t co_g;"));
    assert!(c.contains("co_g = INT64_C(2);"));

    let init_at = c.find("co_init_globals();").unwrap();
    let call_at = c.find("co_main();").unwrap();
    assert!(init_at < call_at, "globals must be initialized before main runs");
}

#[test]
fn test_int_main_return_value_is_forwarded() {
    let c = emit("int main() { return 3; }");

    assert!(c.contains("return (int)co_main();"));
}

#[test]
fn test_overloaded_user_functions_get_unique_names() {
    let c = emit(
        "int pick(int x) { return x; }\n\
         int pick(double x) { return 0; }\n\
         void main() { pick(1); pick(2.5); }",
    );

    assert!(c.contains("static int64_t co_pick(int64_t co_x)"));
    assert!(c.contains("static int64_t co_pick_1(double co_x_1)"));
}

#[test]
fn test_control_flow_lowering() {
    let c = emit(
        "int f(int n) { int total = 0; while (n > 0) { total = total + n; n = n - 1; } return total; }\n\
         void main() { print(f(3)); }",
    );

    assert!(c.contains("while ((co_n > INT64_C(0)))"));
    assert!(c.contains("return co_total;"));
}

#[test]
fn test_postfix_step_lowering() {
    let c = emit("void main() { int i = 0; i++; i--; print(i); }");

    assert!(c.contains("(co_i++);"));
    assert!(c.contains("(co_i--);"));
}
