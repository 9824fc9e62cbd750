//! Driver pipeline tests: whole files through `compile` and the commands.

use std::io::Write;

use vexc::commands::{check_file, run_file};
use vexc::compile;

fn write_program(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".vx")
        .tempfile()
        .expect("create temp file");
    file.write_all(source.as_bytes()).expect("write program");
    file
}

#[test]
fn run_returns_zero_on_success() {
    let file = write_program(
        "fun add (a: Int, b: Int): Int { return a + b }\n\
         print(\"\" + add(4, 7))\n",
    );
    assert_eq!(run_file(file.path().to_str().unwrap()), 0);
}

#[test]
fn run_returns_nonzero_on_semantic_error() {
    let file = write_program("var x: Int = \"not an int\"\n");
    assert_eq!(run_file(file.path().to_str().unwrap()), 1);
}

#[test]
fn run_returns_nonzero_on_runtime_fault() {
    let file = write_program("var a: Int[] = [1, 2]\nreturn a[10]\n");
    assert_eq!(run_file(file.path().to_str().unwrap()), 1);
}

#[test]
fn run_returns_nonzero_on_parse_error() {
    let file = write_program("var = : Int\n");
    assert_eq!(run_file(file.path().to_str().unwrap()), 1);
}

#[test]
fn check_does_not_execute() {
    // A runtime fault must not affect `check`.
    let file = write_program("var a: Int[] = [1, 2]\nvar b: Int = a[10]\n");
    assert_eq!(check_file(file.path().to_str().unwrap()), 0);
}

#[test]
fn missing_file_fails() {
    assert_eq!(run_file("/nonexistent/missing.vx"), 1);
}

#[test]
fn compile_collects_semantic_diagnostics() {
    let outcome = compile("var x: Int = yy\nvar z: Bool = 3\n");
    let errors = outcome.err().expect("expected compile errors");
    assert!(errors.diagnostics.len() >= 2);
    assert!(errors
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Could not resolve: yy")));
}

#[test]
fn compile_succeeds_on_kitchen_sink() {
    let source = r#"
        struct Point { var x: Int; var y: Int }

        fun norm1 (p: Point): Int {
            if (p.x < 0) return 0 - p.x - p.y
            return p.x + p.y
        }

        fun scale (v: Int, k: Float): Float {
            return v * k
        }

        var p: Point = $Point(3, 4)
        var grid: Mat#Int = [0](2, 2)
        grid = grid + 1

        case grid.shape {
            [2, 2] : { print("square") },
            default : { print("odd") }
        }

        var scaled: Mat#Float = scale([1, 2, 3], 1.5)
        while (p.x < 10) { p.x = p.x + 1 }
        print("" + norm1(p))
    "#;
    assert!(compile(source).is_ok());
}
