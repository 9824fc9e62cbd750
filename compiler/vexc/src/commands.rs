//! CLI commands: `run`, `check`, `parse`.
//!
//! Each command returns its exit code; `main` is the only place that
//! terminates the process. Diagnostics go to stderr, program output and
//! the top-level return value to stdout.

use std::fs;

use vex_diagnostic::{ColorMode, Diagnostic, TerminalEmitter};
use vex_eval::{Interpreter, PrintHandler, Value};

use crate::{compile, CompileErrors};

fn read_source(path: &str) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read {path}: {e}");
        1
    })
}

fn report(path: &str, source: &str, diagnostics: &[Diagnostic]) {
    let emitter = TerminalEmitter::new(path, source, ColorMode::Auto);
    let mut stderr = std::io::stderr().lock();
    let _ = emitter.emit_all(diagnostics, &mut stderr);
}

/// Parse, analyze and execute a file.
pub fn run_file(path: &str) -> i32 {
    let Ok(source) = read_source(path) else {
        return 1;
    };
    let program = match compile(&source) {
        Ok(program) => program,
        Err(CompileErrors { diagnostics }) => {
            report(path, &source, &diagnostics);
            return 1;
        }
    };

    let mut interpreter = Interpreter::with_print_handler(
        &program.ast,
        &program.analysis,
        &program.interner,
        PrintHandler::stdout(),
    );
    match interpreter.interpret(program.root) {
        Ok(Value::Null) => 0,
        Ok(value) => {
            println!(
                "{}",
                vex_eval::render(&value, &program.ast, &program.interner)
            );
            0
        }
        Err(fault) => {
            let mut diagnostic = Diagnostic::error(fault.code).with_message(fault.message);
            if let Some(span) = fault.span {
                diagnostic = diagnostic.with_label(span, "while evaluating this");
            }
            report(path, &source, &[diagnostic]);
            1
        }
    }
}

/// Parse and analyze a file without executing it.
pub fn check_file(path: &str) -> i32 {
    let Ok(source) = read_source(path) else {
        return 1;
    };
    match compile(&source) {
        Ok(_) => {
            println!("{path}: ok");
            0
        }
        Err(CompileErrors { diagnostics }) => {
            report(path, &source, &diagnostics);
            1
        }
    }
}

/// Dump the parsed AST of a file.
pub fn parse_file(path: &str) -> i32 {
    let Ok(source) = read_source(path) else {
        return 1;
    };
    let mut interner = vex_ir::StringInterner::new();
    let tokens = vex_lexer::lex(&source, &mut interner);
    let parsed = vex_parse::parse(&tokens, &mut interner);
    if parsed.diagnostics.iter().any(|d| d.is_error()) {
        report(path, &source, &parsed.diagnostics);
        return 1;
    }
    println!("{:#?}", parsed.ast);
    0
}
