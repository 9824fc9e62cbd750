//! Vex driver library: the compile pipeline and the CLI commands.
//!
//! The pipeline is the contract the phases were built around: parse the
//! source text, walk the AST registering semantic rules, run the reactor
//! to fixpoint, surface accumulated diagnostics, and only then hand the
//! tree to the interpreter.

pub mod commands;
pub mod tracing_setup;

use tracing::debug;
use vex_diagnostic::Diagnostic;
use vex_ir::{Ast, NodeId, StringInterner};
use vex_sema::Analysis;

/// A program that made it through parsing and semantic analysis.
pub struct CompiledProgram {
    pub ast: Ast,
    pub root: NodeId,
    pub interner: StringInterner,
    pub analysis: Analysis,
}

/// Compile failure: which diagnostics stopped the pipeline.
pub struct CompileErrors {
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the front half of the pipeline: lex, parse, analyze.
///
/// Parse errors abort before analysis; semantic errors abort before
/// execution. Either way every collected diagnostic is returned.
pub fn compile(source: &str) -> Result<CompiledProgram, CompileErrors> {
    let mut interner = StringInterner::new();
    let tokens = vex_lexer::lex(source, &mut interner);
    let parsed = vex_parse::parse(&tokens, &mut interner);
    if parsed.diagnostics.iter().any(|d| d.is_error()) {
        debug!(count = parsed.diagnostics.len(), "aborting after parse errors");
        return Err(CompileErrors {
            diagnostics: parsed.diagnostics,
        });
    }

    let mut ast = parsed.ast;
    let analysis = vex_sema::analyze(&mut ast, &mut interner, parsed.root);
    if !analysis.is_clean() {
        debug!(
            count = analysis.diagnostics.len(),
            "aborting after semantic errors"
        );
        return Err(CompileErrors {
            diagnostics: analysis.diagnostics,
        });
    }

    Ok(CompiledProgram {
        ast,
        root: parsed.root,
        interner,
        analysis,
    })
}
