//! Terminal emitter: human-readable diagnostic rendering.
//!
//! When source text is available, renders a source snippet with an
//! underline for the primary label. Falls back to byte offsets otherwise.

use std::io::{self, Write};

use crate::{Diagnostic, LineOffsetTable, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum ColorMode {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Renders diagnostics against one source file.
pub struct TerminalEmitter<'s> {
    path: &'s str,
    source: &'s str,
    table: LineOffsetTable,
    color: bool,
}

impl<'s> TerminalEmitter<'s> {
    pub fn new(path: &'s str, source: &'s str, mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        };
        TerminalEmitter {
            path,
            source,
            table: LineOffsetTable::new(source),
            color,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{}", colors::RESET)
        } else {
            text.to_owned()
        }
    }

    /// Render one diagnostic to a string.
    pub fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();
        let severity_color = match diag.severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
        };
        let head = format!("{}[{}]", diag.severity.as_str(), diag.code);
        out.push_str(&self.paint(severity_color, &head));
        out.push_str(": ");
        out.push_str(&self.paint(colors::BOLD, &diag.message));
        out.push('\n');

        for label in &diag.labels {
            let pos = self.table.span_start(label.span);
            out.push_str(&format!(
                "  --> {}:{}:{}\n",
                self.path, pos.line, pos.column
            ));
            if let Some(line_text) = self.table.line_text(self.source, pos.line) {
                let line_no = pos.line.to_string();
                let pad = " ".repeat(line_no.len());
                out.push_str(&format!("{pad} |\n{line_no} | {line_text}\n"));
                let col = pos.column as usize - 1;
                let width = (label.span.len() as usize).clamp(1, line_text.len().saturating_sub(col).max(1));
                let marker = if label.is_primary { "^" } else { "-" }.repeat(width);
                let marker_color = if label.is_primary {
                    severity_color
                } else {
                    colors::SECONDARY
                };
                out.push_str(&format!(
                    "{pad} | {}{} {}\n",
                    " ".repeat(col),
                    self.paint(marker_color, &marker),
                    label.message
                ));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("  = note: {note}\n"));
        }
        out
    }

    /// Render and write a batch of diagnostics, with a trailing summary.
    pub fn emit_all(&self, diags: &[Diagnostic], writer: &mut impl Write) -> io::Result<()> {
        for diag in diags {
            writeln!(writer, "{}", self.render(diag))?;
        }
        let errors = diags.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            let plural = if errors == 1 { "" } else { "s" };
            writeln!(
                writer,
                "{}",
                self.paint(
                    colors::ERROR,
                    &format!("aborting due to {errors} previous error{plural}")
                )
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use vex_ir::Span;

    #[test]
    fn test_render_snippet() {
        let source = "var x: Int = true\n";
        let emitter = TerminalEmitter::new("test.vx", source, ColorMode::Never);
        let diag = Diagnostic::error(ErrorCode::E2004)
            .with_message("incompatible initializer type provided for variable `x`: expected Int but got Bool")
            .with_label(Span::new(13, 17), "expected Int");
        let text = emitter.render(&diag);
        assert!(text.contains("error[E2004]"));
        assert!(text.contains("test.vx:1:14"));
        assert!(text.contains("var x: Int = true"));
        assert!(text.contains("^^^^"));
    }
}
