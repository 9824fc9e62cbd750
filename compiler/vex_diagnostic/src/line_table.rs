//! Byte offset to line/column translation.

use vex_ir::Span;

/// Precomputed table of line start offsets for one source file.
#[derive(Clone, Debug)]
pub struct LineOffsetTable {
    line_starts: Vec<u32>,
}

/// A 1-based line/column position.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineOffsetTable {
    /// Build the table for a source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        LineOffsetTable { line_starts }
    }

    /// Translate a byte offset to 1-based line and column.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        LineCol {
            line: line_idx as u32 + 1,
            column: offset - self.line_starts[line_idx] + 1,
        }
    }

    /// Byte offset where a 1-based line begins.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize - 1).copied()
    }

    /// Text of a 1-based line (without the trailing newline).
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let start = self.line_start(line)? as usize;
        let rest = source.get(start..)?;
        Some(rest.split('\n').next().unwrap_or(rest))
    }

    /// Line/column of a span's start.
    pub fn span_start(&self, span: Span) -> LineCol {
        self.line_col(span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "ab\ncde\n\nf";
        let table = LineOffsetTable::new(src);
        assert_eq!(table.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(table.line_col(1), LineCol { line: 1, column: 2 });
        assert_eq!(table.line_col(3), LineCol { line: 2, column: 1 });
        assert_eq!(table.line_col(5), LineCol { line: 2, column: 3 });
        assert_eq!(table.line_col(8), LineCol { line: 4, column: 1 });
    }

    #[test]
    fn test_line_text() {
        let src = "ab\ncde\n";
        let table = LineOffsetTable::new(src);
        assert_eq!(table.line_text(src, 1), Some("ab"));
        assert_eq!(table.line_text(src, 2), Some("cde"));
    }
}
