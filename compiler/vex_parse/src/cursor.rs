//! Token cursor for navigating the token stream.

use vex_ir::{Name, Span, Token, TokenKind, TokenList};

/// Cursor over a [`TokenList`].
///
/// The list is `Eof`-terminated, so `current()` is always valid and the
/// cursor never advances past the final token.
pub(crate) struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(
            matches!(tokens.get(tokens.len().saturating_sub(1)).map(|t| t.kind), Some(TokenKind::Eof)),
            "token list must be Eof-terminated"
        );
        Cursor { tokens, pos: 0 }
    }

    /// The current token.
    #[inline]
    pub(crate) fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.get(self.tokens.len() - 1).expect("non-empty list"))
    }

    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    /// The token after the current one (`Eof` at the end).
    pub(crate) fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Advance past the current token, returning it.
    pub(crate) fn bump(&mut self) -> Token {
        let token = *self.current();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token is `kind`.
    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Whether the current token is an identifier.
    pub(crate) fn at_ident(&self) -> bool {
        matches!(self.kind(), TokenKind::Ident(_))
    }

    /// Consume an identifier, returning its name and span.
    pub(crate) fn eat_ident(&mut self) -> Option<(Name, Span)> {
        match self.kind() {
            TokenKind::Ident(name) => {
                let span = self.span();
                self.bump();
                Some((name, span))
            }
            _ => None,
        }
    }

    /// Whether the cursor is at the end of input.
    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }
}
