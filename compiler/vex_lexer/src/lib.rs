//! Lexer for Vex using logos with string interning.
//!
//! The entry point is [`lex()`], which converts source text into a
//! [`TokenList`]. Invalid input produces `TokenKind::Error` tokens and the
//! lexer keeps going, so the parser can report every problem with a span.
//! The list is always terminated by an `Eof` token.

mod escape;
mod raw_token;

use logos::Logos;
use vex_ir::{Span, StringInterner, Token, TokenKind, TokenList};

use escape::unescape;
use raw_token::RawToken;

/// Lex source code into a [`TokenList`].
///
/// Identifiers and string literals are interned through `interner`;
/// string escapes are processed here so downstream phases only ever see
/// the cooked text.
pub fn lex(source: &str, interner: &mut StringInterner) -> TokenList {
    let mut result = TokenList::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(token_result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let slice = lexer.slice();

        let kind = match token_result {
            Ok(raw) => convert(raw, slice, interner),
            Err(()) => TokenKind::Error,
        };
        result.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    result.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    result
}

fn convert(raw: RawToken, slice: &str, interner: &mut StringInterner) -> TokenKind {
    match raw {
        RawToken::Var => TokenKind::Var,
        RawToken::Fun => TokenKind::Fun,
        RawToken::Struct => TokenKind::Struct,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Return => TokenKind::Return,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::Mat => TokenKind::Mat,

        RawToken::Int => match slice.parse::<i64>() {
            Ok(value) => TokenKind::Int(value),
            Err(_) => TokenKind::Error,
        },
        RawToken::Float => match slice.parse::<f64>() {
            Ok(value) => TokenKind::Float(value.to_bits()),
            Err(_) => TokenKind::Error,
        },
        RawToken::Str => {
            let body = &slice[1..slice.len() - 1];
            TokenKind::Str(interner.intern(&unescape(body)))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::At => TokenKind::At,

        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,

        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Eq => TokenKind::Eq,

        RawToken::OneEq => TokenKind::OneEq,
        RawToken::OneNotEq => TokenKind::OneNotEq,
        RawToken::AllEq => TokenKind::AllEq,
        RawToken::AllNotEq => TokenKind::AllNotEq,
        RawToken::OneLt => TokenKind::OneLt,
        RawToken::OneLtEq => TokenKind::OneLtEq,
        RawToken::OneGt => TokenKind::OneGt,
        RawToken::OneGtEq => TokenKind::OneGtEq,
        RawToken::AllLt => TokenKind::AllLt,
        RawToken::AllLtEq => TokenKind::AllLtEq,
        RawToken::AllGt => TokenKind::AllGt,
        RawToken::AllGtEq => TokenKind::AllGtEq,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::Hash => TokenKind::Hash,
    }
}
