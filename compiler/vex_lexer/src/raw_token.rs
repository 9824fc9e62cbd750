//! Raw token definition.
//!
//! The `RawToken` enum is the logos-derived tokenizer output before string
//! interning and escape processing.

use logos::Logos;

/// Raw token from logos (before interning).
///
/// logos resolves overlap by longest match, which is what the operator
/// family needs (`<<=` over `<<` over `<=`, `!<=>` over `!=?` over `!=`).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub(crate) enum RawToken {
    // Keywords
    #[token("var")]
    Var,
    #[token("fun")]
    Fun,
    #[token("struct")]
    Struct,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("Mat")]
    Mat,

    // Literals
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    Float,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("@")]
    At,

    // Comparison / equality
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,

    // Logic
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    // Assignment
    #[token("=")]
    Eq,

    // Array-like operator family
    #[token("=?")]
    OneEq,
    #[token("!=?")]
    OneNotEq,
    #[token("<=>")]
    AllEq,
    #[token("!<=>")]
    AllNotEq,
    #[token("<?")]
    OneLt,
    #[token("<=?")]
    OneLtEq,
    #[token(">?")]
    OneGt,
    #[token(">=?")]
    OneGtEq,
    #[token("<<")]
    AllLt,
    #[token("<<=")]
    AllLtEq,
    #[token(">>")]
    AllGt,
    #[token(">>=")]
    AllGtEq,

    // Delimiters & punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("$")]
    Dollar,
    #[token("#")]
    Hash,
}
