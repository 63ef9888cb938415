#![forbid(unsafe_code)]

use netscript_ast::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwDef,
    KwIf,
    KwElse,
    KwWhile,
    KwAnd,
    KwOr,
    KwNot,
    KwAs,
    KwTrue,
    KwFalse,

    // Operators / punctuation
    Arrow,
    Colon,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    EqEq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,

    Plus,
    Minus,
    Star,
    Slash,

    Comma,

    LParen,
    RParen,
    LBracket,
    RBracket,

    Newline,
    Indent,
    Dedent,
    Eof,

    // Literals / identifiers
    Ident(String),
    /// Digits plus the type suffix glued to them (`2LL`, `0.5f`). Without a
    /// written suffix this is `f` for fractional literals and `i` otherwise.
    Number { value: f64, suffix: String },
}
