#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use logos::Logos;
use miette::Diagnostic;
use netscript_ast::span_between;
use netscript_ast::Span;
use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Diagnostic)]
#[error("lex error: {message}")]
#[diagnostic(code(netscript::lex))]
#[allow(unused_assignments)]
pub struct LexError {
    pub message: String,
    #[label]
    pub span: Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \f\r]+")]
enum RawToken {
    #[token("def")]
    KwDef,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("and")]
    KwAnd,
    #[token("or")]
    KwOr,
    #[token("not")]
    KwNot,
    #[token("as")]
    KwAs,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    #[token("->")]
    Arrow,

    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,

    #[token("==")]
    EqEq,
    #[token("!=")]
    Neq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([a-zA-Z][a-zA-Z0-9]*)?", |lex| parse_number(lex.slice()))]
    Number(Option<(f64, String)>),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

fn parse_number(s: &str) -> Option<(f64, String)> {
    let split = s
        .char_indices()
        .find(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut text = strip_underscores(int_part)?;
    if let Some(frac) = frac_part {
        text.push('.');
        text.push_str(&strip_underscores(frac)?);
    }
    let value = text.parse::<f64>().ok()?;
    let suffix = match (suffix, frac_part) {
        ("", Some(_)) => "f",
        ("", None) => "i",
        (written, _) => written,
    };
    Some((value, suffix.to_string()))
}

fn strip_underscores(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    if s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return None;
    }
    Some(s.replace('_', ""))
}

pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    pub fn lex(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut indent_stack: Vec<usize> = vec![0];

        // Track absolute byte offsets.
        let mut line_start = 0usize;

        for line in self.src.split_inclusive('\n') {
            let line_len = line.len();
            let line_end = line_start + line_len;

            let mut content = line;
            if content.ends_with('\n') {
                content = &content[..content.len() - 1];
            }

            // Comment-only and blank lines never affect indentation.
            let code_end = content.find('#').unwrap_or(content.len());
            let code = &content[..code_end];
            if code.trim().is_empty() {
                line_start = line_end;
                continue;
            }

            if code.as_bytes().contains(&b'\t') {
                return Err(LexError {
                    message: "tabs are not allowed; use spaces".to_string(),
                    span: span_between(line_start, line_end),
                });
            }

            let leading_spaces = code.as_bytes().iter().take_while(|b| **b == b' ').count();

            let current_indent = *indent_stack.last().unwrap_or(&0);
            if leading_spaces > current_indent {
                indent_stack.push(leading_spaces);
                tokens.push(Token {
                    kind: TokenKind::Indent,
                    span: span_between(line_start, line_start + leading_spaces),
                });
            } else if leading_spaces < current_indent {
                while let Some(&top) = indent_stack.last() {
                    if leading_spaces >= top {
                        break;
                    }
                    indent_stack.pop();
                    tokens.push(Token {
                        kind: TokenKind::Dedent,
                        span: span_between(line_start, line_start + leading_spaces),
                    });
                }
                if *indent_stack.last().unwrap_or(&usize::MAX) != leading_spaces {
                    return Err(LexError {
                        message: "inconsistent indentation".to_string(),
                        span: span_between(line_start, line_end),
                    });
                }
            }

            let code = &code[leading_spaces..];
            let mut lex = RawToken::lexer(code);
            while let Some(raw) = lex.next() {
                let span_in_line = lex.span();
                let abs_start = line_start + leading_spaces + span_in_line.start;
                let abs_end = line_start + leading_spaces + span_in_line.end;

                let kind = match raw {
                    Ok(RawToken::KwDef) => TokenKind::KwDef,
                    Ok(RawToken::KwIf) => TokenKind::KwIf,
                    Ok(RawToken::KwElse) => TokenKind::KwElse,
                    Ok(RawToken::KwWhile) => TokenKind::KwWhile,
                    Ok(RawToken::KwAnd) => TokenKind::KwAnd,
                    Ok(RawToken::KwOr) => TokenKind::KwOr,
                    Ok(RawToken::KwNot) => TokenKind::KwNot,
                    Ok(RawToken::KwAs) => TokenKind::KwAs,
                    Ok(RawToken::KwTrue) => TokenKind::KwTrue,
                    Ok(RawToken::KwFalse) => TokenKind::KwFalse,

                    Ok(RawToken::Arrow) => TokenKind::Arrow,

                    Ok(RawToken::PlusEq) => TokenKind::PlusEq,
                    Ok(RawToken::MinusEq) => TokenKind::MinusEq,
                    Ok(RawToken::StarEq) => TokenKind::StarEq,
                    Ok(RawToken::SlashEq) => TokenKind::SlashEq,

                    Ok(RawToken::EqEq) => TokenKind::EqEq,
                    Ok(RawToken::Neq) => TokenKind::Neq,
                    Ok(RawToken::Le) => TokenKind::Le,
                    Ok(RawToken::Ge) => TokenKind::Ge,
                    Ok(RawToken::Lt) => TokenKind::Lt,
                    Ok(RawToken::Gt) => TokenKind::Gt,

                    Ok(RawToken::Plus) => TokenKind::Plus,
                    Ok(RawToken::Minus) => TokenKind::Minus,
                    Ok(RawToken::Star) => TokenKind::Star,
                    Ok(RawToken::Slash) => TokenKind::Slash,

                    Ok(RawToken::Colon) => TokenKind::Colon,
                    Ok(RawToken::Eq) => TokenKind::Eq,
                    Ok(RawToken::Comma) => TokenKind::Comma,

                    Ok(RawToken::LParen) => TokenKind::LParen,
                    Ok(RawToken::RParen) => TokenKind::RParen,
                    Ok(RawToken::LBracket) => TokenKind::LBracket,
                    Ok(RawToken::RBracket) => TokenKind::RBracket,

                    Ok(RawToken::Ident(s)) => TokenKind::Ident(s),
                    Ok(RawToken::Number(Some((value, suffix)))) => TokenKind::Number { value, suffix },
                    Ok(RawToken::Number(None)) => {
                        return Err(LexError {
                            message: "invalid numeric literal".to_string(),
                            span: span_between(abs_start, abs_end),
                        });
                    }

                    Err(_) => {
                        return Err(LexError {
                            message: "unexpected token".to_string(),
                            span: span_between(abs_start, abs_end),
                        });
                    }
                };

                tokens.push(Token {
                    kind,
                    span: span_between(abs_start, abs_end),
                });
            }

            // End of logical line.
            tokens.push(Token {
                kind: TokenKind::Newline,
                span: span_between(line_end, line_end),
            });

            line_start = line_end;
        }

        // Close open indents.
        while indent_stack.len() > 1 {
            indent_stack.pop();
            tokens.push(Token {
                kind: TokenKind::Dedent,
                span: span_between(self.src.len(), self.src.len()),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: span_between(self.src.len(), self.src.len()),
        });

        Ok(tokens)
    }
}
