#![forbid(unsafe_code)]

mod error;
mod parser;

use netscript_lex::Lexer;

pub use error::ParseError;
pub use parser::Parser;

/// Lex and parse a whole script into its function definitions.
pub fn parse_source(src: &str) -> Result<netscript_ast::Program, ParseError> {
    let tokens = Lexer::new(src).lex()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_program()
}

pub fn parse_expr(src: &str) -> Result<netscript_ast::Expr, ParseError> {
    let tokens = Lexer::new(src).lex()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_expr_eof()
}
