//! Token set produced by [`crate::lexer::Lexer`] for the calculator
//! language. Unlike the teacher's flat bc-keyword enum, this mirrors the
//! original's small virtual token hierarchy (number / identifier /
//! operator / delimiter / terminator) by tagging each variant instead of
//! dispatching through a vtable.

use crate::bigdec::BigDec;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A parsed numeric literal.
    Number(BigDec),
    /// A bare identifier; the evaluator resolves it to a variable or,
    /// immediately followed by `(`, a function call.
    Ident(String),
    /// Raw operator text (e.g. `"+"`, `"<="`). Whether it acts as a
    /// prefix, postfix, or infix operator is resolved by parser state,
    /// not by the lexer (spec.md §4.7/§4.8).
    Op(String),
    LeftParen,
    RightParen,
    Comma,
    /// `;` - end of statement (ENOS).
    Semicolon,
    /// `\n` - end of line, also a statement terminator (ENOL).
    Newline,
    /// End of input (ENOF).
    Eof,
}

impl Token {
    /// True for any of the three statement-terminating tokens.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Token::Semicolon | Token::Newline | Token::Eof)
    }
}
