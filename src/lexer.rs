//! Tokenizer. Structurally the teacher's `Lexer` (char buffer, `pos`,
//! `line`/`col`, `peek`/`peek_ahead`/`advance`) reworked to emit the
//! calculator's token set instead of the bc-language one, and to
//! delegate numeric-literal scanning to [`BigDec::parse_prefix`] rather
//! than collecting a digit string for later parsing.

use std::collections::HashSet;

use crate::bigdec::BigDec;
use crate::error::Error;
use crate::registry;
use crate::token::Token;

pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    op_strings: Vec<&'static str>,
    op_chars: HashSet<char>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let op_strings = registry::operator_strings();
        let op_chars = op_strings.iter().flat_map(|s| s.chars()).collect();
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            op_strings,
            op_chars,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.pos + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn skip_blanks(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '\\' && self.peek_ahead(1) == Some('\n') {
                self.advance();
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    /// Scans a maximal run of operator characters (per `_opchars_init`'s
    /// combined charset) into one raw string first, then looks that
    /// string up as a whole — so an unregistered run like `++` lexes as
    /// one bad token and one error, the way `_getTkStr` does it, rather
    /// than being split into registered single-char pieces.
    fn read_operator(&mut self) -> Result<&'static str, String> {
        let mut raw = String::new();
        while let Some(ch) = self.peek() {
            if !self.op_chars.contains(&ch) {
                break;
            }
            raw.push(ch);
            self.advance();
        }
        self.op_strings
            .iter()
            .find(|candidate| **candidate == raw)
            .copied()
            .ok_or(raw)
    }

    pub fn next_token(&mut self) -> Result<TokenInfo, Error> {
        self.skip_blanks();
        let line = self.line;
        let col = self.col;

        let ch = match self.peek() {
            Some(c) => c,
            None => {
                return Ok(TokenInfo { token: Token::Eof, line, col });
            }
        };

        let token = match ch {
            '\n' => {
                self.advance();
                Token::Newline
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            '0'..='9' | '.' => {
                let n = BigDec::parse_prefix(&self.input, &mut self.pos)?;
                Token::Number(n)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let ident = self.read_ident();
                Token::Ident(ident)
            }
            _ if self.op_chars.contains(&ch) => match self.read_operator() {
                Ok(op) => Token::Op(op.to_string()),
                Err(raw) => return Err(Error::InvalidToken(raw)),
            },
            _ => {
                let bad = ch.to_string();
                self.advance();
                return Err(Error::InvalidToken(bad));
            }
        };

        Ok(TokenInfo { token, line, col })
    }

    pub fn tokenize(&mut self) -> Result<Vec<TokenInfo>, Error> {
        let mut tokens = Vec::new();
        loop {
            let info = self.next_token()?;
            let is_eof = info.token == Token::Eof;
            tokens.push(info);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn number_literal() {
        let t = toks("123.456");
        assert!(matches!(&t[0], Token::Number(n) if n.to_string() == "123.456"));
    }

    #[test]
    fn operators_longest_match() {
        let t = toks("<= < == =");
        assert_eq!(t[0], Token::Op("<=".into()));
        assert_eq!(t[1], Token::Op("<".into()));
        assert_eq!(t[2], Token::Op("==".into()));
        assert_eq!(t[3], Token::Op("=".into()));
    }

    #[test]
    fn unregistered_adjacent_operators_merge_into_one_bad_token() {
        // `+` immediately followed by `+` isn't itself a registered
        // operator string, so the whole run is one invalid token, not
        // two separate `+` tokens.
        let mut lexer = Lexer::new("1++2");
        assert!(matches!(lexer.next_token().unwrap().token, Token::Number(_)));
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err, Error::InvalidToken("++".to_string()));
    }

    #[test]
    fn identifiers_and_parens() {
        let t = toks("max(a, 3)");
        assert_eq!(
            t,
            vec![
                Token::Ident("max".into()),
                Token::LeftParen,
                Token::Ident("a".into()),
                Token::Comma,
                Token::Number("3".parse().unwrap()),
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unknown_char_is_invalid_token() {
        let mut lexer = Lexer::new("@");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn statement_terminators() {
        let t = toks("1;\n");
        assert_eq!(t[1], Token::Semicolon);
        assert_eq!(t[2], Token::Newline);
    }
}
