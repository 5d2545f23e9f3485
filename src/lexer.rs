use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ExprError, ExprErrorKind};

/// Token stream for the restricted expression grammar.
///
/// Keywords (`and`, `or`, `not`, `None`, `True`, `False`) arrive as `Word`
/// and are distinguished in the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Identifier or keyword.
    Word(String),
    /// Quoted string literal, quotes removed and escapes resolved.
    /// Single and double quotes are both accepted.
    Str(String),
    /// Numeric literal, held exactly.
    Number(Decimal),
    // Comparison operators
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    // Punctuation
    LParen,
    RParen,
    Comma,
    Eof,
}

fn syntax(message: impl Into<String>) -> ExprError {
    ExprError::new(ExprErrorKind::Syntax, message)
}

pub fn lex(src: &str) -> Result<Vec<Token>, ExprError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        // String literal, either quote style
        if c == '"' || c == '\'' {
            let quote = c;
            pos += 1;
            let mut s = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(syntax("unterminated string literal"));
                }
                let sc = chars[pos];
                if sc == quote {
                    pos += 1;
                    break;
                }
                if sc == '\\' {
                    pos += 1;
                    if pos >= chars.len() {
                        return Err(syntax("unterminated escape in string"));
                    }
                    let ec = chars[pos];
                    match ec {
                        '\\' | '"' | '\'' => s.push(ec),
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    pos += 1;
                    continue;
                }
                s.push(sc);
                pos += 1;
            }
            tokens.push(Token::Str(s));
            continue;
        }

        // Numeric literal
        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos + 1 < chars.len() && chars[pos] == '.' && chars[pos + 1].is_ascii_digit() {
                pos += 1;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let text: String = chars[start..pos].iter().collect();
            let n = Decimal::from_str(&text)
                .map_err(|_| syntax(format!("invalid numeric literal '{}'", text)))?;
            tokens.push(Token::Number(n));
            continue;
        }

        // Identifier or keyword
        if c.is_ascii_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            tokens.push(Token::Word(chars[start..pos].iter().collect()));
            continue;
        }

        // Operators and punctuation
        let two: Option<char> = chars.get(pos + 1).copied();
        match (c, two) {
            ('=', Some('=')) => {
                tokens.push(Token::Eq);
                pos += 2;
            }
            ('!', Some('=')) => {
                tokens.push(Token::Ne);
                pos += 2;
            }
            ('<', Some('=')) => {
                tokens.push(Token::Le);
                pos += 2;
            }
            ('>', Some('=')) => {
                tokens.push(Token::Ge);
                pos += 2;
            }
            ('<', _) => {
                tokens.push(Token::Lt);
                pos += 1;
            }
            ('>', _) => {
                tokens.push(Token::Gt);
                pos += 1;
            }
            ('+', _) => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            ('-', _) => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            ('*', _) => {
                tokens.push(Token::Star);
                pos += 1;
            }
            ('/', _) => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            ('(', _) => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            (')', _) => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            (',', _) => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            _ => return Err(syntax(format!("unexpected character '{}'", c))),
        }
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}
