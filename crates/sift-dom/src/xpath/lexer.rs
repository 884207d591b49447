//! [§ 3.7 Lexical Structure](https://www.w3.org/TR/1999/REC-xpath-19991116/#exprlex)

use super::XPathError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Slash,
    DoubleSlash,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DoubleDot,
    At,
    Comma,
    DoubleColon,
    Pipe,
    Plus,
    Minus,
    Star,
    Equals,
    NotEquals,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Literal(String),
    Number(f64),
    Name(String),
}

/// A token with its byte offset, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Spanned {
    pub(super) token: Token,
    pub(super) offset: usize,
}

pub(super) fn tokenize(input: &str) -> Result<Vec<Spanned>, XPathError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let mut push = |token: Token, width: usize| {
            tokens.push(Spanned { token, offset });
            width
        };

        i += match c {
            c if c.is_whitespace() => 1,
            '/' if next == Some('/') => push(Token::DoubleSlash, 2),
            '/' => push(Token::Slash, 1),
            '(' => push(Token::LeftParen, 1),
            ')' => push(Token::RightParen, 1),
            '[' => push(Token::LeftBracket, 1),
            ']' => push(Token::RightBracket, 1),
            '.' if next == Some('.') => push(Token::DoubleDot, 2),
            '.' if next.is_some_and(|n| n.is_ascii_digit()) => {
                let (value, width) = scan_number(&chars[i..]);
                push(Token::Number(value), width)
            }
            '.' => push(Token::Dot, 1),
            '@' => push(Token::At, 1),
            ',' => push(Token::Comma, 1),
            ':' if next == Some(':') => push(Token::DoubleColon, 2),
            '|' => push(Token::Pipe, 1),
            '+' => push(Token::Plus, 1),
            '-' => push(Token::Minus, 1),
            '*' => push(Token::Star, 1),
            '=' => push(Token::Equals, 1),
            '!' if next == Some('=') => push(Token::NotEquals, 2),
            '<' if next == Some('=') => push(Token::LessEq, 2),
            '<' => push(Token::Less, 1),
            '>' if next == Some('=') => push(Token::GreaterEq, 2),
            '>' => push(Token::Greater, 1),
            '"' | '\'' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&(_, q)| q == c)
                    .ok_or_else(|| XPathError::Syntax {
                        offset,
                        message: "unterminated string literal".to_string(),
                    })?;
                let literal: String = chars[i + 1..i + 1 + end].iter().map(|&(_, ch)| ch).collect();
                push(Token::Literal(literal), end + 2)
            }
            c if c.is_ascii_digit() => {
                let (value, width) = scan_number(&chars[i..]);
                push(Token::Number(value), width)
            }
            c if is_name_start(c) => {
                let width = chars[i..]
                    .iter()
                    .take_while(|&&(_, ch)| is_name_char(ch))
                    .count();
                // A trailing '-' or '.' belongs to the name per NCName.
                let name: String = chars[i..i + width].iter().map(|&(_, ch)| ch).collect();
                push(Token::Name(name), width)
            }
            other => {
                return Err(XPathError::Syntax {
                    offset,
                    message: format!("unexpected character {other:?}"),
                });
            }
        };
    }

    Ok(tokens)
}

fn scan_number(chars: &[(usize, char)]) -> (f64, usize) {
    let mut seen_dot = false;
    let width = chars
        .iter()
        .take_while(|&&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        .count();
    let text: String = chars[..width].iter().map(|&(_, c)| c).collect();
    (text.parse().unwrap_or(f64::NAN), width)
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

const fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}
