//! Component values of a declaration to typed [`DeclarationValue`]s.

use crate::tokenizer::{CssToken, NumericType, Token};
use crate::values::{DeclarationValue, ValueType, classify_dimension, classify_ident, is_color_function};

/// Convert the tokens of one declaration value, `!important` removed.
///
/// Whitespace separates values and is dropped. Functions and blocks become
/// one value each, with inner whitespace collapsed.
pub(super) fn declaration_values(
    source: &str,
    tokens: &[Token],
) -> Result<Vec<DeclarationValue>, String> {
    let mut values = Vec::new();
    let mut index = 0;
    while let Some(token) = tokens.get(index) {
        let text = &source[token.start..token.end];
        let value = match &token.kind {
            CssToken::Whitespace => {
                index += 1;
                continue;
            }
            CssToken::Function(name) => {
                let close = matching_close(tokens, index);
                let end = tokens.get(close).map_or(token.end, |t| t.end);
                let literal = collapse_whitespace(&source[token.start..end]);
                index = close;
                let value_type = if name.eq_ignore_ascii_case("url") {
                    ValueType::Url
                } else if is_color_function(name) {
                    ValueType::Color
                } else {
                    ValueType::Function
                };
                DeclarationValue::new(literal, value_type)
            }
            CssToken::LeftParen | CssToken::LeftBracket | CssToken::LeftBrace => {
                let close = matching_close(tokens, index);
                let end = tokens.get(close).map_or(token.end, |t| t.end);
                index = close;
                DeclarationValue::new(collapse_whitespace(&source[token.start..end]), ValueType::Other)
            }
            CssToken::Ident(ident) => DeclarationValue::new(text, classify_ident(ident)),
            CssToken::Hash { value, .. } => {
                let is_hex = matches!(value.len(), 3 | 4 | 6 | 8)
                    && value.chars().all(|c| c.is_ascii_hexdigit());
                DeclarationValue::new(text, if is_hex { ValueType::Color } else { ValueType::Other })
            }
            CssToken::String(_) => DeclarationValue::new(text, ValueType::String),
            CssToken::Url(_) => DeclarationValue::new(text, ValueType::Url),
            CssToken::Number(NumericType::Integer) => DeclarationValue::new(text, ValueType::Integer),
            CssToken::Number(NumericType::Number) => DeclarationValue::new(text, ValueType::Number),
            CssToken::Percentage => DeclarationValue::new(text, ValueType::Percentage),
            CssToken::Dimension { unit } => DeclarationValue::new(text, classify_dimension(unit)),
            CssToken::Comma => DeclarationValue::new(",", ValueType::Separator),
            CssToken::Delim('/') => DeclarationValue::new("/", ValueType::Operator),
            CssToken::BadString => return Err("unterminated string".to_string()),
            CssToken::BadUrl => return Err("malformed url()".to_string()),
            _ => DeclarationValue::new(text, ValueType::Other),
        };
        values.push(value);
        index += 1;
    }
    Ok(values)
}

/// Index of the token closing the block or function opened at `open`, or
/// the last index when it is never closed.
pub(super) fn matching_close(tokens: &[Token], open: usize) -> usize {
    let mut stack: Vec<char> = Vec::new();
    for (index, token) in tokens.iter().enumerate().skip(open) {
        let close = match token.kind {
            CssToken::Function(_) | CssToken::LeftParen => {
                stack.push(')');
                continue;
            }
            CssToken::LeftBracket => {
                stack.push(']');
                continue;
            }
            CssToken::LeftBrace => {
                stack.push('}');
                continue;
            }
            CssToken::RightParen => ')',
            CssToken::RightBracket => ']',
            CssToken::RightBrace => '}',
            _ => continue,
        };
        if stack.last() == Some(&close) {
            let _ = stack.pop();
            if stack.is_empty() {
                return index;
            }
        }
    }
    tokens.len().saturating_sub(1)
}

/// Runs of whitespace become one space; none is kept next to brackets.
/// Quoted text is copied unchanged.
pub(super) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut quote: Option<char> = None;
    for c in text.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() && !out.ends_with(['(', '[']) && !matches!(c, ')' | ']') {
            out.push(' ');
        }
        pending_space = false;
        if matches!(c, '"' | '\'') {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CssTokenizer;

    fn values(source: &str) -> Vec<(String, ValueType)> {
        let tokens = CssTokenizer::tokenize(source);
        let tokens = &tokens[..tokens.len() - 1];
        declaration_values(source, tokens)
            .unwrap_or_else(|e| panic!("{e}"))
            .into_iter()
            .map(|v| (v.literal().to_string(), v.value_type()))
            .collect()
    }

    #[test]
    fn test_types_of_common_tokens() {
        assert_eq!(
            values("1px solid #FFF, 50% 2s"),
            vec![
                ("1px".to_string(), ValueType::Length),
                ("solid".to_string(), ValueType::Ident),
                ("#FFF".to_string(), ValueType::Color),
                (",".to_string(), ValueType::Separator),
                ("50%".to_string(), ValueType::Percentage),
                ("2s".to_string(), ValueType::Time),
            ]
        );
    }

    #[test]
    fn test_functions_are_single_values() {
        assert_eq!(
            values("rgb( 1 , 2, 3 ) translate(10px,  20px)"),
            vec![
                ("rgb(1 , 2, 3)".to_string(), ValueType::Color),
                ("translate(10px, 20px)".to_string(), ValueType::Function),
            ]
        );
    }

    #[test]
    fn test_quoted_url_keeps_its_literal() {
        assert_eq!(
            values("url(\"a b.png\") / 0"),
            vec![
                ("url(\"a b.png\")".to_string(), ValueType::Url),
                ("/".to_string(), ValueType::Operator),
                ("0".to_string(), ValueType::Integer),
            ]
        );
    }
}
