//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Style rules become selector entries of a [`StyleSheet`]; their
//! declarations are normalized on the way in. `@media` blocks are entered
//! and recorded as the media context of the rules inside them; every other
//! at-rule is skipped.

mod values;

use tracing::{debug, warn};

use crate::declaration::{DeclarationFactory, SourceLocation};
use crate::error::CssError;
use crate::selector::parse_selector_list;
use crate::stylesheet::{MediaQueryList, SelectorEntry, SelectorId, SelectorKind, StyleSheet};
use crate::tokenizer::{CssToken, CssTokenizer, Token};

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
/// with the standard property tables.
///
/// # Errors
///
/// See [`parse_stylesheet_with`].
pub fn parse_stylesheet(css: &str) -> Result<StyleSheet, CssError> {
    parse_stylesheet_with(css, &DeclarationFactory::standard())
}

/// Parse `css`, normalizing declarations with `factory`.
///
/// Rules whose selector does not parse and declarations whose value does not
/// fit their property are dropped with a warning, as a browser would.
///
/// # Errors
///
/// - [`CssError::Parse`] when a block is never closed or a rule has no block.
/// - [`CssError::Declaration`] when a declaration fails fatally: an arity
///   violation or a property without an expansion handler.
pub fn parse_stylesheet_with(
    css: &str,
    factory: &DeclarationFactory<'_>,
) -> Result<StyleSheet, CssError> {
    let mut parser = CssParser {
        source: css,
        tokens: CssTokenizer::tokenize(css),
        position: 0,
        lines: LineIndex::new(css),
        factory,
        sheet: StyleSheet::new(),
    };
    // "Consume a list of rules from input, with the top-level flag set."
    parser.consume_list_of_rules(&MediaQueryList::new(), true)?;
    debug!(
        selectors = parser.sheet.selector_count(),
        declarations = parser.sheet.all_declarations().count(),
        "parsed stylesheet"
    );
    Ok(parser.sheet)
}

/// Byte offsets of line starts, for reporting 1-based line and column.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn locate(&self, source: &str, offset: usize) -> SourceLocation {
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        let column = source.get(start..offset).map_or(1, |s| s.chars().count() + 1);
        SourceLocation::new(line, column, offset)
    }
}

struct CssParser<'s, 'f> {
    source: &'s str,
    tokens: Vec<Token>,
    position: usize,
    lines: LineIndex,
    factory: &'f DeclarationFactory<'f>,
    sheet: StyleSheet,
}

impl CssParser<'_, '_> {
    fn peek(&self) -> Option<&CssToken> {
        self.tokens.get(self.position).map(|t| &t.kind)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.start)
    }

    fn location(&self) -> SourceLocation {
        self.lines.locate(self.source, self.offset())
    }

    fn parse_error(&self, message: &str) -> CssError {
        let location = self.location();
        CssError::Parse {
            line: location.line,
            column: location.column,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(CssToken::Whitespace)) {
            self.position += 1;
        }
    }

    /// Source text from byte `start` up to the current token.
    fn text_from(&self, start: usize) -> &str {
        self.source.get(start..self.offset()).unwrap_or_default().trim()
    }

    /// Skip a balanced component value.
    fn skip_component_value(&mut self) {
        match self.peek() {
            Some(
                CssToken::Function(_)
                | CssToken::LeftParen
                | CssToken::LeftBracket
                | CssToken::LeftBrace,
            ) => {
                self.position = values::matching_close(&self.tokens, self.position) + 1;
            }
            _ => self.position += 1,
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Nested lists (inside `@media`) end at the closing `}`, which is
    /// consumed.
    fn consume_list_of_rules(
        &mut self,
        media: &MediaQueryList,
        top_level: bool,
    ) -> Result<(), CssError> {
        loop {
            match self.peek() {
                Some(CssToken::Whitespace | CssToken::Cdo | CssToken::Cdc) => self.position += 1,
                None | Some(CssToken::Eof) => {
                    return if top_level {
                        Ok(())
                    } else {
                        Err(self.parse_error("unclosed @media block"))
                    };
                }
                Some(CssToken::RightBrace) if !top_level => {
                    self.position += 1;
                    return Ok(());
                }
                Some(CssToken::RightBrace) => {
                    debug!(offset = self.offset(), "ignoring stray '}}'");
                    self.position += 1;
                }
                Some(CssToken::AtKeyword(_)) => self.consume_at_rule(media)?,
                Some(_) => self.consume_qualified_rule(media)?,
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self, media: &MediaQueryList) -> Result<(), CssError> {
        let name = match self.peek() {
            Some(CssToken::AtKeyword(name)) => name.to_ascii_lowercase(),
            _ => return Ok(()),
        };
        self.position += 1;
        let prelude_start = self.offset();
        loop {
            match self.peek() {
                // "<semicolon-token>": "Return the at-rule."
                Some(CssToken::Semicolon) => {
                    debug!(at_rule = %name, "skipping statement at-rule");
                    self.position += 1;
                    return Ok(());
                }
                None | Some(CssToken::Eof) => return Ok(()),
                Some(CssToken::LeftBrace) => break,
                Some(_) => self.skip_component_value(),
            }
        }
        if name == "media" {
            let mut nested = media.clone();
            nested.push(normalize_media(self.text_from(prelude_start)));
            self.position += 1;
            self.consume_list_of_rules(&nested, false)
        } else {
            debug!(at_rule = %name, "skipping at-rule block");
            self.skip_component_value();
            Ok(())
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, media: &MediaQueryList) -> Result<(), CssError> {
        let location = self.location();
        let prelude_start = self.offset();
        loop {
            match self.peek() {
                // "<EOF-token>": "This is a parse error. Return nothing."
                None | Some(CssToken::Eof) => {
                    return Err(self.parse_error("expected '{' after selector"));
                }
                Some(CssToken::LeftBrace) => break,
                Some(_) => self.skip_component_value(),
            }
        }
        let text = self.text_from(prelude_start).to_string();
        let block_start = self.position;
        self.position += 1;

        match parse_selector_list(&text) {
            Ok(list) => {
                let kind = match <[_; 1]>::try_from(list) {
                    Ok([selector]) => SelectorKind::Base(selector),
                    Err(list) => SelectorKind::Grouping(list),
                };
                let id = self
                    .sheet
                    .add_selector(SelectorEntry::new(text, kind, media.clone(), location));
                self.consume_declaration_list(id)
            }
            Err(error) => {
                warn!(selector = %text, %error, "skipping rule with unparsable selector");
                self.position = values::matching_close(&self.tokens, block_start) + 1;
                if self.position >= self.tokens.len() {
                    return Err(self.parse_error("unclosed rule block"));
                }
                Ok(())
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Consumes up to and including the block's `}`.
    fn consume_declaration_list(&mut self, selector: SelectorId) -> Result<(), CssError> {
        loop {
            match self.peek() {
                Some(CssToken::Whitespace | CssToken::Semicolon) => self.position += 1,
                Some(CssToken::RightBrace) => {
                    self.position += 1;
                    return Ok(());
                }
                None | Some(CssToken::Eof) => return Err(self.parse_error("unclosed rule block")),
                Some(CssToken::Ident(_)) => self.consume_declaration(selector)?,
                // "This is a parse error. ... consume a component value and
                // throw away the returned value."
                Some(_) => {
                    debug!(offset = self.offset(), "skipping unexpected tokens in rule block");
                    self.skip_to_declaration_end();
                }
            }
        }
    }

    fn skip_to_declaration_end(&mut self) {
        while !matches!(
            self.peek(),
            None | Some(CssToken::Eof | CssToken::Semicolon | CssToken::RightBrace)
        ) {
            self.skip_component_value();
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self, selector: SelectorId) -> Result<(), CssError> {
        let location = self.location();
        let Some(CssToken::Ident(name)) = self.peek().cloned() else {
            return Ok(());
        };
        self.position += 1;
        self.skip_whitespace();
        if !matches!(self.peek(), Some(CssToken::Colon)) {
            debug!(property = %name, "declaration without ':'");
            self.skip_to_declaration_end();
            return Ok(());
        }
        self.position += 1;

        let value_start = self.position;
        self.skip_to_declaration_end();
        let (end, important) = strip_important(&self.tokens[value_start..self.position]);
        let tokens = &self.tokens[value_start..value_start + end];

        let values = match values::declaration_values(self.source, tokens) {
            Ok(values) => values,
            Err(reason) => {
                warn!(property = %name, line = location.line, %reason, "dropping declaration");
                return Ok(());
            }
        };
        match self.factory.create(&name, values, important, location) {
            Ok(declaration) => {
                let _ = self.sheet.add_declaration(selector, declaration);
                Ok(())
            }
            Err(source) if source.is_fatal() => Err(CssError::Declaration {
                line: location.line,
                column: location.column,
                source,
            }),
            Err(error) => {
                warn!(property = %name, line = location.line, %error, "dropping declaration");
                Ok(())
            }
        }
    }
}

/// [CSS Cascade § 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
///
/// Returns how many tokens belong to the value, and the flag.
fn strip_important(tokens: &[Token]) -> (usize, bool) {
    let significant: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !matches!(t.kind, CssToken::Whitespace))
        .map(|(i, _)| i)
        .rev()
        .take(2)
        .collect();
    match significant.as_slice() {
        [last, bang]
            if matches!(&tokens[*last].kind, CssToken::Ident(s) if s.eq_ignore_ascii_case("important"))
                && matches!(tokens[*bang].kind, CssToken::Delim('!')) =>
        {
            (*bang, true)
        }
        _ => (tokens.len(), false),
    }
}

/// Lower-case a media prelude and collapse its whitespace.
fn normalize_media(prelude: &str) -> String {
    values::collapse_whitespace(prelude).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let source = "a{}\n  b{}";
        let lines = LineIndex::new(source);
        assert_eq!(lines.locate(source, 0), SourceLocation::new(1, 1, 0));
        assert_eq!(lines.locate(source, 6), SourceLocation::new(2, 3, 6));
    }

    #[test]
    fn test_strip_important() {
        let tokens = CssTokenizer::tokenize("red ! IMPORTANT ");
        let tokens = &tokens[..tokens.len() - 1];
        assert_eq!(strip_important(tokens), (2, true));
        let tokens = CssTokenizer::tokenize("red");
        assert_eq!(strip_important(&tokens[..1]), (1, false));
    }
}
