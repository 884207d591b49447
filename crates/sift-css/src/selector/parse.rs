//! Selector text to [`ComplexSelector`].
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! "The grammar of Selectors is defined in terms of CSS syntax."

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass,
    SimpleSelector,
};

/// Selector text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {reason}")]
pub struct SelectorParseError {
    /// The offending selector text.
    pub selector: String,
    /// What went wrong.
    pub reason: String,
}

/// Pseudo-elements that CSS 2 allowed with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Split a selector list at top-level commas and parse each part.
///
/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// # Errors
///
/// Returns the first [`SelectorParseError`] among the parts; a list with an
/// invalid selector is invalid as a whole.
pub fn parse_selector_list(raw: &str) -> Result<Vec<ComplexSelector>, SelectorParseError> {
    split_top_level(raw)
        .into_iter()
        .map(parse_selector)
        .collect()
}

/// Split at commas outside parentheses, brackets and strings.
pub(crate) fn split_top_level(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (index, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(raw[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(raw[start..].trim());
    parts
}

/// Parse one complex selector.
///
/// Supports type, class, ID, universal, attribute, pseudo-class and
/// pseudo-element selectors, compounds of them, and the four combinators.
///
/// # Errors
///
/// Returns [`SelectorParseError`] for empty input, a combinator without a
/// compound on either side, unterminated strings or brackets, and characters
/// that cannot start a simple selector.
pub fn parse_selector(raw: &str) -> Result<ComplexSelector, SelectorParseError> {
    let mut parser = SelectorParser {
        raw,
        chars: raw.trim().chars().peekable(),
    };
    parser.parse()
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

struct SelectorParser<'a> {
    raw: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl SelectorParser<'_> {
    fn error(&self, reason: impl Into<String>) -> SelectorParseError {
        SelectorParseError {
            selector: self.raw.trim().to_string(),
            reason: reason.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(char::is_ascii_whitespace).is_some() {}
    }

    /// Consume an identifier, honouring backslash escapes.
    fn take_ident(&mut self) -> String {
        let mut ident = String::new();
        loop {
            if let Some(c) = self.chars.next_if(|&c| is_ident_char(c)) {
                ident.push(c);
            } else if self.chars.next_if_eq(&'\\').is_some() {
                if let Some(escaped) = self.chars.next() {
                    ident.push(escaped);
                }
            } else {
                return ident;
            }
        }
    }

    fn parse(&mut self) -> Result<ComplexSelector, SelectorParseError> {
        // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
        // Parsed left-to-right, then reversed so the subject comes first.
        let mut compounds: Vec<CompoundSelector> = Vec::new();
        let mut combinators_between: Vec<Combinator> = Vec::new();

        loop {
            let compound = self.parse_compound()?;
            if compound.simple_selectors.is_empty() {
                return Err(self.error(if compounds.is_empty() {
                    "expected a selector"
                } else {
                    "combinator without a right-hand side"
                }));
            }
            compounds.push(compound);

            let had_space = self.chars.peek().is_some_and(char::is_ascii_whitespace);
            self.skip_whitespace();
            // [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            let combinator = match self.chars.peek().copied() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_space => {
                    combinators_between.push(Combinator::Descendant);
                    continue;
                }
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
            };
            let _ = self.chars.next();
            self.skip_whitespace();
            combinators_between.push(combinator);
        }

        let mut compounds = compounds.into_iter().rev();
        let subject = compounds
            .next()
            .ok_or_else(|| self.error("expected a selector"))?;
        let combinators = combinators_between.into_iter().rev().zip(compounds).collect();
        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorParseError> {
        let mut simple_selectors = Vec::new();
        while let Some(&c) = self.chars.peek() {
            let simple = match c {
                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                // "The class selector is given as a full stop (. U+002E)
                // immediately followed by an identifier."
                '.' => {
                    let _ = self.chars.next();
                    let name = self.take_ident();
                    if name.is_empty() {
                        return Err(self.error("empty class name"));
                    }
                    SimpleSelector::Class(name)
                }
                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                '#' => {
                    let _ = self.chars.next();
                    let name = self.take_ident();
                    if name.is_empty() {
                        return Err(self.error("empty ID"));
                    }
                    SimpleSelector::Id(name)
                }
                // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
                '*' => {
                    let _ = self.chars.next();
                    SimpleSelector::Universal
                }
                '[' => {
                    let _ = self.chars.next();
                    SimpleSelector::Attribute(self.parse_attribute()?)
                }
                ':' => {
                    let _ = self.chars.next();
                    self.parse_pseudo()?
                }
                // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
                _ if is_ident_start_char(c) || c == '-' || c == '\\' => {
                    if !simple_selectors.is_empty() {
                        return Err(self.error("type selector must come first"));
                    }
                    SimpleSelector::Type(self.take_ident().to_ascii_lowercase())
                }
                _ => break,
            };
            simple_selectors.push(simple);
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the opening `[`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorParseError> {
        self.skip_whitespace();
        let name = self.take_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error("empty attribute name"));
        }
        self.skip_whitespace();

        let operator = match self.chars.next() {
            Some(']') => return Ok(AttributeSelector::Exists(name)),
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) if self.chars.next_if_eq(&'=').is_some() => op,
            _ => return Err(self.error("malformed attribute selector")),
        };

        let value = self.parse_attr_value()?;
        self.skip_whitespace();
        // Case-sensitivity flag.
        let _ = self.chars.next_if(|&c| matches!(c, 'i' | 'I' | 's' | 'S'));
        self.skip_whitespace();
        if self.chars.next_if_eq(&']').is_none() {
            return Err(self.error("unterminated attribute selector"));
        }

        Ok(match operator {
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            '*' => AttributeSelector::SubstringMatch(name, value),
            _ => AttributeSelector::Equals(name, value),
        })
    }

    /// Parse an attribute value inside `[attr=value]`.
    /// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
    fn parse_attr_value(&mut self) -> Result<String, SelectorParseError> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            Some(q @ ('"' | '\'')) => {
                let _ = self.chars.next();
                let mut value = String::new();
                while let Some(c) = self.chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = self.chars.next() {
                                value.push(escaped);
                            }
                        }
                        _ if c == q => return Ok(value),
                        _ => value.push(c),
                    }
                }
                Err(self.error("unterminated string"))
            }
            Some(_) => {
                let mut value = self.take_ident();
                while let Some(c) = self.chars.next_if(|&c| c == '.' || c.is_ascii_digit()) {
                    value.push(c);
                    value.push_str(&self.take_ident());
                }
                if value.is_empty() {
                    Err(self.error("empty attribute value"))
                } else {
                    Ok(value)
                }
            }
            None => Err(self.error("unterminated attribute selector")),
        }
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Called after the first `:`.
    fn parse_pseudo(&mut self) -> Result<SimpleSelector, SelectorParseError> {
        let is_pseudo_element = self.chars.next_if_eq(&':').is_some();
        let name = self.take_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error("empty pseudo-class name"));
        }

        let args = if self.chars.next_if_eq(&'(').is_some() {
            Some(self.take_balanced()?)
        } else {
            None
        };

        if is_pseudo_element || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            return Ok(SimpleSelector::PseudoElement(name));
        }

        let pseudo = match (name.as_str(), args) {
            ("root", None) => PseudoClass::Root,
            ("first-child", None) => PseudoClass::FirstChild,
            ("last-child", None) => PseudoClass::LastChild,
            ("only-child", None) => PseudoClass::OnlyChild,
            ("first-of-type", None) => PseudoClass::FirstOfType,
            ("last-of-type", None) => PseudoClass::LastOfType,
            ("only-of-type", None) => PseudoClass::OnlyOfType,
            ("empty", None) => PseudoClass::Empty,
            ("link", None) => PseudoClass::Link,
            ("disabled", None) => PseudoClass::Disabled,
            ("enabled", None) => PseudoClass::Enabled,
            ("checked", None) => PseudoClass::Checked,
            ("nth-child", Some(args)) => nth_or_functional(&name, args, PseudoClass::NthChild),
            ("nth-last-child", Some(args)) => {
                nth_or_functional(&name, args, PseudoClass::NthLastChild)
            }
            ("nth-of-type", Some(args)) => nth_or_functional(&name, args, PseudoClass::NthOfType),
            ("nth-last-of-type", Some(args)) => {
                nth_or_functional(&name, args, PseudoClass::NthLastOfType)
            }
            ("not", Some(args)) => match negated_compounds(&args) {
                Some(list) => PseudoClass::Not(list),
                None => PseudoClass::Functional { name, args },
            },
            (_, Some(args)) => PseudoClass::Functional { name, args },
            // `:hover`, `:focus`, `:visited` and anything unrecognised.
            (_, None) => PseudoClass::Dynamic(name),
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    /// Collect up to the matching `)`, which is consumed.
    fn take_balanced(&mut self) -> Result<String, SelectorParseError> {
        let mut depth = 1u32;
        let mut text = String::new();
        for c in self.chars.by_ref() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text.trim().to_string());
                    }
                }
                _ => {}
            }
            text.push(c);
        }
        Err(self.error("unbalanced parentheses"))
    }
}

fn nth_or_functional(name: &str, args: String, make: fn(Nth) -> PseudoClass) -> PseudoClass {
    parse_nth(&args).map_or_else(
        || PseudoClass::Functional {
            name: name.to_string(),
            args,
        },
        make,
    )
}

/// `:not()` arguments that are all plain compound selectors.
fn negated_compounds(args: &str) -> Option<Vec<CompoundSelector>> {
    let list = parse_selector_list(args).ok()?;
    list.into_iter()
        .map(|complex| complex.combinators.is_empty().then_some(complex.subject))
        .collect()
}

/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// `odd`, `even`, `B`, `An`, `An+B` with optional signs. `of S` is not
/// accepted.
fn parse_nth(args: &str) -> Option<Nth> {
    let compact: String = args
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }
    let Some((step, offset)) = compact.split_once('n') else {
        return compact.parse().ok().map(|b| Nth { a: 0, b });
    };
    let a = match step {
        "" | "+" => 1,
        "-" => -1,
        _ => step.parse().ok()?,
    };
    let b = if offset.is_empty() {
        0
    } else {
        offset.trim_start_matches('+').parse().ok()?
    };
    Some(Nth { a, b })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_forms() {
        assert_eq!(parse_nth("odd"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(parse_nth("2n + 1"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(parse_nth("-n+3"), Some(Nth { a: -1, b: 3 }));
        assert_eq!(parse_nth("n"), Some(Nth { a: 1, b: 0 }));
        assert_eq!(parse_nth("4"), Some(Nth { a: 0, b: 4 }));
        assert_eq!(parse_nth("3n-2"), Some(Nth { a: 3, b: -2 }));
        assert_eq!(parse_nth("2n of .x"), None);
    }

    #[test]
    fn test_split_respects_nesting() {
        assert_eq!(
            split_top_level("a, :is(b, c), [x=\",\"]"),
            vec!["a", ":is(b, c)", "[x=\",\"]"]
        );
    }

    #[test]
    fn test_leading_combinator_is_rejected() {
        assert!(parse_selector("> li").is_err());
        assert!(parse_selector("ul >").is_err());
        assert!(parse_selector("").is_err());
    }
}
