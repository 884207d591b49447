//! Translation of selectors to XPath 1.0 location paths.
//!
//! The result selects, from the document root, the elements the selector
//! matches. Predicates are written so that they do not depend on the axis
//! of the step they are attached to.

use thiserror::Error;

use super::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass,
    SimpleSelector,
};

/// A selector feature with no static XPath counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selector feature '{feature}' has no XPath equivalent")]
pub struct UnsupportedSelectorError {
    /// The feature as written, e.g. `:hover` or `::before`.
    pub feature: String,
}

fn unsupported(feature: impl Into<String>) -> UnsupportedSelectorError {
    UnsupportedSelectorError {
        feature: feature.into(),
    }
}

impl ComplexSelector {
    /// An XPath expression selecting the same elements.
    ///
    /// `ul.menu > li` becomes
    /// `//ul[contains(concat(' ', normalize-space(@class), ' '), ' menu ')]/li`.
    ///
    /// # Errors
    ///
    /// [`UnsupportedSelectorError`] for dynamic pseudo-classes,
    /// pseudo-elements, unknown functional pseudo-classes, and
    /// `*:first-of-type`-style pseudo-classes without a type.
    pub fn to_xpath(&self) -> Result<String, UnsupportedSelectorError> {
        let mut path = String::new();
        for (combinator, compound) in self.left_to_right() {
            let (name, predicates) = step_parts(compound)?;
            match combinator {
                None | Some(Combinator::Descendant) => {
                    path.push_str("//");
                    path.push_str(&name);
                }
                Some(Combinator::Child) => {
                    path.push('/');
                    path.push_str(&name);
                }
                Some(Combinator::NextSibling) => {
                    path.push_str("/following-sibling::*[1]");
                    if name != "*" {
                        path.push_str(&format!("[self::{name}]"));
                    }
                }
                Some(Combinator::SubsequentSibling) => {
                    path.push_str("/following-sibling::");
                    path.push_str(&name);
                }
            }
            path.push_str(&predicates);
        }
        Ok(path)
    }
}

/// The node test and predicates of one compound.
fn step_parts(compound: &CompoundSelector) -> Result<(String, String), UnsupportedSelectorError> {
    let name = compound
        .simple_selectors
        .iter()
        .find_map(|s| match s {
            SimpleSelector::Type(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "*".to_string());
    let mut predicates = String::new();
    for simple in &compound.simple_selectors {
        if let Some(predicate) = predicate(simple, &name)? {
            predicates.push('[');
            predicates.push_str(&predicate);
            predicates.push(']');
        }
    }
    Ok((name, predicates))
}

fn predicate(simple: &SimpleSelector, name: &str) -> Result<Option<String>, UnsupportedSelectorError> {
    Ok(Some(match simple {
        SimpleSelector::Type(_) | SimpleSelector::Universal => return Ok(None),
        SimpleSelector::Class(class) => token_contains("@class", class)?,
        SimpleSelector::Id(id) => format!("@id = {}", literal(id)?),
        SimpleSelector::Attribute(attribute) => attribute_predicate(attribute)?,
        SimpleSelector::PseudoElement(element) => return Err(unsupported(format!("::{element}"))),
        SimpleSelector::PseudoClass(pseudo) => pseudo_predicate(pseudo, name)?,
    }))
}

/// `value` as one of the whitespace-separated tokens of `attribute`.
fn token_contains(attribute: &str, value: &str) -> Result<String, UnsupportedSelectorError> {
    Ok(format!(
        "contains(concat(' ', normalize-space({attribute}), ' '), {})",
        literal(&format!(" {value} "))?
    ))
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// "If the value is the empty string then the selector does not represent
/// anything" for `~=`, `^=`, `$=` and `*=`.
fn attribute_predicate(attribute: &AttributeSelector) -> Result<String, UnsupportedSelectorError> {
    Ok(match attribute {
        AttributeSelector::Exists(name) => format!("@{name}"),
        AttributeSelector::Equals(name, value) => format!("@{name} = {}", literal(value)?),
        AttributeSelector::Includes(_, value)
        | AttributeSelector::PrefixMatch(_, value)
        | AttributeSelector::SuffixMatch(_, value)
        | AttributeSelector::SubstringMatch(_, value)
            if value.is_empty() =>
        {
            "false()".to_string()
        }
        AttributeSelector::Includes(name, value) => token_contains(&format!("@{name}"), value)?,
        AttributeSelector::DashMatch(name, value) => format!(
            "@{name} = {} or starts-with(@{name}, {})",
            literal(value)?,
            literal(&format!("{value}-"))?
        ),
        AttributeSelector::PrefixMatch(name, value) => {
            format!("starts-with(@{name}, {})", literal(value)?)
        }
        AttributeSelector::SuffixMatch(name, value) => {
            let value = literal(value)?;
            format!(
                "substring(@{name}, string-length(@{name}) - string-length({value}) + 1) = {value}"
            )
        }
        AttributeSelector::SubstringMatch(name, value) => {
            format!("contains(@{name}, {})", literal(value)?)
        }
    })
}

fn pseudo_predicate(pseudo: &PseudoClass, name: &str) -> Result<String, UnsupportedSelectorError> {
    let typed = |feature: &str| {
        if name == "*" {
            Err(unsupported(format!(":{feature} without a type selector")))
        } else {
            Ok(name)
        }
    };
    Ok(match pseudo {
        PseudoClass::Root => "not(parent::*)".to_string(),
        PseudoClass::FirstChild => "not(preceding-sibling::*)".to_string(),
        PseudoClass::LastChild => "not(following-sibling::*)".to_string(),
        PseudoClass::OnlyChild => {
            "not(preceding-sibling::*) and not(following-sibling::*)".to_string()
        }
        PseudoClass::FirstOfType => format!("not(preceding-sibling::{})", typed("first-of-type")?),
        PseudoClass::LastOfType => format!("not(following-sibling::{})", typed("last-of-type")?),
        PseudoClass::OnlyOfType => {
            let name = typed("only-of-type")?;
            format!("not(preceding-sibling::{name}) and not(following-sibling::{name})")
        }
        PseudoClass::Empty => "not(*) and not(text())".to_string(),
        PseudoClass::Link => "@href".to_string(),
        PseudoClass::Disabled => "@disabled".to_string(),
        PseudoClass::Enabled => "not(@disabled)".to_string(),
        PseudoClass::Checked => "@checked".to_string(),
        PseudoClass::NthChild(nth) => nth_predicate("count(preceding-sibling::*) + 1", *nth),
        PseudoClass::NthLastChild(nth) => nth_predicate("count(following-sibling::*) + 1", *nth),
        PseudoClass::NthOfType(nth) => nth_predicate(
            &format!("count(preceding-sibling::{}) + 1", typed("nth-of-type")?),
            *nth,
        ),
        PseudoClass::NthLastOfType(nth) => nth_predicate(
            &format!("count(following-sibling::{}) + 1", typed("nth-last-of-type")?),
            *nth,
        ),
        PseudoClass::Not(compounds) => {
            let mut negations = Vec::with_capacity(compounds.len());
            for compound in compounds {
                let (name, predicates) = step_parts(compound)?;
                negations.push(format!("not(self::{name}{predicates})"));
            }
            negations.join(" and ")
        }
        PseudoClass::Dynamic(name) => return Err(unsupported(format!(":{name}"))),
        PseudoClass::Functional { name, args } => {
            return Err(unsupported(format!(":{name}({args})")));
        }
    })
}

/// The element's 1-based `index` satisfies `index = a*n + b` for some
/// `n >= 0`.
fn nth_predicate(index: &str, Nth { a, b }: Nth) -> String {
    match a {
        0 => format!("{index} = {b}"),
        a if a > 0 => format!("{index} >= {b} and ({index} - {b}) mod {a} = 0"),
        a => format!("{index} <= {b} and ({b} - ({index})) mod {} = 0", -a),
    }
}

/// An XPath string literal.
fn literal(value: &str) -> Result<String, UnsupportedSelectorError> {
    if !value.contains('\'') {
        Ok(format!("'{value}'"))
    } else if !value.contains('"') {
        Ok(format!("\"{value}\""))
    } else {
        Err(unsupported(format!("value {value} with both quote kinds")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse_selector;

    fn xpath(selector: &str) -> String {
        parse_selector(selector)
            .unwrap_or_else(|e| panic!("{e}"))
            .to_xpath()
            .unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_nth_predicate_with_negative_step() {
        assert_eq!(
            nth_predicate("i", Nth { a: -1, b: 3 }),
            "i <= 3 and (3 - (i)) mod 1 = 0"
        );
    }

    #[test]
    fn test_next_sibling_with_type() {
        assert_eq!(xpath("h1 + p"), "//h1/following-sibling::*[1][self::p]");
    }

    #[test]
    fn test_id_and_attribute() {
        assert_eq!(xpath("#main[lang|=en]"), "//*[@id = 'main'][@lang = 'en' or starts-with(@lang, 'en-')]");
    }
}
