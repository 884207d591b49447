//! CSS selectors per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! Selectors are compared structurally (the simple selectors of a compound
//! form a set) and can be translated to XPath 1.0 so that two selectors can
//! be compared by the elements they select in a concrete document.

mod parse;
mod xpath;

pub use parse::{SelectorParseError, parse_selector, parse_selector_list};
pub use xpath::UnsupportedSelectorError;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Stored lower-case.
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.btn`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Examples: `::before`, `:after` (legacy single-colon form), lower-case.
    PseudoElement(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
}

/// The `An+B` argument of `:nth-child()` and friends.
///
/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nth {
    /// The step `A`.
    pub a: i32,
    /// The offset `B`.
    pub b: i32,
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    Root,
    /// [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,
    /// [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,
    /// [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 4.11 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children
    /// except, optionally, document white space characters."
    Empty,
    /// [§ 4.6 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
    Link,
    /// `:disabled`
    Disabled,
    /// `:enabled`
    Enabled,
    /// `:checked`
    Checked,
    /// `:nth-child(An+B)`
    NthChild(Nth),
    /// `:nth-last-child(An+B)`
    NthLastChild(Nth),
    /// `:nth-of-type(An+B)`
    NthOfType(Nth),
    /// `:nth-last-of-type(An+B)`
    NthLastOfType(Nth),
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation) over a
    /// list of compound selectors.
    Not(Vec<CompoundSelector>),
    /// A pseudo-class that depends on user interaction or state outside the
    /// document, e.g. `:hover`, `:focus`, `:visited`. Lower-case name.
    Dynamic(String),
    /// Any other functional pseudo-class, kept with its raw argument text.
    Functional {
        /// Lower-case name.
        name: String,
        /// Argument text, trimmed.
        args: String,
    },
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeSelector {
    /// `[attr]`
    Exists(String),
    /// `[attr=value]`
    Equals(String, String),
    /// `[attr~=value]`
    Includes(String, String),
    /// `[attr|=value]`
    DashMatch(String, String),
    /// `[attr^=value]`
    PrefixMatch(String, String),
    /// `[attr$=value]`
    SuffixMatch(String, String),
    /// `[attr*=value]`
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundSelector {
    /// The simple selectors in the order written.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// The simple selectors as a sorted set, so that `.a.b` and `.b.a`
    /// compare equal.
    #[must_use]
    pub fn as_set(&self) -> Vec<SimpleSelector> {
        let mut set = self.simple_selectors.clone();
        set.sort();
        set.dedup();
        // A lone `*` is implied by every other compound.
        if set.len() > 1 {
            set.retain(|s| *s != SimpleSelector::Universal);
        }
        set
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// `A B`
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// `A > B`
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// `A + B`
    NextSibling,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// `A ~ B`
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div.container > ul.nav li` is stored as
/// ```text
/// subject: [li]
/// combinators: [(Descendant, [ul.nav]), (Child, [div.container])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// The structural identity of a [`ComplexSelector`].
pub type SelectorKey = Vec<(Option<Combinator>, Vec<SimpleSelector>)>;

impl ComplexSelector {
    /// Compounds from left to right, each with the combinator that joins it
    /// to the compound on its left (`None` for the leftmost).
    #[must_use]
    pub fn left_to_right(&self) -> Vec<(Option<Combinator>, &CompoundSelector)> {
        let mut chain: Vec<(Option<Combinator>, &CompoundSelector)> = Vec::new();
        let mut pending = None;
        for (combinator, compound) in self.combinators.iter().rev() {
            chain.push((pending, compound));
            pending = Some(*combinator);
        }
        chain.push((pending, &self.subject));
        chain
    }

    /// The key structural equality compares: compounds as sets, in order,
    /// with their combinators.
    #[must_use]
    pub fn structural_key(&self) -> SelectorKey {
        self.left_to_right()
            .into_iter()
            .map(|(combinator, compound)| (combinator, compound.as_set()))
            .collect()
    }

    /// Structural equality, insensitive to the order of simple selectors
    /// within a compound.
    #[must_use]
    pub fn selector_equals(&self, other: &Self) -> bool {
        self.structural_key() == other.structural_key()
    }

    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Calculate specificity for the entire complex selector by summing
    /// specificity of all compound selectors in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        self.left_to_right()
            .into_iter()
            .map(|(_, compound)| compound_specificity(compound))
            .fold(Specificity::default(), |acc, s| {
                Specificity(acc.0 + s.0, acc.1 + s.1, acc.2 + s.2)
            })
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            SimpleSelector::Id(_) => spec.0 += 1,
            // "The specificity of a :not() pseudo-class is replaced by the
            // specificity of the most specific complex selector in its
            // selector list argument."
            SimpleSelector::PseudoClass(PseudoClass::Not(list)) => {
                if let Some(max) = list.iter().map(compound_specificity).max() {
                    spec = Specificity(spec.0 + max.0, spec.1 + max.1, spec.2 + max.2);
                }
            }
            SimpleSelector::Class(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::Attribute(_) => spec.1 += 1,
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.2 += 1,
            // "ignore the universal selector"
            SimpleSelector::Universal => {}
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specificity_counts_each_kind() {
        let selector = parse_selector("#nav ul.menu > li:first-child::before").unwrap_or_else(|e| {
            panic!("{e}");
        });
        assert_eq!(selector.calculate_specificity(), Specificity(1, 2, 3));
    }

    #[test]
    fn test_left_to_right_order() {
        let selector = parse_selector("a > b c").unwrap_or_else(|e| panic!("{e}"));
        let chain: Vec<Option<Combinator>> =
            selector.left_to_right().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            chain,
            vec![None, Some(Combinator::Child), Some(Combinator::Descendant)]
        );
    }
}
