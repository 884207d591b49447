//! Construction and one-time normalization of declarations.

use std::collections::BTreeMap;

use super::expand::{self, Expansion};
use super::{Declaration, DeclarationKind, MultiValued, Shorthand, SourceLocation};
use crate::error::DeclarationError;
use crate::properties::keywords::CSS_WIDE_KEYWORDS;
use crate::properties::{PropertyTables, split_vendor_prefix};
use crate::values::{DeclarationValue, canonicalize};

/// Builds normalized [`Declaration`]s against a set of [`PropertyTables`].
#[derive(Debug, Clone, Copy)]
pub struct DeclarationFactory<'t> {
    tables: &'t PropertyTables,
}

impl<'t> DeclarationFactory<'t> {
    /// A factory over `tables`.
    #[must_use]
    pub const fn new(tables: &'t PropertyTables) -> Self {
        Self { tables }
    }

    /// The tables this factory normalizes with.
    #[must_use]
    pub const fn tables(&self) -> &'t PropertyTables {
        self.tables
    }

    /// Classify `values` for `property` and synthesize every omitted slot.
    ///
    /// The result depends only on the arguments: creating the same
    /// declaration twice gives equal results.
    ///
    /// # Errors
    ///
    /// - [`DeclarationError::Empty`] when `values` is empty.
    /// - [`DeclarationError::OddArity`] for `quotes` with an odd count.
    /// - [`DeclarationError::NotImplemented`] when the property is registered
    ///   as shorthand or multi-valued without an expansion handler.
    /// - [`DeclarationError::InvalidValue`] when the values do not fit the
    ///   property.
    pub fn create(
        &self,
        property: &str,
        values: Vec<DeclarationValue>,
        important: bool,
        location: SourceLocation,
    ) -> Result<Declaration, DeclarationError> {
        let property = property.trim().to_ascii_lowercase();
        if values.is_empty() {
            return Err(DeclarationError::Empty { property });
        }
        let (prefix, base) = split_vendor_prefix(&property);
        let values: Vec<DeclarationValue> = values.into_iter().map(canonicalize).collect();

        let family = self.tables.family(base)?;
        let claimed = self.tables.is_shorthand(base) || self.tables.is_multi_valued(base);
        let expanded = match family {
            Some(_) if claimed && is_wide_keyword(&values) => {
                expand::fill_all(self.tables, base, &values[0])
            }
            Some(family) => {
                let ctx = Expansion {
                    tables: self.tables,
                    property: base,
                };
                expand::expand(family, &ctx, values)?
            }
            None => expand::token_list(base, values),
        };

        let kind = self.assemble(prefix, base, expanded, important, location);
        Ok(Declaration {
            property,
            important,
            selector: None,
            location,
            is_virtual: false,
            kind,
        })
    }

    /// Shape already-assigned values into the right kind of declaration,
    /// splitting shorthands into their individuals.
    fn assemble(
        &self,
        prefix: &str,
        base: &str,
        values: Vec<DeclarationValue>,
        important: bool,
        location: SourceLocation,
    ) -> DeclarationKind {
        let unordered = |slot: &str| self.tables.is_unordered_slot(slot);
        if self.tables.is_shorthand(base) {
            let individuals = self.individuals(prefix, base, &values, important, location);
            DeclarationKind::Shorthand(Shorthand {
                multi: MultiValued::from_values(values, unordered),
                individuals,
            })
        } else if self.tables.is_multi_valued(base) || values.len() != 1 {
            DeclarationKind::MultiValued(MultiValued::from_values(values, unordered))
        } else {
            let mut values = values;
            match values.pop() {
                Some(value) => DeclarationKind::Single(value),
                None => DeclarationKind::MultiValued(MultiValued::from_values(values, unordered)),
            }
        }
    }

    /// Partition a shorthand's assigned values among its children.
    fn individuals(
        &self,
        prefix: &str,
        base: &str,
        values: &[DeclarationValue],
        important: bool,
        location: SourceLocation,
    ) -> BTreeMap<String, Declaration> {
        let mut individuals = BTreeMap::new();
        for child in self.tables.children(base).unwrap_or_default() {
            let leaves = self.tables.slot_properties(child);
            let owned: Vec<DeclarationValue> = values
                .iter()
                .filter(|v| {
                    v.assignment()
                        .is_some_and(|slot| leaves.contains(&slot.property))
                })
                .cloned()
                .collect();
            if owned.is_empty() {
                continue;
            }
            let property = format!("{prefix}{child}");
            let kind = self.assemble(prefix, child, owned, important, location);
            let _ = individuals.insert(
                property.clone(),
                Declaration {
                    property,
                    important,
                    selector: None,
                    location,
                    is_virtual: false,
                    kind,
                },
            );
        }
        individuals
    }
}

impl DeclarationFactory<'static> {
    /// A factory over [`PropertyTables::standard`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(PropertyTables::standard())
    }
}

impl Default for DeclarationFactory<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_wide_keyword(values: &[DeclarationValue]) -> bool {
    matches!(values, [only] if only.is_ident_in(CSS_WIDE_KEYWORDS))
}
