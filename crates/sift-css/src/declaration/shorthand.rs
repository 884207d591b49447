//! Virtual shorthands composed from individual declarations.

use std::collections::BTreeMap;

use super::Declaration;
use crate::properties::{PropertyTables, split_vendor_prefix, strip_vendor_prefix};

/// Compose a virtual `property` shorthand from `declarations`, the
/// declarations of one rule in source order.
///
/// Each child of the shorthand is taken from the last declaration of that
/// property, or composed recursively when the child is itself a shorthand
/// written as longhands. Returns `None` when no child is present.
#[must_use]
pub fn compose_virtual(
    tables: &PropertyTables,
    property: &str,
    declarations: &[&Declaration],
) -> Option<Declaration> {
    let (prefix, base) = split_vendor_prefix(property);
    let children = tables.children(base)?;
    let mut individuals = BTreeMap::new();
    let mut location = None;
    for child in children {
        let name = format!("{prefix}{child}");
        let found = declarations
            .iter()
            .rev()
            .find(|d| d.property() == name)
            .map(|d| (*d).clone())
            .or_else(|| compose_virtual(tables, &name, declarations));
        if let Some(declaration) = found {
            let _ = location.get_or_insert(declaration.location());
            let _ = individuals.insert(name, declaration);
        }
    }
    if individuals.is_empty() {
        return None;
    }
    Some(Declaration::virtual_shorthand(
        property,
        individuals,
        location.unwrap_or_default(),
    ))
}

/// Whether two shorthands decompose into the same individual properties
/// with pairwise equal or equivalent declarations.
///
/// With `strip_prefix`, individuals are paired by unprefixed name, so
/// `-webkit-transition-duration` meets `transition-duration`.
#[must_use]
pub fn individuals_match(a: &Declaration, b: &Declaration, strip_prefix: bool) -> bool {
    let (Some(left), Some(right)) = (a.individuals(), b.individuals()) else {
        return false;
    };
    fn by_name(
        individuals: &BTreeMap<String, Declaration>,
        strip_prefix: bool,
    ) -> BTreeMap<String, &Declaration> {
        individuals
            .iter()
            .map(|(name, declaration)| {
                let name = if strip_prefix {
                    strip_vendor_prefix(name)
                } else {
                    name.as_str()
                };
                (name.to_string(), declaration)
            })
            .collect()
    }
    let (left, right) = (by_name(left, strip_prefix), by_name(right, strip_prefix));
    left.len() == right.len()
        && left.iter().all(|(name, x)| {
            right.get(name).is_some_and(|y| {
                x.equality_key(strip_prefix) == y.equality_key(strip_prefix)
                    || x.equivalence_key(strip_prefix) == y.equivalence_key(strip_prefix)
            })
        })
}
