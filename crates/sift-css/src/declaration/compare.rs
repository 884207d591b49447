//! Canonical comparison keys.
//!
//! Both predicates on [`Declaration`] are key equality, so each is an
//! equivalence relation and declarations can be grouped by hashing.

use std::fmt;

use serde::Serialize;

use super::{Declaration, SlotValues};
use crate::properties::strip_vendor_prefix;
use crate::values::{DeclarationValue, PropertyAndLayer, ValueType};

/// One value as seen by a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValueKey {
    /// The comparable literal or the canonical form.
    pub text: String,
    /// The token type, present for literal comparison only.
    pub value_type: Option<ValueType>,
    /// Whether the value was synthesized; always false for equivalence.
    pub missing: bool,
}

/// A declaration reduced to what a comparison looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclarationKey {
    /// Property name, vendor prefix removed when requested.
    pub property: String,
    /// `!important`.
    pub important: bool,
    /// Every slot with its values; unordered slots are sorted.
    pub slots: Vec<(PropertyAndLayer, Vec<ValueKey>)>,
}

impl DeclarationKey {
    fn build(
        declaration: &Declaration,
        strip_prefix: bool,
        value_key: impl Fn(&DeclarationValue) -> ValueKey,
    ) -> Self {
        let property = if strip_prefix {
            strip_vendor_prefix(declaration.property()).to_string()
        } else {
            declaration.property().to_string()
        };
        let slots = declaration
            .slots()
            .iter()
            .map(|(slot, values)| {
                let mut keys: Vec<ValueKey> = values.values().iter().map(&value_key).collect();
                if matches!(values, SlotValues::Unordered(_)) {
                    keys.sort();
                }
                (slot.clone(), keys)
            })
            .collect();
        Self {
            property,
            important: declaration.is_important(),
            slots,
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.property)?;
        if self.important {
            f.write_str("!")?;
        }
        f.write_str("{")?;
        for (index, (slot, values)) in self.slots.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            write!(f, "{slot}=")?;
            let texts: Vec<&str> = values.iter().map(|v| v.text.as_str()).collect();
            f.write_str(&texts.join(" "))?;
        }
        f.write_str("}")
    }
}

impl Declaration {
    /// The key literal equality compares.
    ///
    /// With `strip_prefix`, `-webkit-transition` and `transition` share a key
    /// when their values agree.
    #[must_use]
    pub fn equality_key(&self, strip_prefix: bool) -> DeclarationKey {
        DeclarationKey::build(self, strip_prefix, |value| ValueKey {
            text: value.comparable_literal(),
            value_type: Some(value.value_type()),
            missing: value.is_missing(),
        })
    }

    /// The key equivalence compares: canonical forms only.
    #[must_use]
    pub fn equivalence_key(&self, strip_prefix: bool) -> DeclarationKey {
        DeclarationKey::build(self, strip_prefix, |value| ValueKey {
            text: value.canonical(),
            value_type: None,
            missing: false,
        })
    }
}
