//! Expansion of multi-valued and shorthand properties into slots.
//!
//! Each handler receives the authored values of one declaration and returns
//! the full value sequence: authored values assigned to their slot, plus
//! synthesized values (flagged missing) for every slot the author left out.
//! Separators and `/` stay in the sequence unassigned.

mod boxes;
mod fonts;
mod layered;
mod pairs;
mod position;

use crate::error::DeclarationError;
use crate::properties::keywords::FONT_WEIGHT_KEYWORDS;
use crate::properties::{PropertyFamily, PropertyTables};
use crate::values::{DeclarationValue, PropertyAndLayer, ValueType};

/// What a handler needs to know about the declaration it expands.
pub(super) struct Expansion<'a> {
    pub(super) tables: &'a PropertyTables,
    /// The unprefixed property name.
    pub(super) property: &'a str,
}

impl Expansion<'_> {
    fn invalid(&self, reason: impl Into<String>) -> DeclarationError {
        DeclarationError::invalid(self.property, reason)
    }

    fn not_implemented(&self, property: &str) -> DeclarationError {
        DeclarationError::NotImplemented {
            property: property.to_string(),
        }
    }

    /// The initial value of `slot`, assigned to `layer`.
    fn initial(&self, slot: &str, layer: u32) -> Result<DeclarationValue, DeclarationError> {
        let value = self
            .tables
            .initial(slot)
            .ok_or_else(|| self.not_implemented(slot))?;
        Ok(assigned(keyword_canonical(slot, value), slot, layer))
    }

    fn children(&self) -> Result<&[String], DeclarationError> {
        self.tables
            .children(self.property)
            .ok_or_else(|| self.not_implemented(self.property))
    }

    fn axes(&self, property: &str) -> Result<&[String], DeclarationError> {
        self.tables
            .axis_slots(property)
            .ok_or_else(|| self.not_implemented(property))
    }

    fn axis(&self, property: &str, index: usize) -> Result<&str, DeclarationError> {
        self.axes(property)?
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.not_implemented(property))
    }

    /// The child at `index`, which the tables guarantee for each family.
    fn child(&self, index: usize) -> Result<&str, DeclarationError> {
        self.children()?
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.not_implemented(self.property))
    }
}

/// Expand `values` of `property` with the handler for `family`.
pub(super) fn expand(
    family: PropertyFamily,
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    match family {
        PropertyFamily::Position => position::position(ctx, values),
        PropertyFamily::TransformOrigin => position::transform_origin(ctx, values),
        PropertyFamily::LengthPair => pairs::length_pair(ctx, values),
        PropertyFamily::BoxEdges => boxes::box_edges(ctx, values),
        PropertyFamily::BorderTriple => boxes::border_triple(ctx, values),
        PropertyFamily::BorderRadius => boxes::border_radius(ctx, values),
        PropertyFamily::Shadow => layered::shadow(ctx, values),
        PropertyFamily::Transition => layered::transition(ctx, values),
        PropertyFamily::Background => layered::background(ctx, values),
        PropertyFamily::LayeredList => Ok(layered::layered_list(ctx, values)),
        PropertyFamily::ListStyle => fonts::list_style(ctx, values),
        PropertyFamily::Font => fonts::font(ctx, values),
        PropertyFamily::FontFamily => fonts::font_family(ctx, values),
        PropertyFamily::Quotes => fonts::quotes(ctx, values),
        PropertyFamily::Flex => pairs::flex(ctx, values),
        PropertyFamily::FlexFlow => pairs::flex_flow(ctx, values),
        PropertyFamily::Columns => pairs::columns(ctx, values),
        PropertyFamily::PairShorthand => pairs::pair_shorthand(ctx, values),
        PropertyFamily::OrderedList | PropertyFamily::UnorderedList => {
            Ok(token_list(ctx.property, values))
        }
    }
}

/// Every non-structural value goes into the property's own slot.
pub(super) fn token_list(property: &str, values: Vec<DeclarationValue>) -> Vec<DeclarationValue> {
    values
        .into_iter()
        .map(|value| {
            if is_structural(&value) {
                value
            } else {
                let value = keyword_canonical(property, value);
                assigned(value, property, 1)
            }
        })
        .collect()
}

/// One keyword that stands for the whole declaration (`inherit`, a system
/// font, `none` for shadows) is cloned into every slot; only the first
/// copy counts as authored.
pub(super) fn fill_all(
    tables: &PropertyTables,
    property: &str,
    value: &DeclarationValue,
) -> Vec<DeclarationValue> {
    tables
        .slot_properties(property)
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let copy = if index == 0 {
                value.clone()
            } else {
                value.clone_as_missing()
            };
            assigned(copy, slot, 1)
        })
        .collect()
}

/// Canonical spellings that depend on the property a keyword is used in.
pub(super) fn keyword_canonical(property: &str, value: DeclarationValue) -> DeclarationValue {
    if property == "font-weight" && value.value_type() == ValueType::Ident {
        let lower = value.literal().to_ascii_lowercase();
        if let Some((_, number)) = FONT_WEIGHT_KEYWORDS.iter().find(|(k, _)| *k == lower) {
            return value.with_canonical(*number);
        }
    }
    value
}

pub(super) fn assigned(mut value: DeclarationValue, slot: &str, layer: u32) -> DeclarationValue {
    value.assign(PropertyAndLayer::new(slot, layer));
    value
}

/// `,` and `/` structure a value list and are never assigned.
pub(super) fn is_structural(value: &DeclarationValue) -> bool {
    matches!(
        value.value_type(),
        ValueType::Separator | ValueType::Operator
    )
}

/// The lower-cased name of a function value, e.g. `cubic-bezier`.
fn function_name(value: &DeclarationValue) -> Option<String> {
    if value.value_type() != ValueType::Function {
        return None;
    }
    value
        .literal()
        .split_once('(')
        .map(|(name, _)| name.trim().to_ascii_lowercase())
}

pub(super) fn is_function_in(value: &DeclarationValue, table: &[&str]) -> bool {
    function_name(value).is_some_and(|name| table.contains(&name.as_str()))
}

/// One comma-separated layer and the comma that closed it.
pub(super) struct Layer {
    pub(super) tokens: Vec<DeclarationValue>,
    pub(super) separator: Option<DeclarationValue>,
}

/// Split at top-level commas. Always yields at least one layer.
pub(super) fn split_layers(values: Vec<DeclarationValue>) -> Vec<Layer> {
    let mut layers = Vec::new();
    let mut tokens = Vec::new();
    for value in values {
        if value.value_type() == ValueType::Separator {
            layers.push(Layer {
                tokens: std::mem::take(&mut tokens),
                separator: Some(value),
            });
        } else {
            tokens.push(value);
        }
    }
    layers.push(Layer {
        tokens,
        separator: None,
    });
    layers
}

/// 1-based layer number of the `index`-th layer.
pub(super) fn layer_number(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1))
}

/// Which authored value fills side `side` (0..4, clockwise from top) in the
/// CSS 1-to-4 value expansion, or `None` if `count` is out of range.
pub(super) const fn trbl_source(count: usize, side: usize) -> Option<usize> {
    match count {
        1 => Some(0),
        2 => Some(side % 2),
        3 => Some(if side == 3 { 1 } else { side }),
        4 => Some(side),
        _ => None,
    }
}

/// Expand 1-4 values over four slots. Repeated values are flagged missing.
pub(super) fn expand_sides(
    ctx: &Expansion<'_>,
    values: &[DeclarationValue],
    slots: &[&str],
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut used = vec![false; values.len()];
    let mut out = Vec::with_capacity(4);
    for (side, slot) in slots.iter().enumerate() {
        let source = trbl_source(values.len(), side)
            .ok_or_else(|| ctx.invalid(format!("expected 1 to 4 values, got {}", values.len())))?;
        let value = if used[source] {
            values[source].clone_as_missing()
        } else {
            used[source] = true;
            values[source].clone()
        };
        out.push(assigned(value, slot, 1));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trbl_sources() {
        let sources = |n| (0..4).map(|s| trbl_source(n, s).unwrap_or(99)).collect::<Vec<_>>();
        assert_eq!(sources(1), vec![0, 0, 0, 0]);
        assert_eq!(sources(2), vec![0, 1, 0, 1]);
        assert_eq!(sources(3), vec![0, 1, 2, 1]);
        assert_eq!(sources(4), vec![0, 1, 2, 3]);
        assert_eq!(trbl_source(5, 0), None);
    }

    #[test]
    fn test_split_layers_keeps_separators() {
        let values = vec![
            DeclarationValue::new("a", ValueType::Ident),
            DeclarationValue::new(",", ValueType::Separator),
            DeclarationValue::new("b", ValueType::Ident),
        ];
        let layers = split_layers(values);
        assert_eq!(layers.len(), 2);
        assert!(layers[0].separator.is_some());
        assert_eq!(layers[1].tokens[0].literal(), "b");
    }
}
