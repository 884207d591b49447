//! Box edges, border triples and border radii.

use super::{Expansion, assigned, expand_sides, is_structural};
use crate::error::DeclarationError;
use crate::properties::keywords::{BORDER_STYLE_KEYWORDS, BORDER_WIDTH_KEYWORDS};
use crate::values::{DeclarationValue, ValueType};

/// [CSS Box § 6.1 'margin'](https://www.w3.org/TR/css-box-4/#margin-shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom margins are set to the first value and
/// the right and left margins are set to the second. If there are three
/// values, the top is set to the first value, the left and right are set to
/// the second, and the bottom is set to the third."
pub(super) fn box_edges(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    if values.iter().any(is_structural) {
        return Err(ctx.invalid("unexpected separator"));
    }
    let edges: Vec<&str> = ctx.children()?.iter().map(String::as_str).collect();
    expand_sides(ctx, &values, &edges)
}

/// [CSS Backgrounds § 4.4 'border'](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
///
/// Width, style and color may appear in any order; each omitted one takes
/// its initial value.
pub(super) fn border_triple(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut parts: [Option<DeclarationValue>; 3] = [None, None, None];
    for value in values {
        let index = if value.value_type() == ValueType::Color {
            2
        } else if value.is_ident_in(BORDER_WIDTH_KEYWORDS) || value.is_length_like() {
            0
        } else if value.is_ident_in(BORDER_STYLE_KEYWORDS) {
            1
        } else {
            return Err(ctx.invalid(format!("unexpected '{value}'")));
        };
        if parts[index].is_some() {
            return Err(ctx.invalid(format!("'{value}' repeats a component")));
        }
        parts[index] = Some(value);
    }

    let mut out = Vec::new();
    for (index, part) in parts.into_iter().enumerate() {
        let leaves = ctx.tables.slot_properties(ctx.child(index)?);
        match part {
            Some(value) => {
                for (position, leaf) in leaves.iter().enumerate() {
                    let copy = if position == 0 {
                        value.clone()
                    } else {
                        value.clone_as_missing()
                    };
                    out.push(assigned(copy, leaf, 1));
                }
            }
            None => {
                for leaf in &leaves {
                    out.push(ctx.initial(leaf, 1)?);
                }
            }
        }
    }
    Ok(out)
}

/// [CSS Backgrounds § 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// "If values are given before and after the slash, then the values before
/// the slash set the horizontal radius and the values after the slash set
/// the vertical radius. If there is no slash, then the values set both radii
/// equally."
pub(super) fn border_radius(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut halves: Vec<Vec<DeclarationValue>> = vec![Vec::new()];
    let mut slash = None;
    for value in values {
        if value.value_type() == ValueType::Operator {
            if slash.is_some() {
                return Err(ctx.invalid("more than one '/'"));
            }
            slash = Some(value);
            halves.push(Vec::new());
        } else if value.value_type() == ValueType::Separator {
            return Err(ctx.invalid("unexpected ','"));
        } else if let Some(half) = halves.last_mut() {
            half.push(value);
        }
    }

    let corners = ctx.children()?;
    let mut horizontal_slots = Vec::with_capacity(4);
    let mut vertical_slots = Vec::with_capacity(4);
    for corner in corners {
        horizontal_slots.push(ctx.axis(corner, 0)?);
        vertical_slots.push(ctx.axis(corner, 1)?);
    }

    let mut halves = halves.into_iter();
    let horizontal = halves.next().unwrap_or_default();
    let mut out = expand_sides(ctx, &horizontal, &horizontal_slots)?;
    let vertical = match (slash, halves.next()) {
        (Some(slash), Some(vertical)) => {
            let expanded = expand_sides(ctx, &vertical, &vertical_slots)?;
            out.push(slash);
            expanded
        }
        _ => out
            .iter()
            .zip(&vertical_slots)
            .map(|(value, slot)| assigned(value.clone_as_missing(), slot, 1))
            .collect(),
    };
    out.extend(vertical);
    Ok(out)
}
