//! Two-slot properties and the small flexbox and multi-column shorthands.

use super::{Expansion, assigned, is_structural};
use crate::error::DeclarationError;
use crate::properties::keywords::{FLEX_DIRECTION_KEYWORDS, FLEX_WRAP_KEYWORDS};
use crate::values::{DeclarationValue, ValueType};

/// One or two values where the second defaults to a copy of the first.
fn pair(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
    first: &str,
    second: &str,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    if values.iter().any(is_structural) {
        return Err(ctx.invalid("unexpected separator"));
    }
    let mut values = values.into_iter();
    match (values.next(), values.next(), values.next()) {
        (Some(a), None, None) => {
            let copy = a.clone_as_missing();
            Ok(vec![assigned(a, first, 1), assigned(copy, second, 1)])
        }
        (Some(a), Some(b), None) => Ok(vec![assigned(a, first, 1), assigned(b, second, 1)]),
        _ => Err(ctx.invalid("expected one or two values")),
    }
}

/// `border-spacing` and `border-*-radius`: horizontal then vertical.
pub(super) fn length_pair(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    pair(ctx, values, ctx.axis(ctx.property, 0)?, ctx.axis(ctx.property, 1)?)
}

/// `overflow`, `gap`, `place-items`, `place-content`.
pub(super) fn pair_shorthand(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    pair(ctx, values, ctx.child(0)?, ctx.child(1)?)
}

/// [CSS Flexbox § 7.1.1 Basic Values of 'flex'](https://www.w3.org/TR/css-flexbox-1/#flex-common)
///
/// "When omitted from the flex shorthand, its specified value is 1."
/// "When omitted from the flex shorthand, its specified value is 0."
/// `none` is `0 0 auto` and `auto` is `1 1 auto`.
pub(super) fn flex(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let grow_slot = ctx.child(0)?;
    let shrink_slot = ctx.child(1)?;
    let basis_slot = ctx.child(2)?;
    let synthesized = |literal: &str, value_type: ValueType, slot: &str| {
        assigned(DeclarationValue::synthesized(literal, value_type), slot, 1)
    };

    if let [only] = values.as_slice() {
        let expansion = if only.is_ident("none") {
            Some("0")
        } else if only.is_ident("auto") {
            Some("1")
        } else {
            None
        };
        if let Some(number) = expansion {
            return Ok(vec![
                assigned(only.clone().with_canonical(number), grow_slot, 1),
                synthesized(number, ValueType::Integer, shrink_slot),
                synthesized("auto", ValueType::Ident, basis_slot),
            ]);
        }
    }

    let mut grow = None;
    let mut shrink = None;
    let mut basis = None;
    for value in values {
        let is_number = matches!(value.value_type(), ValueType::Integer | ValueType::Number);
        let target = if is_number && grow.is_none() {
            &mut grow
        } else if is_number && shrink.is_none() {
            &mut shrink
        } else {
            &mut basis
        };
        if target.is_some() {
            return Err(ctx.invalid(format!("unexpected '{value}'")));
        }
        *target = Some(value);
    }
    Ok(vec![
        grow.map_or_else(
            || synthesized("1", ValueType::Integer, grow_slot),
            |v| assigned(v, grow_slot, 1),
        ),
        shrink.map_or_else(
            || synthesized("1", ValueType::Integer, shrink_slot),
            |v| assigned(v, shrink_slot, 1),
        ),
        basis.map_or_else(
            || synthesized("0%", ValueType::Percentage, basis_slot),
            |v| assigned(v, basis_slot, 1),
        ),
    ])
}

/// Up to one value for each of two slots, told apart by `classify`, with
/// initial values for the rest.
fn either_order(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
    classify: impl Fn(&DeclarationValue, [bool; 2]) -> Option<usize>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut parts: [Option<DeclarationValue>; 2] = [None, None];
    for value in values {
        let filled = [parts[0].is_some(), parts[1].is_some()];
        let index = classify(&value, filled)
            .filter(|i| !filled[*i])
            .ok_or_else(|| ctx.invalid(format!("unexpected '{value}'")))?;
        parts[index] = Some(value);
    }
    let mut out = Vec::with_capacity(2);
    for (index, part) in parts.into_iter().enumerate() {
        let slot = ctx.child(index)?;
        out.push(match part {
            Some(value) => assigned(value, slot, 1),
            None => ctx.initial(slot, 1)?,
        });
    }
    Ok(out)
}

/// [CSS Flexbox § 5.3 'flex-flow'](https://www.w3.org/TR/css-flexbox-1/#flex-flow-property)
pub(super) fn flex_flow(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    either_order(ctx, values, |value, _| {
        if value.is_ident_in(FLEX_DIRECTION_KEYWORDS) {
            Some(0)
        } else if value.is_ident_in(FLEX_WRAP_KEYWORDS) {
            Some(1)
        } else {
            None
        }
    })
}

/// [CSS Multi-column § 3.3 'columns'](https://www.w3.org/TR/css-multicol-1/#columns)
///
/// `auto` fills whichever of width and count is still open, width first.
pub(super) fn columns(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    either_order(ctx, values, |value, filled| match value.value_type() {
        ValueType::Length => Some(0),
        ValueType::Integer if !value.is_length_like() => Some(1),
        ValueType::Ident if value.is_ident("auto") => Some(usize::from(filled[0])),
        _ => None,
    })
}
