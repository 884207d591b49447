//! `<position>` values: `background-position`, `perspective-origin` and
//! `transform-origin`.

use super::{Expansion, assigned, layer_number, split_layers};
use crate::error::DeclarationError;
use crate::properties::keywords::{
    HORIZONTAL_POSITION_KEYWORDS, POSITION_KEYWORDS, VERTICAL_POSITION_KEYWORDS,
};
use crate::values::{DeclarationValue, ValueType};

/// [CSS Values § 9.1 Position](https://www.w3.org/TR/css-values-4/#position)
///
/// "If only one value is specified, the second value is assumed to be
/// center."
pub(super) fn position(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let x_slot = ctx.axis(ctx.property, 0)?;
    let y_slot = ctx.axis(ctx.property, 1)?;
    let mut out = Vec::new();
    for (index, layer) in split_layers(values).into_iter().enumerate() {
        let (x, y) = resolve(ctx, layer.tokens)?;
        let number = layer_number(index);
        out.extend(x.into_iter().map(|v| assigned(v, x_slot, number)));
        out.extend(y.into_iter().map(|v| assigned(v, y_slot, number)));
        out.extend(layer.separator);
    }
    Ok(out)
}

/// [CSS Transforms § 5.2 'transform-origin'](https://www.w3.org/TR/css-transforms-1/#transform-origin-property)
///
/// Up to two `<position>` components followed by an optional z `<length>`.
pub(super) fn transform_origin(
    ctx: &Expansion<'_>,
    mut values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let z = if values.len() == 3 { values.pop() } else { None };
    if let Some(z) = z.as_ref().filter(|z| !z.is_length_like()) {
        return Err(ctx.invalid(format!("'{z}' is not a z offset")));
    }
    let (x, y) = resolve(ctx, values)?;
    let x_slot = ctx.axis(ctx.property, 0)?;
    let y_slot = ctx.axis(ctx.property, 1)?;
    let mut out = Vec::new();
    out.extend(x.into_iter().map(|v| assigned(v, x_slot, 1)));
    out.extend(y.into_iter().map(|v| assigned(v, y_slot, 1)));
    let z_slot = ctx.axis(ctx.property, 2)?;
    out.push(match z {
        Some(z) => assigned(z, z_slot, 1),
        None => ctx.initial(z_slot, 1)?,
    });
    Ok(out)
}

/// Attach the percentage a position keyword stands for.
pub(super) fn canonical_position(value: DeclarationValue) -> DeclarationValue {
    if value.value_type() != ValueType::Ident {
        return value;
    }
    let lower = value.literal().to_ascii_lowercase();
    match POSITION_KEYWORDS.iter().find(|(k, _)| *k == lower) {
        Some((_, percent)) => value.with_canonical(*percent),
        None => value,
    }
}

fn centered() -> DeclarationValue {
    DeclarationValue::synthesized("center", ValueType::Ident).with_canonical("50%")
}

fn is_keyword(value: &DeclarationValue) -> bool {
    value.value_type() == ValueType::Ident
        && POSITION_KEYWORDS
            .iter()
            .any(|(k, _)| value.literal().eq_ignore_ascii_case(k))
}

/// Split one `<position>` into its horizontal and vertical components.
///
/// Keywords that can only be vertical (`top`, `bottom`) or only horizontal
/// (`left`, `right`) put the pair in order regardless of how it was written.
pub(super) fn resolve(
    ctx: &Expansion<'_>,
    tokens: Vec<DeclarationValue>,
) -> Result<(Vec<DeclarationValue>, Vec<DeclarationValue>), DeclarationError> {
    let tokens: Vec<DeclarationValue> = tokens.into_iter().map(canonical_position).collect();
    let vertical = |v: &DeclarationValue| v.is_ident_in(VERTICAL_POSITION_KEYWORDS);
    let horizontal = |v: &DeclarationValue| v.is_ident_in(HORIZONTAL_POSITION_KEYWORDS);

    match tokens.len() {
        0 => Err(ctx.invalid("empty position")),
        1 => {
            let mut tokens = tokens;
            let only = tokens.remove(0);
            if vertical(&only) {
                Ok((vec![centered()], vec![only]))
            } else {
                Ok((vec![only], vec![centered()]))
            }
        }
        2 => {
            let mut tokens = tokens.into_iter();
            let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
                return Err(ctx.invalid("empty position"));
            };
            if vertical(&first) || horizontal(&second) {
                Ok((vec![second], vec![first]))
            } else {
                Ok((vec![first], vec![second]))
            }
        }
        3 | 4 => {
            // Edge offsets: `right 10px bottom 5px`.
            let mut groups: Vec<Vec<DeclarationValue>> = Vec::new();
            for token in tokens {
                if is_keyword(&token) {
                    groups.push(vec![token]);
                } else if let Some(group) = groups.last_mut() {
                    group.push(token);
                } else {
                    return Err(ctx.invalid(format!("offset '{token}' without an edge")));
                }
            }
            let mut groups = groups.into_iter();
            match (groups.next(), groups.next(), groups.next()) {
                (Some(first), Some(second), None) => {
                    if vertical(&first[0]) || horizontal(&second[0]) {
                        Ok((second, first))
                    } else {
                        Ok((first, second))
                    }
                }
                _ => Err(ctx.invalid("expected two edge groups")),
            }
        }
        count => Err(ctx.invalid(format!("too many position values ({count})"))),
    }
}
