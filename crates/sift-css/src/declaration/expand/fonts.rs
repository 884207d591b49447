//! Keyword-heavy properties: `font`, `font-family`, `list-style`, `quotes`.

use super::{Expansion, assigned, fill_all, is_function_in, keyword_canonical, split_layers};
use crate::error::DeclarationError;
use crate::properties::keywords::{
    FONT_SIZE_KEYWORDS, FONT_STRETCH_KEYWORDS, FONT_STYLE_KEYWORDS, FONT_VARIANT_KEYWORDS,
    FONT_WEIGHT_KEYWORDS, IMAGE_FUNCTIONS, LIST_STYLE_POSITION_KEYWORDS, SYSTEM_FONT_KEYWORDS,
};
use crate::values::{DeclarationValue, ValueType};

/// [CSS Fonts § 3.1 'font-family'](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
pub(super) fn font_family(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    family_list(ctx, values, ctx.property)
}

/// "Font family names other than generic families must either be given
/// quoted as strings, or unquoted as a sequence of one or more identifiers."
///
/// An unquoted sequence is joined with single spaces; quoted and unquoted
/// spellings of the same family share a canonical form.
fn family_list(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
    slot: &str,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut out = Vec::new();
    for layer in split_layers(values) {
        let family = match layer.tokens.as_slice() {
            [] => return Err(ctx.invalid("empty font family")),
            [quoted] if quoted.value_type() == ValueType::String => {
                let name = quoted.literal().trim_matches(['"', '\'']).to_ascii_lowercase();
                quoted.clone().with_canonical(name)
            }
            words if words.iter().all(|w| w.value_type() == ValueType::Ident) => {
                let joined: Vec<&str> = words.iter().map(DeclarationValue::literal).collect();
                DeclarationValue::new(joined.join(" "), ValueType::Ident)
            }
            _ => return Err(ctx.invalid("font family must be a string or identifiers")),
        };
        out.push(assigned(family, slot, 1));
        out.extend(layer.separator);
    }
    Ok(out)
}

fn is_font_size(value: &DeclarationValue) -> bool {
    value.is_length_like()
        || value.value_type() == ValueType::Percentage
        || value.is_ident_in(FONT_SIZE_KEYWORDS)
}

fn is_font_weight(value: &DeclarationValue) -> bool {
    match value.value_type() {
        ValueType::Integer | ValueType::Number => !value.is_length_like(),
        ValueType::Ident => {
            let lower = value.literal().to_ascii_lowercase();
            lower != "normal" && FONT_WEIGHT_KEYWORDS.iter().any(|(k, _)| *k == lower)
        }
        _ => false,
    }
}

/// [CSS Fonts § 3.7 'font'](https://www.w3.org/TR/css-fonts-4/#font-prop)
///
/// `[ <font-style> || <font-variant-css2> || <font-weight> ||
/// <font-width-css3> ]? <font-size> [ / <line-height> ]? <font-family>`
///
/// A `normal` before the size fills the first of style, variant, weight and
/// stretch that no other keyword has claimed.
pub(super) fn font(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    if values.len() == 1 && values[0].is_ident_in(SYSTEM_FONT_KEYWORDS) {
        return Ok(fill_all(ctx.tables, ctx.property, &values[0]));
    }
    let slots = [
        ctx.child(0)?,
        ctx.child(1)?,
        ctx.child(2)?,
        ctx.child(3)?,
        ctx.child(4)?,
        ctx.child(5)?,
        ctx.child(6)?,
    ];

    let mut tokens = values.into_iter().peekable();
    let mut prefix: [Option<DeclarationValue>; 4] = [None, None, None, None];
    let mut normals = Vec::new();
    let size = loop {
        let Some(token) = tokens.next() else {
            return Err(ctx.invalid("missing font size"));
        };
        if is_font_size(&token) {
            break token;
        }
        let index = if token.is_ident("normal") {
            normals.push(token);
            continue;
        } else if token.is_ident_in(FONT_STYLE_KEYWORDS) {
            0
        } else if token.is_ident_in(FONT_VARIANT_KEYWORDS) {
            1
        } else if is_font_weight(&token) {
            2
        } else if token.is_ident_in(FONT_STRETCH_KEYWORDS) {
            3
        } else {
            return Err(ctx.invalid(format!("unexpected '{token}' before font size")));
        };
        if prefix[index].is_some() {
            return Err(ctx.invalid(format!("'{token}' repeats a component")));
        }
        prefix[index] = Some(token);
    };
    for normal in normals {
        let open = prefix
            .iter_mut()
            .find(|p| p.is_none())
            .ok_or_else(|| ctx.invalid("too many 'normal' keywords"))?;
        *open = Some(normal);
    }

    let mut slash = None;
    let mut line_height = None;
    if tokens.peek().is_some_and(|t| t.value_type() == ValueType::Operator) {
        slash = tokens.next();
        line_height = Some(
            tokens
                .next()
                .ok_or_else(|| ctx.invalid("missing line height after '/'"))?,
        );
    }
    let family: Vec<DeclarationValue> = tokens.collect();
    if family.is_empty() {
        return Err(ctx.invalid("missing font family"));
    }

    let mut out = Vec::new();
    for (part, slot) in prefix.into_iter().zip(slots) {
        out.push(match part {
            Some(value) => assigned(keyword_canonical(slot, value), slot, 1),
            None => ctx.initial(slot, 1)?,
        });
    }
    out.push(assigned(size, slots[4], 1));
    out.extend(slash);
    out.push(match line_height {
        Some(value) => assigned(value, slots[5], 1),
        None => ctx.initial(slots[5], 1)?,
    });
    out.extend(family_list(ctx, family, slots[6])?);
    Ok(out)
}

/// [CSS Lists § 3.4 'list-style'](https://www.w3.org/TR/css-lists-3/#list-style-property)
///
/// "Using a value of none in the shorthand is potentially ambiguous, as none
/// is a valid value for both list-style-image and list-style-type. To
/// resolve this ambiguity, a value of none in the shorthand must be applied
/// to whichever of the two properties aren't otherwise set by the
/// shorthand."
pub(super) fn list_style(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let mut kind = None;
    let mut position = None;
    let mut image = None;
    let mut nones = Vec::new();
    for token in values {
        let target = if token.is_ident("none") {
            nones.push(token);
            continue;
        } else if token.is_ident_in(LIST_STYLE_POSITION_KEYWORDS) {
            &mut position
        } else if token.value_type() == ValueType::Url || is_function_in(&token, IMAGE_FUNCTIONS) {
            &mut image
        } else if matches!(token.value_type(), ValueType::Ident | ValueType::String) {
            &mut kind
        } else {
            return Err(ctx.invalid(format!("unexpected '{token}' in list-style")));
        };
        if target.is_some() {
            return Err(ctx.invalid(format!("'{token}' repeats a component")));
        }
        *target = Some(token);
    }

    let mut nones = nones.into_iter();
    match (nones.next(), nones.next(), nones.next()) {
        (None, _, _) => {}
        (Some(none), None, None) => match (&kind, &image) {
            (None, None) => {
                image = Some(none.clone_as_missing());
                kind = Some(none);
            }
            (None, Some(_)) => kind = Some(none),
            (Some(_), None) => image = Some(none),
            (Some(_), Some(_)) => return Err(ctx.invalid("'none' has no slot left")),
        },
        (Some(first), Some(second), None) if kind.is_none() && image.is_none() => {
            kind = Some(first);
            image = Some(second);
        }
        _ => return Err(ctx.invalid("too many 'none' keywords")),
    }

    let mut out = Vec::with_capacity(3);
    for (index, part) in [kind, position, image].into_iter().enumerate() {
        let slot = ctx.child(index)?;
        out.push(match part {
            Some(value) => assigned(value, slot, 1),
            None => ctx.initial(slot, 1)?,
        });
    }
    Ok(out)
}

/// [CSS Generated Content § 4.1 'quotes'](https://www.w3.org/TR/css-content-3/#quotes-property)
///
/// "Specifies the quotation marks for any number of embedded quotations.
/// Values after the required first pair specify the quotation marks of
/// increasingly nested quotations." Each nesting level is one layer.
pub(super) fn quotes(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    if values.len() == 1 && values[0].value_type() == ValueType::Ident {
        return Ok(fill_all(ctx.tables, ctx.property, &values[0]));
    }
    if let Some(other) = values.iter().find(|v| v.value_type() != ValueType::String) {
        return Err(ctx.invalid(format!("'{other}' is not a quote string")));
    }
    if values.len() % 2 != 0 {
        return Err(DeclarationError::OddArity {
            property: ctx.property.to_string(),
            count: values.len(),
        });
    }
    let mut level = 0;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if index % 2 == 0 {
                level += 1;
            }
            assigned(value, ctx.property, level)
        })
        .collect())
}
