//! Comma-layered properties: shadows, transitions and backgrounds.

use super::{Expansion, assigned, fill_all, is_function_in, layer_number, split_layers};
use super::position::resolve;
use crate::error::DeclarationError;
use crate::properties::keywords::{
    BACKGROUND_ATTACHMENT_KEYWORDS, BACKGROUND_REPEAT_KEYWORDS, BACKGROUND_SIZE_KEYWORDS,
    BOX_KEYWORDS, IMAGE_FUNCTIONS, POSITION_KEYWORDS, TIMING_FUNCTION_KEYWORDS, TIMING_FUNCTIONS,
};
use crate::values::{DeclarationValue, ValueType};

fn axis_named<'a>(axes: &'a [String], property: &str, name: &str) -> Option<&'a str> {
    let wanted = format!("{property}-{name}");
    axes.iter().find(|a| **a == wanted).map(String::as_str)
}

/// Each entry of a comma-separated list goes into its own layer.
pub(super) fn layered_list(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Vec<DeclarationValue> {
    let mut out = Vec::new();
    for (index, layer) in split_layers(values).into_iter().enumerate() {
        let number = layer_number(index);
        out.extend(
            layer
                .tokens
                .into_iter()
                .map(|v| assigned(v, ctx.property, number)),
        );
        out.extend(layer.separator);
    }
    out
}

/// [CSS Backgrounds § 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
///
/// "The components of each shadow are interpreted as follows: The first
/// length is the horizontal offset [...] The second length is the vertical
/// offset [...] The third length is a blur radius [...] The fourth length is
/// a spread distance." Only the last shadow falls back to `currentcolor`
/// when its color is omitted.
pub(super) fn shadow(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    if values.len() == 1 && values[0].is_ident("none") {
        return Ok(fill_all(ctx.tables, ctx.property, &values[0]));
    }

    let axes = ctx.axes(ctx.property)?;
    let slot = |name: &str| axis_named(axes, ctx.property, name);
    let offsets = [slot("h-offset"), slot("v-offset"), slot("blur"), slot("spread")];
    let length_slots: Vec<&str> = offsets.into_iter().flatten().collect();
    let color_slot = slot("color").ok_or_else(|| ctx.not_implemented(ctx.property))?;
    let inset_slot = slot("inset");

    let layers = split_layers(values);
    let last = layers.len().saturating_sub(1);
    let mut out = Vec::new();
    for (index, layer) in layers.into_iter().enumerate() {
        let number = layer_number(index);
        let mut lengths = Vec::new();
        let mut color = None;
        let mut inset = None;
        for token in layer.tokens {
            if token.is_length_like() {
                lengths.push(token);
            } else if token.value_type() == ValueType::Color && color.is_none() {
                color = Some(token);
            } else if token.is_ident("inset") && inset.is_none() && inset_slot.is_some() {
                inset = Some(token);
            } else {
                return Err(ctx.invalid(format!("unexpected '{token}' in shadow")));
            }
        }
        if lengths.len() < 2 || lengths.len() > length_slots.len() {
            return Err(ctx.invalid(format!("shadow takes 2 to {} lengths", length_slots.len())));
        }
        let count = lengths.len();
        out.extend(
            lengths
                .into_iter()
                .zip(&length_slots)
                .map(|(v, slot)| assigned(v, slot, number)),
        );
        for slot in &length_slots[count..] {
            out.push(ctx.initial(slot, number)?);
        }
        match color {
            Some(color) => out.push(assigned(color, color_slot, number)),
            None if index == last => out.push(ctx.initial(color_slot, number)?),
            None => {}
        }
        if let (Some(inset), Some(inset_slot)) = (inset, inset_slot) {
            out.push(assigned(inset, inset_slot, number));
        }
        out.extend(layer.separator);
    }
    Ok(out)
}

/// [CSS Transitions § 2.5 'transition'](https://www.w3.org/TR/css-transitions-1/#transition-shorthand-property)
///
/// "Note that order is important within the items in this property: the
/// first value that can be parsed as a time is assigned to the
/// transition-duration, and the second value that can be parsed as a time
/// is assigned to transition-delay."
pub(super) fn transition(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let slots = [ctx.child(0)?, ctx.child(1)?, ctx.child(2)?, ctx.child(3)?];
    let mut out = Vec::new();
    for (index, layer) in split_layers(values).into_iter().enumerate() {
        let number = layer_number(index);
        let mut parts: [Option<DeclarationValue>; 4] = [None, None, None, None];
        for token in layer.tokens {
            let target = if token.value_type() == ValueType::Time {
                if parts[1].is_none() { 1 } else { 3 }
            } else if token.is_ident_in(TIMING_FUNCTION_KEYWORDS)
                || is_function_in(&token, TIMING_FUNCTIONS)
            {
                2
            } else if token.value_type() == ValueType::Ident {
                0
            } else {
                return Err(ctx.invalid(format!("unexpected '{token}' in transition")));
            };
            if parts[target].is_some() {
                return Err(ctx.invalid(format!("'{token}' repeats a component")));
            }
            parts[target] = Some(token);
        }
        for (part, slot) in parts.into_iter().zip(slots) {
            out.push(match part {
                Some(value) => assigned(value, slot, number),
                None => ctx.initial(slot, number)?,
            });
        }
        out.extend(layer.separator);
    }
    Ok(out)
}

/// The components of one `<bg-layer>` as authored.
#[derive(Default)]
struct BackgroundLayer {
    image: Option<DeclarationValue>,
    position: Vec<DeclarationValue>,
    slash: Option<DeclarationValue>,
    size: Vec<DeclarationValue>,
    repeat: Vec<DeclarationValue>,
    attachment: Option<DeclarationValue>,
    boxes: Vec<DeclarationValue>,
    color: Option<DeclarationValue>,
}

fn is_position_token(value: &DeclarationValue) -> bool {
    value.is_length_like()
        || value.value_type() == ValueType::Percentage
        || (value.value_type() == ValueType::Ident
            && POSITION_KEYWORDS
                .iter()
                .any(|(k, _)| value.literal().eq_ignore_ascii_case(k)))
}

fn is_size_token(value: &DeclarationValue) -> bool {
    value.is_length_like()
        || value.value_type() == ValueType::Percentage
        || value.is_ident_in(BACKGROUND_SIZE_KEYWORDS)
}

impl BackgroundLayer {
    fn parse(ctx: &Expansion<'_>, tokens: Vec<DeclarationValue>) -> Result<Self, DeclarationError> {
        let mut layer = Self::default();
        let mut in_size = false;
        for token in tokens {
            if token.value_type() == ValueType::Operator {
                if layer.position.is_empty() || layer.slash.is_some() {
                    return Err(ctx.invalid("'/' must follow a position"));
                }
                layer.slash = Some(token);
                in_size = true;
                continue;
            }
            if in_size && layer.size.len() < 2 && is_size_token(&token) {
                layer.size.push(token);
                continue;
            }
            in_size = false;
            let value_type = token.value_type();
            if value_type == ValueType::Url
                || token.is_ident("none")
                || is_function_in(&token, IMAGE_FUNCTIONS)
            {
                if layer.image.replace(token).is_some() {
                    return Err(ctx.invalid("more than one image in a layer"));
                }
            } else if value_type == ValueType::Color {
                if layer.color.replace(token).is_some() {
                    return Err(ctx.invalid("more than one color in a layer"));
                }
            } else if token.is_ident_in(BACKGROUND_REPEAT_KEYWORDS) && layer.repeat.len() < 2 {
                layer.repeat.push(token);
            } else if token.is_ident_in(BACKGROUND_ATTACHMENT_KEYWORDS) {
                if layer.attachment.replace(token).is_some() {
                    return Err(ctx.invalid("more than one attachment in a layer"));
                }
            } else if token.is_ident_in(BOX_KEYWORDS) && layer.boxes.len() < 2 {
                layer.boxes.push(token);
            } else if is_position_token(&token) && layer.slash.is_none() {
                layer.position.push(token);
            } else {
                return Err(ctx.invalid(format!("unexpected '{token}' in background")));
            }
        }
        if layer.slash.is_some() && layer.size.is_empty() {
            return Err(ctx.invalid("'/' must be followed by a size"));
        }
        Ok(layer)
    }
}

/// [CSS Backgrounds § 3.10 'background'](https://www.w3.org/TR/css-backgrounds-3/#background)
///
/// "If one `<visual-box>` value is present then it sets both
/// background-origin and background-clip to that value. If two values are
/// present, then the first sets background-origin and the second
/// background-clip." The color may only appear in the final layer.
pub(super) fn background(
    ctx: &Expansion<'_>,
    values: Vec<DeclarationValue>,
) -> Result<Vec<DeclarationValue>, DeclarationError> {
    let image_slot = ctx.child(0)?;
    let x_slot = ctx.axis(ctx.child(1)?, 0)?;
    let y_slot = ctx.axis(ctx.child(1)?, 1)?;
    let size_slot = ctx.child(2)?;
    let repeat_slot = ctx.child(3)?;
    let attachment_slot = ctx.child(4)?;
    let origin_slot = ctx.child(5)?;
    let clip_slot = ctx.child(6)?;
    let color_slot = ctx.child(7)?;

    let layers = split_layers(values);
    let last = layers.len().saturating_sub(1);
    let mut out = Vec::new();
    for (index, raw) in layers.into_iter().enumerate() {
        let number = layer_number(index);
        let layer = BackgroundLayer::parse(ctx, raw.tokens)?;

        let single = |value: Option<DeclarationValue>, slot: &str| match value {
            Some(value) => Ok(assigned(value, slot, number)),
            None => ctx.initial(slot, number),
        };
        let many = |values: Vec<DeclarationValue>, slot: &str| {
            if values.is_empty() {
                ctx.initial(slot, number).map(|v| vec![v])
            } else {
                Ok(values.into_iter().map(|v| assigned(v, slot, number)).collect())
            }
        };

        out.push(single(layer.image, image_slot)?);
        if layer.position.is_empty() {
            out.push(ctx.initial(x_slot, number)?);
            out.push(ctx.initial(y_slot, number)?);
        } else {
            let (x, y) = resolve(ctx, layer.position)?;
            out.extend(x.into_iter().map(|v| assigned(v, x_slot, number)));
            out.extend(y.into_iter().map(|v| assigned(v, y_slot, number)));
        }
        out.extend(layer.slash);
        out.extend(many(layer.size, size_slot)?);
        out.extend(many(layer.repeat, repeat_slot)?);
        out.push(single(layer.attachment, attachment_slot)?);

        let mut boxes = layer.boxes.into_iter();
        match (boxes.next(), boxes.next()) {
            (Some(origin), Some(clip)) => {
                out.push(assigned(origin, origin_slot, number));
                out.push(assigned(clip, clip_slot, number));
            }
            (Some(both), None) => {
                let clip = both.clone_as_missing();
                out.push(assigned(both, origin_slot, number));
                out.push(assigned(clip, clip_slot, number));
            }
            _ => {
                out.push(ctx.initial(origin_slot, number)?);
                out.push(ctx.initial(clip_slot, number)?);
            }
        }

        match layer.color {
            Some(_) if index != last => {
                return Err(ctx.invalid("only the final layer may set a color"));
            }
            Some(color) => out.push(assigned(color, color_slot, 1)),
            None if index == last => out.push(ctx.initial(color_slot, 1)?),
            None => {}
        }
        out.extend(raw.separator);
    }
    Ok(out)
}
