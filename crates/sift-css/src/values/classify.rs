//! Token-to-[`ValueType`] classification.

use super::ValueType;
use super::canonical::named_color;

/// [§ 6 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
pub const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "rex", "cap", "rcap", "ch", "rch", "ic", "ric", "lh", "rlh", "vw",
    "vh", "vi", "vb", "vmin", "vmax", "svw", "svh", "lvw", "lvh", "dvw", "dvh", "cm", "mm", "q",
    "in", "pt", "pc", "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
];

/// [§ 7.3 Duration Units](https://www.w3.org/TR/css-values-4/#time)
pub const TIME_UNITS: &[&str] = &["s", "ms"];

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax) functions.
const COLOR_FUNCTIONS: &[&str] = &[
    "rgb", "rgba", "hsl", "hsla", "hwb", "lab", "lch", "oklab", "oklch", "color", "color-mix",
];

/// Colors that are identifiers but not in the named color table.
const SPECIAL_COLORS: &[&str] = &["transparent", "currentcolor"];

/// Type of a `<dimension-token>` with the given unit.
#[must_use]
pub fn classify_dimension(unit: &str) -> ValueType {
    let unit = unit.to_ascii_lowercase();
    if LENGTH_UNITS.contains(&unit.as_str()) {
        ValueType::Length
    } else if TIME_UNITS.contains(&unit.as_str()) {
        ValueType::Time
    } else {
        ValueType::Other
    }
}

/// Type of an `<ident-token>`: named colors are colors, the rest identifiers.
#[must_use]
pub fn classify_ident(ident: &str) -> ValueType {
    let lower = ident.to_ascii_lowercase();
    if SPECIAL_COLORS.contains(&lower.as_str()) || named_color(&lower).is_some() {
        ValueType::Color
    } else {
        ValueType::Ident
    }
}

/// Whether `name(` starts a color function.
#[must_use]
pub fn is_color_function(name: &str) -> bool {
    COLOR_FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())
}
