//! Context-free canonical forms.
//!
//! Position keywords and font weights only have a canonical form inside a
//! particular property, so those are assigned by the expansion handlers.

use super::{DeclarationValue, ValueType};

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
const NAMED_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "#f0f8ff"),
    ("antiquewhite", "#faebd7"),
    ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"),
    ("azure", "#f0ffff"),
    ("beige", "#f5f5dc"),
    ("bisque", "#ffe4c4"),
    ("black", "#000000"),
    ("blanchedalmond", "#ffebcd"),
    ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"),
    ("brown", "#a52a2a"),
    ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"),
    ("chartreuse", "#7fff00"),
    ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"),
    ("cornflowerblue", "#6495ed"),
    ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"),
    ("cyan", "#00ffff"),
    ("darkblue", "#00008b"),
    ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"),
    ("darkgray", "#a9a9a9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"),
    ("darkkhaki", "#bdb76b"),
    ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"),
    ("darkorange", "#ff8c00"),
    ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"),
    ("darksalmon", "#e9967a"),
    ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"),
    ("darkslategray", "#2f4f4f"),
    ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"),
    ("darkviolet", "#9400d3"),
    ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"),
    ("firebrick", "#b22222"),
    ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"),
    ("fuchsia", "#ff00ff"),
    ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"),
    ("gold", "#ffd700"),
    ("goldenrod", "#daa520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#adff2f"),
    ("grey", "#808080"),
    ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"),
    ("indianred", "#cd5c5c"),
    ("indigo", "#4b0082"),
    ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"),
    ("lavender", "#e6e6fa"),
    ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"),
    ("lemonchiffon", "#fffacd"),
    ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"),
    ("lightcyan", "#e0ffff"),
    ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"),
    ("lightgreen", "#90ee90"),
    ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"),
    ("lightsalmon", "#ffa07a"),
    ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"),
    ("lightyellow", "#ffffe0"),
    ("lime", "#00ff00"),
    ("limegreen", "#32cd32"),
    ("linen", "#faf0e6"),
    ("magenta", "#ff00ff"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"),
    ("mediumblue", "#0000cd"),
    ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"),
    ("mediumseagreen", "#3cb371"),
    ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"),
    ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"),
    ("moccasin", "#ffe4b5"),
    ("navajowhite", "#ffdead"),
    ("navy", "#000080"),
    ("oldlace", "#fdf5e6"),
    ("olive", "#808000"),
    ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"),
    ("orangered", "#ff4500"),
    ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"),
    ("palegreen", "#98fb98"),
    ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"),
    ("papayawhip", "#ffefd5"),
    ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"),
    ("pink", "#ffc0cb"),
    ("plum", "#dda0dd"),
    ("powderblue", "#b0e0e6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"),
    ("royalblue", "#4169e1"),
    ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"),
    ("sandybrown", "#f4a460"),
    ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"),
    ("sienna", "#a0522d"),
    ("silver", "#c0c0c0"),
    ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#fffafa"),
    ("springgreen", "#00ff7f"),
    ("steelblue", "#4682b4"),
    ("tan", "#d2b48c"),
    ("teal", "#008080"),
    ("thistle", "#d8bfd8"),
    ("tomato", "#ff6347"),
    ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"),
    ("wheat", "#f5deb3"),
    ("white", "#ffffff"),
    ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"),
    ("yellowgreen", "#9acd32"),
];

/// Look up a named color.
#[must_use]
pub fn named_color(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by(|(candidate, _)| candidate.cmp(&lower.as_str()))
        .ok()
        .map(|index| NAMED_COLORS[index].1)
}

/// Canonical `#rrggbb` (or `rgba(...)` with alpha) spelling of a color literal.
///
/// `currentcolor` and system colors canonicalize to their lower-case name.
#[must_use]
pub fn canonical_color(literal: &str) -> String {
    let lower = literal.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return expand_hex(hex).unwrap_or(lower);
    }
    if lower == "transparent" {
        return "rgba(0, 0, 0, 0)".to_string();
    }
    if let Some(hex) = named_color(&lower) {
        return hex.to_string();
    }
    rgb_function(&lower).unwrap_or_else(|| normalize_function(&lower))
}

/// `#abc` → `#aabbcc`, `#abcd` → `#aabbccdd`; `#aabbccff` drops the opaque alpha.
fn expand_hex(hex: &str) -> Option<String> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let doubled = |s: &str| s.chars().flat_map(|c| [c, c]).collect::<String>();
    let full = match hex.len() {
        3 | 4 => doubled(hex),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let full = full.strip_suffix("ff").filter(|_| full.len() == 8).map_or(full.clone(), str::to_string);
    Some(format!("#{full}"))
}

/// `rgb(255, 0, 0)` and `rgb(100%, 0%, 0%)` → `#ff0000`.
fn rgb_function(lower: &str) -> Option<String> {
    let inner = lower
        .strip_prefix("rgb(")
        .or_else(|| lower.strip_prefix("rgba("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner
        .split([',', ' ', '/'])
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = parse_channel(part)?;
    }
    let hex = format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2]);
    match parts.get(3) {
        None => Some(hex),
        Some(alpha) => {
            let alpha = parse_alpha(alpha)?;
            if (alpha - 1.0).abs() < f64::EPSILON {
                Some(hex)
            } else {
                Some(format!(
                    "rgba({}, {}, {}, {})",
                    channels[0],
                    channels[1],
                    channels[2],
                    format_number(alpha)
                ))
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_channel(part: &str) -> Option<u8> {
    let value = if let Some(percent) = part.strip_suffix('%') {
        percent.parse::<f64>().ok()? * 255.0 / 100.0
    } else {
        part.parse::<f64>().ok()?
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(part: &str) -> Option<f64> {
    if let Some(percent) = part.strip_suffix('%') {
        Some(percent.parse::<f64>().ok()? / 100.0)
    } else {
        part.parse().ok()
    }
}

/// Lower-case a function and drop insignificant whitespace around commas.
fn normalize_function(lower: &str) -> String {
    lower
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
        .replace("( ", "(")
        .replace(" )", ")")
}

/// Shortest decimal spelling: `1.50` → `1.5`, `.5` → `0.5`, `+2` → `2`.
fn normalize_number(text: &str) -> Option<String> {
    let value: f64 = text.parse().ok()?;
    Some(format_number(value))
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let mut s = format!("{value:.6}");
    while s.ends_with('0') {
        let _ = s.pop();
    }
    if s.ends_with('.') {
        let _ = s.pop();
    }
    s
}

/// Split `12.5px` into (`12.5`, `px`).
fn split_dimension(literal: &str) -> (&str, &str) {
    let index = literal
        .char_indices()
        .find(|&(i, c)| {
            !(c.is_ascii_digit() || c == '.' || ((c == '+' || c == '-') && i == 0))
                && !(c == 'e' && literal[i + 1..].starts_with(|n: char| n.is_ascii_digit()))
        })
        .map_or(literal.len(), |(i, _)| i);
    literal.split_at(index)
}

/// Attach the context-free canonical form of `value`.
///
/// Idempotent: canonicalizing a canonicalized value changes nothing.
#[must_use]
pub fn canonicalize(value: DeclarationValue) -> DeclarationValue {
    let lower = value.literal().to_ascii_lowercase();
    let canonical = match value.value_type() {
        ValueType::Color => Some(canonical_color(&lower)),
        ValueType::Integer | ValueType::Number => normalize_number(&lower),
        ValueType::Length => {
            let (number, unit) = split_dimension(&lower);
            normalize_number(number).map(|n| if n == "0" { n } else { format!("{n}{unit}") })
        }
        ValueType::Percentage => {
            normalize_number(lower.trim_end_matches('%')).map(|n| format!("{n}%"))
        }
        ValueType::Time => {
            let (number, unit) = split_dimension(&lower);
            number.parse::<f64>().ok().map(|n| {
                let seconds = if unit == "ms" { n / 1000.0 } else { n };
                format!("{}s", format_number(seconds))
            })
        }
        ValueType::Url => Some(canonical_url(value.literal())),
        ValueType::Function => Some(normalize_function(&lower)),
        ValueType::Ident
        | ValueType::String
        | ValueType::Operator
        | ValueType::Separator
        | ValueType::Other => None,
    };
    match canonical {
        Some(canonical) => value.with_canonical(canonical),
        None => value,
    }
}

/// `url("a.png")`, `url('a.png')` and `url(a.png)` all become `url(a.png)`.
fn canonical_url(literal: &str) -> String {
    let inner = literal
        .get(4..literal.len().saturating_sub(1))
        .unwrap_or(literal)
        .trim()
        .trim_matches(['"', '\'']);
    format!("url({inner})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_color_table_is_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_color_spellings_agree() {
        let red = canonical_color("red");
        assert_eq!(red, "#ff0000");
        assert_eq!(canonical_color("#F00"), red);
        assert_eq!(canonical_color("#ff0000ff"), red);
        assert_eq!(canonical_color("rgb(255, 0, 0)"), red);
        assert_eq!(canonical_color("rgb(100%,0%,0%)"), red);
        assert_eq!(canonical_color("rgba(255,0,0,0.5)"), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_zero_lengths_and_times() {
        let zero = canonicalize(DeclarationValue::new("0px", ValueType::Length));
        assert_eq!(zero.canonical(), "0");
        let unitless = canonicalize(DeclarationValue::new("0", ValueType::Integer));
        assert_eq!(unitless.canonical(), "0");
        let ms = canonicalize(DeclarationValue::new("200ms", ValueType::Time));
        assert_eq!(ms.canonical(), "0.2s");
        let len = canonicalize(DeclarationValue::new("1.50EM", ValueType::Length));
        assert_eq!(len.canonical(), "1.5em");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let once = canonicalize(DeclarationValue::new("#ABC", ValueType::Color));
        let twice = canonicalize(once.clone());
        assert_eq!(once, twice);
    }
}
