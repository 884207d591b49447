//! Keyword tables used to tell apart the components of a shorthand.
//!
//! All entries are lower-case.

/// [CSS Cascade § 7.3](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
pub const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

/// [CSS Backgrounds § 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
pub const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

/// [CSS Backgrounds § 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
pub const BORDER_STYLE_KEYWORDS: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
    "auto",
];

/// Keywords of `<position>` mapped to their percentage.
pub const POSITION_KEYWORDS: &[(&str, &str)] = &[
    ("left", "0%"),
    ("top", "0%"),
    ("center", "50%"),
    ("right", "100%"),
    ("bottom", "100%"),
];

/// Position keywords that can only name the vertical axis.
pub const VERTICAL_POSITION_KEYWORDS: &[&str] = &["top", "bottom"];

/// Position keywords that can only name the horizontal axis.
pub const HORIZONTAL_POSITION_KEYWORDS: &[&str] = &["left", "right"];

/// [CSS Backgrounds § 3.4 'background-repeat'](https://www.w3.org/TR/css-backgrounds-3/#background-repeat)
pub const BACKGROUND_REPEAT_KEYWORDS: &[&str] =
    &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];

/// [CSS Backgrounds § 3.5 'background-attachment'](https://www.w3.org/TR/css-backgrounds-3/#background-attachment)
pub const BACKGROUND_ATTACHMENT_KEYWORDS: &[&str] = &["scroll", "fixed", "local"];

/// `<visual-box>` values accepted by `background-origin` and `background-clip`.
pub const BOX_KEYWORDS: &[&str] = &["border-box", "padding-box", "content-box"];

/// [CSS Backgrounds § 3.9 'background-size'](https://www.w3.org/TR/css-backgrounds-3/#background-size)
pub const BACKGROUND_SIZE_KEYWORDS: &[&str] = &["auto", "cover", "contain"];

/// Functions that produce an `<image>`.
pub const IMAGE_FUNCTIONS: &[&str] = &[
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
    "image",
    "image-set",
    "cross-fade",
    "element",
    "-webkit-gradient",
    "-webkit-linear-gradient",
    "-webkit-radial-gradient",
    "-moz-linear-gradient",
    "-moz-radial-gradient",
    "-o-linear-gradient",
];

/// [CSS Easing § 2](https://www.w3.org/TR/css-easing-1/#easing-functions) keywords.
pub const TIMING_FUNCTION_KEYWORDS: &[&str] = &[
    "ease",
    "linear",
    "ease-in",
    "ease-out",
    "ease-in-out",
    "step-start",
    "step-end",
];

/// Functions that produce an `<easing-function>`.
pub const TIMING_FUNCTIONS: &[&str] = &["cubic-bezier", "steps", "linear"];

/// [CSS Lists § 3.2 'list-style-position'](https://www.w3.org/TR/css-lists-3/#list-style-position-property)
pub const LIST_STYLE_POSITION_KEYWORDS: &[&str] = &["inside", "outside"];

/// [CSS Counter Styles § 6](https://www.w3.org/TR/css-counter-styles-3/#predefined-counters)
/// predefined counter style names.
pub const LIST_STYLE_TYPE_KEYWORDS: &[&str] = &[
    "disc",
    "circle",
    "square",
    "decimal",
    "decimal-leading-zero",
    "lower-roman",
    "upper-roman",
    "lower-greek",
    "lower-latin",
    "upper-latin",
    "lower-alpha",
    "upper-alpha",
    "armenian",
    "georgian",
    "hebrew",
    "cjk-ideographic",
    "hiragana",
    "katakana",
    "hiragana-iroha",
    "katakana-iroha",
    "disclosure-open",
    "disclosure-closed",
];

/// [CSS Fonts § 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
pub const FONT_STYLE_KEYWORDS: &[&str] = &["italic", "oblique"];

/// The CSS 2.1 subset of `font-variant` allowed in the `font` shorthand.
pub const FONT_VARIANT_KEYWORDS: &[&str] = &["small-caps"];

/// [CSS Fonts § 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
/// keywords and their numeric equivalents.
pub const FONT_WEIGHT_KEYWORDS: &[(&str, &str)] = &[
    ("normal", "400"),
    ("bold", "700"),
    ("bolder", "bolder"),
    ("lighter", "lighter"),
];

/// [CSS Fonts § 3.4 'font-stretch'](https://www.w3.org/TR/css-fonts-4/#font-stretch-prop)
pub const FONT_STRETCH_KEYWORDS: &[&str] = &[
    "ultra-condensed",
    "extra-condensed",
    "condensed",
    "semi-condensed",
    "semi-expanded",
    "expanded",
    "extra-expanded",
    "ultra-expanded",
];

/// [CSS Fonts § 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const FONT_SIZE_KEYWORDS: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
    "larger", "smaller",
];

/// [CSS Fonts § 3.7 'font'](https://www.w3.org/TR/css-fonts-4/#font-prop) system fonts.
pub const SYSTEM_FONT_KEYWORDS: &[&str] =
    &["caption", "icon", "menu", "message-box", "small-caption", "status-bar"];

/// [CSS Flexbox § 5.1 'flex-direction'](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
pub const FLEX_DIRECTION_KEYWORDS: &[&str] = &["row", "row-reverse", "column", "column-reverse"];

/// [CSS Flexbox § 5.2 'flex-wrap'](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
pub const FLEX_WRAP_KEYWORDS: &[&str] = &["nowrap", "wrap", "wrap-reverse"];

/// Vendor prefixes stripped when comparing property names.
pub const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-", "-o-"];
