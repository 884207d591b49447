//! Property tables: which properties are shorthands, which take several
//! values, how each one is expanded, and the initial value of every slot.
//!
//! The tables are assembled once into an immutable [`PropertyTables`] and
//! handed to the [`DeclarationFactory`](crate::DeclarationFactory).

pub mod keywords;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use strum_macros::{Display, EnumIter, EnumString};

use crate::error::DeclarationError;
use crate::values::{DeclarationValue, ValueType};

use keywords::VENDOR_PREFIXES;

/// The expansion handler responsible for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PropertyFamily {
    /// [CSS Backgrounds § 3.6 'background-position'](https://www.w3.org/TR/css-backgrounds-3/#background-position)
    /// and `perspective-origin`: an x/y pair with keyword swapping.
    Position,
    /// [CSS Transforms § 5.2 'transform-origin'](https://www.w3.org/TR/css-transforms-1/#transform-origin-property)
    TransformOrigin,
    /// Two lengths where the second defaults to the first:
    /// `border-spacing` and the per-corner radii.
    LengthPair,
    /// `margin`, `padding`, `border-width`, `border-style`, `border-color`.
    BoxEdges,
    /// `border`, `border-<edge>`, `outline`, `column-rule`.
    BorderTriple,
    /// [CSS Backgrounds § 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
    BorderRadius,
    /// `box-shadow` and `text-shadow`.
    Shadow,
    /// [CSS Transitions § 2.5 'transition'](https://www.w3.org/TR/css-transitions-1/#transition-shorthand-property)
    Transition,
    /// [CSS Backgrounds § 3.10 'background'](https://www.w3.org/TR/css-backgrounds-3/#background)
    Background,
    /// [CSS Lists § 3.4 'list-style'](https://www.w3.org/TR/css-lists-3/#list-style-property)
    ListStyle,
    /// [CSS Fonts § 3.7 'font'](https://www.w3.org/TR/css-fonts-4/#font-prop)
    Font,
    /// [CSS Fonts § 3.1 'font-family'](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    FontFamily,
    /// [CSS Generated Content § 4.1 'quotes'](https://www.w3.org/TR/css-content-3/#quotes-property)
    Quotes,
    /// [CSS Flexbox § 7.1 'flex'](https://www.w3.org/TR/css-flexbox-1/#flex-property)
    Flex,
    /// [CSS Flexbox § 5.3 'flex-flow'](https://www.w3.org/TR/css-flexbox-1/#flex-flow-property)
    FlexFlow,
    /// [CSS Multi-column § 3.3 'columns'](https://www.w3.org/TR/css-multicol-1/#columns)
    Columns,
    /// Shorthands of two longhands where the second defaults to the first:
    /// `overflow`, `gap`, `place-items`, `place-content`.
    PairShorthand,
    /// Comma-separated lists with one entry per layer, e.g. `background-image`.
    LayeredList,
    /// Token lists whose order matters, e.g. `transform`.
    OrderedList,
    /// Token lists compared as sets, e.g. `text-decoration-line`.
    UnorderedList,
}

/// Immutable lookup tables consulted during normalization.
#[derive(Debug, Clone, Default)]
pub struct PropertyTables {
    children: HashMap<String, Vec<String>>,
    multi_valued: HashSet<String>,
    families: HashMap<String, PropertyFamily>,
    axes: HashMap<String, Vec<String>>,
    unordered: HashSet<String>,
    initial: HashMap<String, (String, ValueType)>,
}

const EDGES: [&str; 4] = ["top", "right", "bottom", "left"];
const CORNERS: [&str; 4] = ["top-left", "top-right", "bottom-right", "bottom-left"];

impl PropertyTables {
    /// The standard tables, built on first use.
    #[must_use]
    pub fn standard() -> &'static Self {
        static TABLES: OnceLock<PropertyTables> = OnceLock::new();
        TABLES.get_or_init(Self::build_standard)
    }

    /// Empty tables. Every property is treated as an unknown longhand.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_standard() -> Self {
        let mut tables = Self::default();

        // Box edges.
        for name in ["margin", "padding"] {
            let edges: Vec<String> = EDGES.iter().map(|e| format!("{name}-{e}")).collect();
            tables.shorthand(name, &edges, PropertyFamily::BoxEdges);
        }
        for (part, initial) in [
            ("width", ("medium", ValueType::Ident)),
            ("style", ("none", ValueType::Ident)),
            ("color", ("currentcolor", ValueType::Color)),
        ] {
            let edges: Vec<String> = EDGES.iter().map(|e| format!("border-{e}-{part}")).collect();
            for edge in &edges {
                tables.initial_value(edge, initial.0, initial.1);
            }
            tables.shorthand(&format!("border-{part}"), &edges, PropertyFamily::BoxEdges);
            for owner in ["outline", "column-rule"] {
                tables.initial_value(&format!("{owner}-{part}"), initial.0, initial.1);
            }
        }

        // Width / style / color triples.
        for edge in EDGES {
            let parts: Vec<String> = ["width", "style", "color"]
                .iter()
                .map(|p| format!("border-{edge}-{p}"))
                .collect();
            tables.shorthand(&format!("border-{edge}"), &parts, PropertyFamily::BorderTriple);
        }
        for owner in ["border", "outline", "column-rule"] {
            let parts: Vec<String> = ["width", "style", "color"]
                .iter()
                .map(|p| format!("{owner}-{p}"))
                .collect();
            tables.shorthand(owner, &parts, PropertyFamily::BorderTriple);
        }

        // Radii.
        let corners: Vec<String> = CORNERS.iter().map(|c| format!("border-{c}-radius")).collect();
        for corner in &corners {
            tables.multi(corner, PropertyFamily::LengthPair);
            tables.axes_of(corner, &["horizontal", "vertical"]);
        }
        tables.shorthand("border-radius", &corners, PropertyFamily::BorderRadius);
        tables.multi("border-spacing", PropertyFamily::LengthPair);
        tables.axes_of("border-spacing", &["horizontal", "vertical"]);

        // Positions.
        tables.multi("background-position", PropertyFamily::Position);
        tables.axes_of("background-position", &["left", "top"]);
        tables.initial_value("background-position-left", "0%", ValueType::Percentage);
        tables.initial_value("background-position-top", "0%", ValueType::Percentage);
        tables.multi("perspective-origin", PropertyFamily::Position);
        tables.axes_of("perspective-origin", &["x-axis", "y-axis"]);
        tables.multi("transform-origin", PropertyFamily::TransformOrigin);
        tables.axes_of("transform-origin", &["x-axis", "y-axis", "z-axis"]);
        tables.initial_value("transform-origin-z-axis", "0px", ValueType::Length);

        // Shadows.
        tables.multi("box-shadow", PropertyFamily::Shadow);
        tables.axes_of("box-shadow", &["h-offset", "v-offset", "blur", "spread", "color", "inset"]);
        tables.multi("text-shadow", PropertyFamily::Shadow);
        tables.axes_of("text-shadow", &["h-offset", "v-offset", "blur", "color"]);
        for shadow in ["box-shadow", "text-shadow"] {
            tables.initial_value(&format!("{shadow}-blur"), "0px", ValueType::Length);
            tables.initial_value(&format!("{shadow}-color"), "currentcolor", ValueType::Color);
        }
        tables.initial_value("box-shadow-spread", "0px", ValueType::Length);

        // Background.
        let background = [
            ("background-image", "none", ValueType::Ident),
            ("background-size", "auto", ValueType::Ident),
            ("background-repeat", "repeat", ValueType::Ident),
            ("background-attachment", "scroll", ValueType::Ident),
            ("background-origin", "padding-box", ValueType::Ident),
            ("background-clip", "border-box", ValueType::Ident),
        ];
        for (name, value, value_type) in background {
            tables.multi(name, PropertyFamily::LayeredList);
            tables.initial_value(name, value, value_type);
        }
        tables.initial_value("background-color", "transparent", ValueType::Color);
        tables.shorthand(
            "background",
            &[
                "background-image",
                "background-position",
                "background-size",
                "background-repeat",
                "background-attachment",
                "background-origin",
                "background-clip",
                "background-color",
            ],
            PropertyFamily::Background,
        );

        // Transition.
        let transition = [
            ("transition-property", "all", ValueType::Ident),
            ("transition-duration", "0s", ValueType::Time),
            ("transition-timing-function", "ease", ValueType::Ident),
            ("transition-delay", "0s", ValueType::Time),
        ];
        for (name, value, value_type) in transition {
            tables.multi(name, PropertyFamily::LayeredList);
            tables.initial_value(name, value, value_type);
        }
        let names: Vec<&str> = transition.iter().map(|(name, _, _)| *name).collect();
        tables.shorthand("transition", &names, PropertyFamily::Transition);

        // Lists and fonts.
        for (name, value) in [
            ("list-style-type", "disc"),
            ("list-style-position", "outside"),
            ("list-style-image", "none"),
        ] {
            tables.initial_value(name, value, ValueType::Ident);
        }
        tables.shorthand(
            "list-style",
            &["list-style-type", "list-style-position", "list-style-image"],
            PropertyFamily::ListStyle,
        );
        for name in ["font-style", "font-variant", "font-weight", "font-stretch", "line-height"] {
            tables.initial_value(name, "normal", ValueType::Ident);
        }
        tables.multi("font-family", PropertyFamily::FontFamily);
        tables.shorthand(
            "font",
            &[
                "font-style",
                "font-variant",
                "font-weight",
                "font-stretch",
                "font-size",
                "line-height",
                "font-family",
            ],
            PropertyFamily::Font,
        );
        tables.multi("quotes", PropertyFamily::Quotes);

        // Flexbox and multi-column.
        tables.shorthand("flex", &["flex-grow", "flex-shrink", "flex-basis"], PropertyFamily::Flex);
        tables.initial_value("flex-direction", "row", ValueType::Ident);
        tables.initial_value("flex-wrap", "nowrap", ValueType::Ident);
        tables.shorthand("flex-flow", &["flex-direction", "flex-wrap"], PropertyFamily::FlexFlow);
        tables.initial_value("column-width", "auto", ValueType::Ident);
        tables.initial_value("column-count", "auto", ValueType::Ident);
        tables.shorthand("columns", &["column-width", "column-count"], PropertyFamily::Columns);
        for (name, first, second) in [
            ("overflow", "overflow-x", "overflow-y"),
            ("gap", "row-gap", "column-gap"),
            ("place-items", "align-items", "justify-items"),
            ("place-content", "align-content", "justify-content"),
        ] {
            tables.shorthand(name, &[first, second], PropertyFamily::PairShorthand);
        }

        // Plain token lists.
        for name in [
            "transform",
            "content",
            "cursor",
            "counter-reset",
            "counter-increment",
            "filter",
            "backdrop-filter",
            "animation",
            "grid-template-columns",
            "grid-template-rows",
            "grid-template-areas",
            "font-feature-settings",
        ] {
            tables.multi(name, PropertyFamily::OrderedList);
        }
        for name in ["text-decoration-line", "will-change", "touch-action"] {
            tables.multi(name, PropertyFamily::UnorderedList);
            let _ = tables.unordered.insert(name.to_string());
        }

        tables
    }

    fn shorthand<S: AsRef<str>>(&mut self, name: &str, children: &[S], family: PropertyFamily) {
        let children = children.iter().map(|c| c.as_ref().to_string()).collect();
        let _ = self.children.insert(name.to_string(), children);
        let _ = self.families.insert(name.to_string(), family);
    }

    fn multi(&mut self, name: &str, family: PropertyFamily) {
        let _ = self.multi_valued.insert(name.to_string());
        let _ = self.families.insert(name.to_string(), family);
    }

    fn axes_of(&mut self, name: &str, axes: &[&str]) {
        let axes = axes.iter().map(|a| format!("{name}-{a}")).collect();
        let _ = self.axes.insert(name.to_string(), axes);
    }

    fn initial_value(&mut self, slot: &str, literal: &str, value_type: ValueType) {
        let _ = self
            .initial
            .insert(slot.to_string(), (literal.to_string(), value_type));
    }

    /// Register `name` as a shorthand of `children` without an expansion
    /// handler. Creating a declaration for it then fails with
    /// [`DeclarationError::NotImplemented`].
    #[must_use]
    pub fn with_shorthand(mut self, name: &str, children: &[&str]) -> Self {
        let children = children.iter().map(ToString::to_string).collect();
        let _ = self.children.insert(name.to_string(), children);
        let _ = self.families.remove(name);
        self
    }

    /// Register `name` as multi-valued without an expansion handler.
    #[must_use]
    pub fn with_multi_valued(mut self, name: &str) -> Self {
        let _ = self.multi_valued.insert(name.to_string());
        let _ = self.families.remove(name);
        self
    }

    /// Assign `family` as the handler of an already registered property.
    #[must_use]
    pub fn with_family(mut self, name: &str, family: PropertyFamily) -> Self {
        let _ = self.families.insert(name.to_string(), family);
        self
    }

    /// Whether `property` (unprefixed) is a shorthand.
    #[must_use]
    pub fn is_shorthand(&self, property: &str) -> bool {
        self.children.contains_key(property)
    }

    /// Whether `property` (unprefixed) takes several values without being a
    /// shorthand.
    #[must_use]
    pub fn is_multi_valued(&self, property: &str) -> bool {
        self.multi_valued.contains(property)
    }

    /// The direct individual properties of a shorthand, in expansion order.
    #[must_use]
    pub fn children(&self, shorthand: &str) -> Option<&[String]> {
        self.children.get(shorthand).map(Vec::as_slice)
    }

    /// Every registered shorthand name, sorted.
    #[must_use]
    pub fn shorthands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.children.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The shorthands that list `property` as a direct child.
    #[must_use]
    pub fn parents_of(&self, property: &str) -> Vec<&str> {
        let mut parents: Vec<&str> = self
            .children
            .iter()
            .filter(|(_, children)| children.iter().any(|c| c == property))
            .map(|(name, _)| name.as_str())
            .collect();
        parents.sort_unstable();
        parents
    }

    /// The named axis slots of a positional multi-valued property.
    #[must_use]
    pub fn axis_slots(&self, property: &str) -> Option<&[String]> {
        self.axes.get(property).map(Vec::as_slice)
    }

    /// The deepest slot names `property` fills, in expansion order.
    ///
    /// Shorthands contribute their children's slots, axis properties their
    /// axes, and every other property the single slot named after itself.
    #[must_use]
    pub fn slot_properties(&self, property: &str) -> Vec<String> {
        if let Some(children) = self.children.get(property) {
            children.iter().flat_map(|c| self.slot_properties(c)).collect()
        } else if let Some(axes) = self.axes.get(property) {
            axes.clone()
        } else {
            vec![property.to_string()]
        }
    }

    /// Whether the owner of `slot` is `property` or one of its descendants.
    #[must_use]
    pub fn fills_slot(&self, property: &str, slot: &str) -> bool {
        self.slot_properties(property).iter().any(|s| s == slot)
    }

    /// The expansion handler for `property`.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::NotImplemented`] when the property is
    /// registered as a shorthand or multi-valued property but has no handler.
    pub fn family(&self, property: &str) -> Result<Option<PropertyFamily>, DeclarationError> {
        match self.families.get(property) {
            Some(family) => Ok(Some(*family)),
            None if self.is_shorthand(property) || self.is_multi_valued(property) => {
                Err(DeclarationError::NotImplemented {
                    property: property.to_string(),
                })
            }
            None => Ok(None),
        }
    }

    /// Whether values in `slot` compare as a set rather than a sequence.
    #[must_use]
    pub fn is_unordered_slot(&self, slot: &str) -> bool {
        self.unordered.contains(slot)
    }

    /// The initial value of `slot`, flagged missing.
    #[must_use]
    pub fn initial(&self, slot: &str) -> Option<DeclarationValue> {
        self.initial
            .get(slot)
            .map(|(literal, value_type)| DeclarationValue::synthesized(literal, *value_type))
    }
}

/// Split `-webkit-transition` into (`-webkit-`, `transition`).
///
/// Unprefixed names return an empty prefix.
#[must_use]
pub fn split_vendor_prefix(property: &str) -> (&str, &str) {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| {
            property
                .strip_prefix(prefix)
                .map(|rest| (&property[..prefix.len()], rest))
        })
        .unwrap_or(("", property))
}

/// `property` without its vendor prefix.
#[must_use]
pub fn strip_vendor_prefix(property: &str) -> &str {
    split_vendor_prefix(property).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_family_has_a_property() {
        let tables = PropertyTables::standard();
        for family in PropertyFamily::iter() {
            assert!(
                tables.families.values().any(|f| *f == family),
                "{family} is unused"
            );
        }
    }

    #[test]
    fn test_every_claimed_property_has_a_family() {
        let tables = PropertyTables::standard();
        for name in tables.children.keys().chain(tables.multi_valued.iter()) {
            assert!(tables.family(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_border_slots_are_leaves() {
        let slots = PropertyTables::standard().slot_properties("border");
        assert_eq!(slots.len(), 12);
        assert!(slots.contains(&"border-left-style".to_string()));
        assert!(!slots.contains(&"border-width".to_string()));
    }

    #[test]
    fn test_vendor_prefix_split() {
        assert_eq!(split_vendor_prefix("-moz-box-shadow"), ("-moz-", "box-shadow"));
        assert_eq!(split_vendor_prefix("margin"), ("", "margin"));
    }
}
