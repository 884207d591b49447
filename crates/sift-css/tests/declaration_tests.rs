//! Integration tests for declaration normalization and comparison.

use sift_css::{
    Declaration, DeclarationError, DeclarationFactory, DeclarationValue, PropertyAndLayer,
    PropertyTables, SourceLocation, ValueType, parse_stylesheet,
};

/// The first declaration of `a { <property>: <value> }`.
fn declaration(property: &str, value: &str) -> Declaration {
    let css = format!("a {{ {property}: {value} }}");
    let sheet = parse_stylesheet(&css).unwrap();
    let (_, declaration) = sheet.all_declarations().next().unwrap();
    declaration.clone()
}

fn slot_literals(declaration: &Declaration, slot: &str) -> Vec<String> {
    declaration.slots()[&PropertyAndLayer::new(slot, 1)]
        .values()
        .iter()
        .map(|v| v.literal().to_string())
        .collect()
}

#[test]
fn test_margin_one_value_fills_every_edge() {
    let margin = declaration("margin", "1px");
    assert!(margin.is_shorthand());
    for edge in ["margin-top", "margin-right", "margin-bottom", "margin-left"] {
        assert_eq!(slot_literals(&margin, edge), vec!["1px".to_string()]);
    }
    let slots = margin.slots();
    assert!(slots[&PropertyAndLayer::new("margin-left", 1)].values()[0].is_missing());
    assert!(!slots[&PropertyAndLayer::new("margin-top", 1)].values()[0].is_missing());
}

#[test]
fn test_margin_one_and_four_values_are_equivalent_not_equal() {
    let short = declaration("margin", "1px");
    let long = declaration("margin", "1px 1px 1px 1px");
    assert!(short.declaration_is_equivalent(&long));
    assert!(!short.declaration_equals(&long));
    assert!(long.declaration_equals(&declaration("margin", "1px 1px 1px 1px")));
}

#[test]
fn test_margin_three_values() {
    let margin = declaration("margin", "1px 2px 3px");
    assert_eq!(slot_literals(&margin, "margin-top"), vec!["1px"]);
    assert_eq!(slot_literals(&margin, "margin-right"), vec!["2px"]);
    assert_eq!(slot_literals(&margin, "margin-bottom"), vec!["3px"]);
    assert_eq!(slot_literals(&margin, "margin-left"), vec!["2px"]);
}

#[test]
fn test_zero_lengths_are_equivalent() {
    let px = declaration("margin-top", "0px");
    let em = declaration("margin-top", "0em");
    let bare = declaration("margin-top", "0");
    assert!(px.declaration_is_equivalent(&em));
    assert!(px.declaration_is_equivalent(&bare));
    assert!(!px.declaration_equals(&em));
}

#[test]
fn test_color_spellings_are_equivalent() {
    let hex = declaration("color", "#ff0000");
    let short = declaration("color", "#F00");
    let named = declaration("color", "red");
    let rgb = declaration("color", "rgb(255, 0, 0)");
    assert!(hex.declaration_is_equivalent(&short));
    assert!(hex.declaration_is_equivalent(&named));
    assert!(hex.declaration_is_equivalent(&rgb));
    assert!(!hex.declaration_equals(&named));
}

#[test]
fn test_background_position_single_keyword_implies_center() {
    let top = declaration("background-position", "top");
    let top_center = declaration("background-position", "top center");
    let center_top = declaration("background-position", "center top");
    assert!(top.declaration_is_equivalent(&top_center));
    assert!(top_center.declaration_is_equivalent(&center_top));
    assert!(!top.declaration_equals(&top_center));
}

#[test]
fn test_background_position_keywords_match_percentages() {
    let keywords = declaration("background-position", "left top");
    let percentages = declaration("background-position", "0% 0%");
    assert!(keywords.declaration_is_equivalent(&percentages));
}

#[test]
fn test_importance_separates_declarations() {
    let sheet = parse_stylesheet("a { color: red } b { color: red !important }").unwrap();
    let declarations: Vec<&Declaration> = sheet.all_declarations().map(|(_, d)| d).collect();
    assert!(!declarations[0].is_important());
    assert!(declarations[1].is_important());
    assert!(!declarations[0].declaration_equals(declarations[1]));
    assert!(!declarations[0].declaration_is_equivalent(declarations[1]));
}

#[test]
fn test_vendor_prefix_is_kept_but_can_be_stripped() {
    let prefixed = declaration("-webkit-transition", "opacity 1s");
    let plain = declaration("transition", "opacity 1s");
    assert_eq!(prefixed.unprefixed_property(), "transition");
    assert!(!prefixed.declaration_equals(&plain));
    assert_eq!(prefixed.equality_key(true), plain.equality_key(true));
}

#[test]
fn test_border_fills_omitted_parts_with_initial_values() {
    let border = declaration("border", "solid");
    let width = border.individual("border-width").unwrap();
    let slots = width.slots();
    let value = &slots[&PropertyAndLayer::new("border-top-width", 1)].values()[0];
    assert_eq!(value.literal(), "medium");
    assert!(value.is_missing());
}

/// Sample values for every standard shorthand; keyword forms that fill
/// all children at once are listed alongside the ordinary ones.
const SHORTHAND_SAMPLES: &[(&str, &[&str])] = &[
    ("background", &["url(a.png) no-repeat left top, #fff", "inherit"]),
    ("border", &["1px solid red", "inherit"]),
    ("border-bottom", &["thin dashed"]),
    ("border-color", &["red blue"]),
    ("border-left", &["2px solid #000"]),
    ("border-radius", &["4px 8px / 2px", "50%"]),
    ("border-right", &["3px double"]),
    ("border-style", &["solid none dotted"]),
    ("border-top", &["1px solid"]),
    ("border-width", &["1px 2px 3px 4px"]),
    ("column-rule", &["1px dotted #888"]),
    ("columns", &["12em 3", "auto"]),
    ("flex", &["1 1 auto", "none", "2"]),
    ("flex-flow", &["column wrap"]),
    ("font", &["italic bold 12px/1.5 \"Helvetica Neue\", serif", "caption"]),
    ("gap", &["1em 2em"]),
    ("list-style", &["square inside"]),
    ("margin", &["1px 2px", "auto"]),
    ("outline", &["thin solid blue"]),
    ("overflow", &["hidden scroll"]),
    ("padding", &["1px 2px 3px"]),
    ("place-content", &["center start"]),
    ("place-items", &["center"]),
    ("transition", &["opacity 1s ease-in, color 2s", "none"]),
];

#[test]
fn test_every_shorthand_slots_match_its_individuals() {
    for property in PropertyTables::standard().shorthands() {
        let Some((_, samples)) = SHORTHAND_SAMPLES.iter().find(|(name, _)| *name == property)
        else {
            panic!("no sample value for shorthand {property}");
        };
        for value in *samples {
            let shorthand = declaration(property, value);
            assert!(shorthand.is_shorthand(), "{property}: {value}");
            assert_eq!(
                shorthand.aggregate_individual_slots().as_ref(),
                Some(&*shorthand.slots()),
                "{property}: {value}"
            );
        }
    }
}

#[test]
fn test_font_family_is_ordered() {
    let a = declaration("font-family", "Arial, serif");
    let b = declaration("font-family", "Arial, serif");
    let reversed = declaration("font-family", "serif, Arial");
    assert!(a.declaration_equals(&b));
    assert!(!a.declaration_equals(&reversed));
    assert!(!a.declaration_is_equivalent(&reversed));

    let quoted = declaration("font-family", "\"Helvetica Neue\", serif");
    let bare = declaration("font-family", "Helvetica Neue, serif");
    assert!(quoted.declaration_is_equivalent(&bare));
}

#[test]
fn test_quotes_with_odd_arity_is_fatal() {
    let factory = DeclarationFactory::standard();
    let values = vec![
        DeclarationValue::new("\"«\"", ValueType::String),
        DeclarationValue::new("\"»\"", ValueType::String),
        DeclarationValue::new("\"‹\"", ValueType::String),
    ];
    let error = factory
        .create("quotes", values, false, SourceLocation::default())
        .unwrap_err();
    assert_eq!(
        error,
        DeclarationError::OddArity {
            property: "quotes".to_string(),
            count: 3
        }
    );
    assert!(error.is_fatal());
}

#[test]
fn test_shorthand_without_handler_is_not_implemented() {
    let tables = PropertyTables::empty().with_shorthand("gap", &["row-gap", "column-gap"]);
    let factory = DeclarationFactory::new(&tables);
    let error = factory
        .create(
            "gap",
            vec![DeclarationValue::new("1px", ValueType::Length)],
            false,
            SourceLocation::default(),
        )
        .unwrap_err();
    assert!(matches!(error, DeclarationError::NotImplemented { property } if property == "gap"));
}

#[test]
fn test_creating_twice_gives_equal_declarations() {
    let factory = DeclarationFactory::standard();
    let make = || {
        factory
            .create(
                "margin",
                vec![
                    DeclarationValue::new("1px", ValueType::Length),
                    DeclarationValue::new("auto", ValueType::Ident),
                ],
                false,
                SourceLocation::default(),
            )
            .unwrap()
    };
    let (a, b) = (make(), make());
    assert!(a.declaration_equals(&b));
    assert_eq!(a.equivalence_key(false), b.equivalence_key(false));
}

#[test]
fn test_empty_value_is_rejected() {
    let factory = DeclarationFactory::standard();
    let error = factory
        .create("color", Vec::new(), false, SourceLocation::default())
        .unwrap_err();
    assert!(matches!(error, DeclarationError::Empty { .. }));
    assert!(!error.is_fatal());
}
