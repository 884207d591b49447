//! Property tests for declaration equality and equivalence.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sift_css::{Declaration, parse_stylesheet};

const LENGTHS: &[&str] = &["0", "0px", "0em", "1px", "1PX", "2px", "1.0px", "auto", "50%"];
const COLORS: &[&str] = &["red", "#f00", "#FF0000", "rgb(255, 0, 0)", "blue", "#00f", "transparent"];
const POSITIONS: &[&str] = &[
    "top", "center", "left", "right", "bottom", "0%", "50%", "100%", "10px",
];

/// `margin` with one to four lengths.
#[derive(Debug, Clone)]
struct Margin(Vec<&'static str>);

impl Arbitrary for Margin {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 4 + 1;
        Self((0..count).map(|_| *g.choose(LENGTHS).unwrap()).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let values = self.0.clone();
        Box::new((1..values.len()).map(move |n| Self(values[..n].to_vec())))
    }
}

/// `margin` with one or two lengths from a pool small enough that equal
/// declarations come up often.
#[derive(Debug, Clone)]
struct NarrowMargin(Vec<&'static str>);

impl Arbitrary for NarrowMargin {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 2 + 1;
        Self((0..count).map(|_| *g.choose(&["0", "1px", "1PX"]).unwrap()).collect())
    }
}

/// A `border` with any subset of width, style and color, in any order.
#[derive(Debug, Clone)]
struct Border(Vec<&'static str>);

impl Arbitrary for Border {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut parts = Vec::new();
        if bool::arbitrary(g) {
            parts.push(*g.choose(&["1px", "thin", "medium"]).unwrap());
        }
        if bool::arbitrary(g) || parts.is_empty() {
            parts.push(*g.choose(&["solid", "dashed", "none"]).unwrap());
        }
        if bool::arbitrary(g) {
            parts.push(*g.choose(COLORS).unwrap());
        }
        if bool::arbitrary(g) {
            parts.reverse();
        }
        Self(parts)
    }
}

/// `background-position` with one or two components.
#[derive(Debug, Clone)]
struct Position(Vec<&'static str>);

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 2 + 1;
        Self((0..count).map(|_| *g.choose(POSITIONS).unwrap()).collect())
    }
}

/// Parse `property: values`; `None` for values the property rejects.
fn declaration(property: &str, values: &[&str]) -> Option<Declaration> {
    let css = format!("a {{ {property}: {} }}", values.join(" "));
    let sheet = parse_stylesheet(&css).ok()?;
    sheet.all_declarations().next().map(|(_, d)| d.clone())
}

#[quickcheck]
fn prop_normalization_is_pure(margin: Margin) -> bool {
    let a = declaration("margin", &margin.0).unwrap();
    let b = declaration("margin", &margin.0).unwrap();
    a.declaration_equals(&b) && a.equivalence_key(false) == b.equivalence_key(false)
}

#[quickcheck]
fn prop_equality_implies_equivalence(a: Margin, b: Margin) -> bool {
    let x = declaration("margin", &a.0).unwrap();
    let y = declaration("margin", &b.0).unwrap();
    !x.declaration_equals(&y) || x.declaration_is_equivalent(&y)
}

#[quickcheck]
fn prop_equality_is_symmetric(a: Border, b: Border) -> bool {
    let (Some(x), Some(y)) = (declaration("border", &a.0), declaration("border", &b.0)) else {
        return true;
    };
    x.declaration_equals(&x) && x.declaration_equals(&y) == y.declaration_equals(&x)
}

#[quickcheck]
fn prop_equality_is_transitive(a: NarrowMargin, b: NarrowMargin, c: NarrowMargin) -> bool {
    let x = declaration("margin", &a.0).unwrap();
    let y = declaration("margin", &b.0).unwrap();
    let z = declaration("margin", &c.0).unwrap();
    !(x.declaration_equals(&y) && y.declaration_equals(&z)) || x.declaration_equals(&z)
}

#[quickcheck]
fn prop_equivalence_is_reflexive_and_symmetric(a: Border, b: Border) -> bool {
    let (Some(x), Some(y)) = (declaration("border", &a.0), declaration("border", &b.0)) else {
        return true;
    };
    x.declaration_is_equivalent(&x) && x.declaration_is_equivalent(&y) == y.declaration_is_equivalent(&x)
}

#[quickcheck]
fn prop_equivalence_is_transitive(a: Position, b: Position, c: Position) -> bool {
    let (Some(x), Some(y), Some(z)) = (
        declaration("background-position", &a.0),
        declaration("background-position", &b.0),
        declaration("background-position", &c.0),
    ) else {
        return true;
    };
    !(x.declaration_is_equivalent(&y) && y.declaration_is_equivalent(&z))
        || x.declaration_is_equivalent(&z)
}

#[quickcheck]
fn prop_shorthand_slots_are_its_individuals(margin: Margin, border: Border) -> bool {
    [declaration("margin", &margin.0), declaration("border", &border.0)]
        .into_iter()
        .flatten()
        .all(|d| d.aggregate_individual_slots().as_ref() == Some(&*d.slots()))
}
