//! Property tests over generated stylesheets.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use sift_css::{SelectorId, parse_stylesheet};
use sift_duplication::{AnalysisOptions, DuplicationDetector, DuplicationKind};

const DECLARATIONS: &[&str] = &[
    "color: red",
    "color: #f00",
    "color: blue",
    "margin: 0",
    "margin: 0px 0 0 0",
    "margin: 1px",
    "margin-top: 0",
    "padding: 1px 2px",
    "padding: 1px 2px 1px",
    "background-position: top",
    "background-position: center top",
];

/// A stylesheet of up to five rules `.s0` to `.s4`, each with up to three
/// declarations from a small pool.
#[derive(Debug, Clone)]
struct Rules(Vec<Vec<&'static str>>);

impl Arbitrary for Rules {
    fn arbitrary(g: &mut Gen) -> Self {
        let rules = usize::arbitrary(g) % 5 + 1;
        Self(
            (0..rules)
                .map(|_| {
                    let count = usize::arbitrary(g) % 4;
                    (0..count).map(|_| *g.choose(DECLARATIONS).unwrap()).collect()
                })
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let rules = self.0.clone();
        Box::new((1..rules.len()).map(move |n| Self(rules[..n].to_vec())))
    }
}

impl Rules {
    fn css(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(i, declarations)| format!(".s{i} {{ {} }}\n", declarations.join("; ")))
            .collect()
    }
}

#[quickcheck]
fn prop_declaration_instances_share_declarations(rules: Rules) -> bool {
    let mut sheet = parse_stylesheet(&rules.css()).unwrap();
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let identical = detector.find_identical_declarations().clone();
    let equivalent = detector.find_equivalent_declarations().clone();
    let sheet = detector.stylesheet();

    let identical_ok = identical.iter().all(|instance| {
        let first = sheet.declaration(instance.declarations[0].id()).unwrap();
        instance.selectors.len() >= 2
            && instance.declarations.iter().all(|r| {
                first.declaration_equals(sheet.declaration(r.id()).unwrap())
            })
    });
    let equivalent_ok = equivalent.iter().all(|instance| {
        let first = sheet.declaration(instance.declarations[0].id()).unwrap();
        let all_equivalent = instance.declarations.iter().all(|r| {
            first.declaration_is_equivalent(sheet.declaration(r.id()).unwrap())
        });
        let all_equal = instance.declarations.iter().all(|r| {
            first.declaration_equals(sheet.declaration(r.id()).unwrap())
        });
        instance.selectors.len() >= 2 && all_equivalent && !all_equal
    });
    identical_ok && equivalent_ok
}

#[quickcheck]
fn prop_unrelated_selectors_are_never_linked(rules: Rules) -> bool {
    let mut sheet = parse_stylesheet(&rules.css()).unwrap();
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let mut linked = detector.find_identical_declarations().clone();
    linked.extend(detector.find_equivalent_declarations().iter().cloned());
    let sheet = detector.stylesheet();

    let shares = |a: SelectorId, b: SelectorId| {
        sheet.declarations_of(a).any(|(x, _)| {
            sheet
                .declarations_of(b)
                .any(|(y, _)| sheet.declarations_equivalent(x, y))
        })
    };
    let count = sheet.selector_count();
    (0..count).all(|a| {
        (0..count).filter(|&b| b != a).all(|b| {
            let (a, b) = (SelectorId(a), SelectorId(b));
            shares(a, b) || !linked.iter().any(|instance| instance.links(a, b))
        })
    })
}

#[quickcheck]
fn prop_passes_are_deterministic(rules: Rules) -> bool {
    let css = rules.css();
    let run = || {
        let mut sheet = parse_stylesheet(&css).unwrap();
        let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
        detector.run_all().unwrap()
    };
    let (first, second) = (run(), run());
    first == second
        && first.count(DuplicationKind::IdenticalSelectors) == 0
}
