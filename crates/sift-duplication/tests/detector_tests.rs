//! Integration tests for the duplication passes.

use std::collections::BTreeSet;

use sift_css::{SelectorId, StyleSheet, parse_stylesheet};
use sift_dom::{DomTree, NodeId};
use sift_duplication::{
    AnalysisOptions, DeclarationRef, DuplicationDetector, DuplicationKind, FrequentItemset,
    ItemSet, analyze,
};

/// Route pass logs to the test harness; `RUST_LOG=debug` shows them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sheet(css: &str) -> StyleSheet {
    init_tracing();
    parse_stylesheet(css).unwrap()
}

fn ids(ids: &[usize]) -> BTreeSet<SelectorId> {
    ids.iter().map(|&i| SelectorId(i)).collect()
}

#[test]
fn test_identical_declarations_across_selectors() {
    let mut sheet = sheet(".a { color: red; margin: 0 } .b { color: red } .c { color: blue }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let found = detector.find_identical_declarations().clone();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DuplicationKind::IdenticalDeclarations);
    assert_eq!(found[0].selectors, ids(&[0, 1]));
    assert_eq!(found[0].declarations.len(), 2);
    assert!(detector.find_equivalent_declarations().is_empty());
}

#[test]
fn test_same_selector_repeats_are_not_reported() {
    let mut sheet = sheet(".a { color: red; color: red }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    assert!(detector.find_identical_declarations().is_empty());
}

#[test]
fn test_equivalent_declarations_exclude_identical_classes() {
    let mut sheet = sheet(
        ".a { margin: 10px } .b { margin: 10px 10px 10px 10px } \
         .c { color: red } .d { color: red }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let equivalent = detector.find_equivalent_declarations().clone();
    assert_eq!(equivalent.len(), 1);
    assert_eq!(equivalent[0].selectors, ids(&[0, 1]));
    let identical = detector.find_identical_declarations();
    assert_eq!(identical.len(), 1);
    assert_eq!(identical[0].selectors, ids(&[2, 3]));
}

#[test]
fn test_equivalent_declarations_skip_identical_pairs() {
    let mut sheet = sheet(".a { color: red } .b { color: red } .c { color: #f00 }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let identical = detector.find_identical_declarations().clone();
    assert_eq!(identical.len(), 1);
    assert_eq!(identical[0].selectors, ids(&[0, 1]));

    let equivalent = detector.find_equivalent_declarations().clone();
    let pairs: Vec<_> = equivalent.iter().map(|i| i.selectors.clone()).collect();
    assert_eq!(pairs, vec![ids(&[0, 2]), ids(&[1, 2])]);
    assert!(equivalent.iter().all(|i| i.declarations.len() == 2));
    assert!(
        !equivalent
            .iter()
            .any(|i| i.links(SelectorId(0), SelectorId(1)))
    );
}

#[test]
fn test_background_position_keyword_and_pair_are_equivalent() {
    let mut sheet =
        sheet(".a { background-position: top } .b { background-position: top center }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    assert_eq!(detector.find_equivalent_declarations().len(), 1);
    assert!(detector.find_identical_declarations().is_empty());
}

#[test]
fn test_no_shared_declarations_means_no_link() {
    let mut sheet = sheet(".a { color: red; padding: 1px } .b { color: blue; margin: 1px }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let a = SelectorId(0);
    let b = SelectorId(1);
    assert!(!detector.find_identical_declarations().iter().any(|i| i.links(a, b)));
    assert!(!detector.find_equivalent_declarations().iter().any(|i| i.links(a, b)));
}

#[test]
fn test_media_context_separates_declarations() {
    let css = ".a { color: red } @media print { .b { color: red } }";
    let mut sheet_with_media = sheet(css);
    let mut detector = DuplicationDetector::new(&mut sheet_with_media, AnalysisOptions::default());
    assert!(detector.find_identical_declarations().is_empty());

    let mut sheet_without_media = sheet(css);
    let options = AnalysisOptions {
        consider_media_queries: false,
        ..AnalysisOptions::default()
    };
    let mut detector = DuplicationDetector::new(&mut sheet_without_media, options);
    assert_eq!(detector.find_identical_declarations().len(), 1);
}

#[test]
fn test_vendor_prefixes_can_be_ignored() {
    let css = ".a { -webkit-transition: opacity 1s } .b { transition: opacity 1s }";
    let mut strict = sheet(css);
    let mut detector = DuplicationDetector::new(&mut strict, AnalysisOptions::default());
    assert!(detector.find_identical_declarations().is_empty());

    let mut relaxed = sheet(css);
    let options = AnalysisOptions {
        ignore_vendor_prefixes: true,
        ..AnalysisOptions::default()
    };
    let mut detector = DuplicationDetector::new(&mut relaxed, options);
    assert_eq!(detector.find_identical_declarations().len(), 1);
    let (_, item) = detector.items().items_for_property("transition").next().unwrap();
    assert_eq!(item.support, ids(&[0, 1]));
}

#[test]
fn test_prefixed_shorthand_matches_unprefixed_longhands() {
    let css = ".a { transition-property: opacity; transition-duration: 1s; \
               transition-timing-function: ease; transition-delay: 0s }\n\
               .b { -webkit-transition: opacity 1s }\n\
               .c { transition: opacity 1s }";
    let mut strict = sheet(css);
    let mut detector = DuplicationDetector::new(&mut strict, AnalysisOptions::default());
    let found: Vec<_> = detector
        .find_shorthand_duplications()
        .iter()
        .map(|i| i.selectors.clone())
        .collect();
    assert_eq!(found, vec![ids(&[0, 2])]);

    let mut relaxed = sheet(css);
    let options = AnalysisOptions {
        ignore_vendor_prefixes: true,
        ..AnalysisOptions::default()
    };
    let mut detector = DuplicationDetector::new(&mut relaxed, options);
    let found: BTreeSet<_> = detector
        .find_shorthand_duplications()
        .iter()
        .map(|i| i.selectors.clone())
        .collect();
    assert_eq!(found, BTreeSet::from([ids(&[0, 1]), ids(&[0, 2])]));
}

#[test]
fn test_shorthand_duplicates_longhands() {
    let mut sheet = sheet(
        ".a { border-color: red; border-width: 2px; border-style: solid }\n\
         .b { border: 2px solid red }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let found = detector.find_shorthand_duplications().clone();
    assert_eq!(found.len(), 1);
    let instance = &found[0];
    assert_eq!(instance.kind, DuplicationKind::ShorthandDeclarations);
    assert_eq!(instance.selectors, ids(&[0, 1]));

    let DeclarationRef::Authored(shorthand) = instance.declarations[0] else {
        panic!("expected the authored shorthand first");
    };
    let sheet = detector.stylesheet();
    let shorthand = sheet.declaration(shorthand).unwrap();
    assert_eq!(shorthand.property(), "border");
    assert_eq!(shorthand.selector(), Some(SelectorId(1)));

    let DeclarationRef::Virtual {
        selector,
        declaration,
    } = instance.declarations[1]
    else {
        panic!("expected the virtual shorthand second");
    };
    assert_eq!(selector, SelectorId(0));
    let composed = sheet.declaration(declaration).unwrap();
    assert!(composed.is_virtual());
    assert!(composed.values().is_empty());
    assert_eq!(composed.individuals().unwrap().len(), 3);
    assert_eq!(
        sheet.selector(SelectorId(0)).unwrap().virtual_declarations(),
        &[declaration]
    );
    assert_eq!(instance.declarations.len(), 5);
}

#[test]
fn test_partial_longhands_do_not_match_a_full_shorthand() {
    let mut sheet = sheet(".a { margin-top: 1px; margin-left: 1px } .b { margin: 1px }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    assert!(detector.find_shorthand_duplications().is_empty());
    assert!(
        detector
            .stylesheet()
            .selector(SelectorId(0))
            .unwrap()
            .virtual_declarations()
            .is_empty()
    );
}

#[test]
fn test_shorthand_matches_equivalent_longhands() {
    let mut sheet = sheet(
        ".a { margin-top: 0; margin-right: 0px; margin-bottom: 0em; margin-left: 0 }\n\
         .b { margin: 0 }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    assert_eq!(detector.find_shorthand_duplications().len(), 1);
}

#[test]
fn test_identical_selectors() {
    let mut sheet = sheet(
        ".menu > li.active { color: red }\n\
         p { margin: 0 }\n\
         .menu>li.active { padding: 0 }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let found = detector.find_identical_selectors();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].selectors, ids(&[0, 2]));
    assert!(found[0].declarations.is_empty());
}

#[test]
fn test_identical_groupings_and_media() {
    let css = "h1, h2 { color: red } h2, h1 { margin: 0 } @media print { h1, h2 { padding: 0 } }";
    let mut with_media = sheet(css);
    let mut detector = DuplicationDetector::new(&mut with_media, AnalysisOptions::default());
    assert_eq!(detector.find_identical_selectors()[0].selectors, ids(&[0, 1]));

    let mut without_media = sheet(css);
    let options = AnalysisOptions {
        consider_media_queries: false,
        ..AnalysisOptions::default()
    };
    let mut detector = DuplicationDetector::new(&mut without_media, options);
    assert_eq!(detector.find_identical_selectors()[0].selectors, ids(&[0, 1, 2]));
}

/// ```text
/// <html><body>
///   <ul class="menu"><li class="active">A</li><li>B</li></ul>
///   <p id="intro">hi</p>
/// </body></html>
/// ```
fn document() -> DomTree {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    let ul = tree.append_element(body, "ul", &[("class", "menu")]);
    let li = tree.append_element(ul, "li", &[("class", "active")]);
    let _ = tree.append_text(li, "A");
    let li = tree.append_element(ul, "li", &[]);
    let _ = tree.append_text(li, "B");
    let p = tree.append_element(body, "p", &[("id", "intro")]);
    let _ = tree.append_text(p, "hi");
    tree
}

#[test]
fn test_equivalent_selectors_over_document() {
    let mut sheet = sheet(
        "li:first-child { color: red }\n\
         .menu .active { color: blue }\n\
         li:hover { color: green }\n\
         #intro { margin: 0 }\n\
         body > p { margin: 1px }\n\
         li:first-child { padding: 0 }\n\
         table { border: 0 }",
    );
    let tree = document();
    let mut detector =
        DuplicationDetector::new(&mut sheet, AnalysisOptions::default()).with_document(&tree);
    let found = detector.find_equivalent_selectors().clone();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].kind, DuplicationKind::EquivalentSelectors);
    assert_eq!(found[0].selectors, ids(&[0, 1, 5]));
    assert_eq!(found[1].selectors, ids(&[3, 4]));
    assert!(detector.matched_nodes(SelectorId(2)).is_err());
}

#[test]
fn test_identical_selectors_alone_are_not_equivalent_selectors() {
    let mut sheet = sheet("li { color: red } li { margin: 0 }");
    let tree = document();
    let mut detector =
        DuplicationDetector::new(&mut sheet, AnalysisOptions::default()).with_document(&tree);
    assert!(detector.find_equivalent_selectors().is_empty());
    assert_eq!(detector.find_identical_selectors().len(), 1);
}

#[test]
fn test_equivalent_selectors_need_a_document() {
    let mut sheet = sheet("li:first-child { color: red } .active { color: blue }");
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    assert!(detector.find_equivalent_selectors().is_empty());
}

#[test]
fn test_items_and_mining_contract() {
    let mut sheet = sheet(
        ".a { color: red; margin: 0 }\n\
         .b { color: #f00; margin: 0 }\n\
         .c { color: red; padding: 2px }\n\
         .d { padding: 2px }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());

    let co_occurring = |transactions: &[ItemSet], min_support: usize| -> Vec<FrequentItemset> {
        let mut found = Vec::new();
        for (i, first) in transactions.iter().enumerate() {
            for second in &transactions[i + 1..] {
                let items: BTreeSet<_> = first.items.intersection(&second.items).copied().collect();
                if items.len() < 2 {
                    continue;
                }
                let support: BTreeSet<_> = transactions
                    .iter()
                    .filter(|t| items.is_subset(&t.items))
                    .map(|t| t.selector)
                    .collect();
                let itemset = FrequentItemset { items, support };
                if itemset.support.len() >= min_support && !found.contains(&itemset) {
                    found.push(itemset);
                }
            }
        }
        found
    };
    let frequent = detector.mine_frequent_itemsets(&co_occurring);
    assert_eq!(frequent.len(), 1);
    assert_eq!(frequent[0].support, ids(&[0, 1]));

    let items = detector.items();
    let (_, color) = items.items_for_property("color").next().unwrap();
    assert_eq!(color.support, ids(&[0, 1, 2]));
    assert_eq!(
        color.kinds,
        BTreeSet::from([
            DuplicationKind::IdenticalDeclarations,
            DuplicationKind::EquivalentDeclarations
        ])
    );
    let sets = items.item_sets(3);
    assert_eq!(sets.len(), 3);
    assert!(sets.iter().all(|set| set.items.len() == 1));
}

#[test]
fn test_run_all_report() {
    let mut sheet = sheet(
        ".a { color: red } .b { color: red } .a { margin: 0 }\n\
         .x { border-width: 1px; border-style: solid; border-color: blue }\n\
         .y { border: 1px solid blue }",
    );
    let mut detector = DuplicationDetector::new(&mut sheet, AnalysisOptions::default());
    let report = detector.run_all().unwrap();
    assert_eq!(report.count(DuplicationKind::IdenticalDeclarations), 1);
    assert_eq!(report.count(DuplicationKind::ShorthandDeclarations), 1);
    assert_eq!(report.count(DuplicationKind::IdenticalSelectors), 1);
    assert_eq!(report.count(DuplicationKind::EquivalentSelectors), 0);
    assert_eq!(report.counts.len(), 5);
    let first = &report.instances[0];
    assert_eq!(first.selectors, vec![".a".to_string(), ".b".to_string()]);

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["counts"]["IdenticalDeclarations"], 1);
}

#[test]
fn test_analyze_rejects_bad_input() {
    assert!(analyze("@media print { a { color: red }", AnalysisOptions::default()).is_err());
    let options = AnalysisOptions {
        min_support: 0,
        ..AnalysisOptions::default()
    };
    assert!(analyze("a { color: red }", options).is_err());
}
