//! Integration tests for selector parsing, equality and XPath translation.

use sift_css::selector::{
    AttributeSelector, Combinator, Nth, PseudoClass, SimpleSelector, Specificity, parse_selector,
    parse_selector_list,
};
use sift_css::parse_stylesheet;
use sift_dom::{DomTree, NodeId, query_document};

#[test]
fn test_parse_compound_with_combinators() {
    let selector = parse_selector(".menu > li.active").unwrap();
    assert_eq!(selector.combinators.len(), 1);
    assert_eq!(selector.combinators[0].0, Combinator::Child);
    assert!(
        selector
            .subject
            .simple_selectors
            .contains(&SimpleSelector::Class("active".to_string()))
    );
    assert_eq!(selector.calculate_specificity(), Specificity(0, 2, 1));
}

#[test]
fn test_type_selectors_are_case_insensitive() {
    let upper = parse_selector("DIV P").unwrap();
    let lower = parse_selector("div p").unwrap();
    assert!(upper.selector_equals(&lower));
}

#[test]
fn test_compound_order_does_not_matter() {
    let a = parse_selector("a.x#y[href]").unwrap();
    let b = parse_selector("a[href]#y.x").unwrap();
    assert!(a.selector_equals(&b));
    assert!(!a.selector_equals(&parse_selector("a.x#y").unwrap()));
}

#[test]
fn test_combinators_distinguish_selectors() {
    let child = parse_selector("ul > li").unwrap();
    let descendant = parse_selector("ul li").unwrap();
    assert!(!child.selector_equals(&descendant));
}

#[test]
fn test_attribute_operators() {
    let selector = parse_selector("a[href^=\"http\"][lang|=en][data-x]").unwrap();
    let attributes: Vec<&AttributeSelector> = selector
        .subject
        .simple_selectors
        .iter()
        .filter_map(|s| match s {
            SimpleSelector::Attribute(attribute) => Some(attribute),
            _ => None,
        })
        .collect();
    assert_eq!(attributes.len(), 3);
    assert!(
        attributes
            .iter()
            .any(|a| matches!(a, AttributeSelector::PrefixMatch(name, value) if name == "href" && value == "http"))
    );
}

#[test]
fn test_nth_child_forms() {
    let selector = parse_selector("li:nth-child(2n+1)").unwrap();
    assert!(
        selector
            .subject
            .simple_selectors
            .contains(&SimpleSelector::PseudoClass(PseudoClass::NthChild(Nth { a: 2, b: 1 })))
    );
    let odd = parse_selector("li:nth-child(odd)").unwrap();
    assert!(selector.selector_equals(&odd));
}

#[test]
fn test_selector_list_and_errors() {
    let list = parse_selector_list("h1, h2 , .title").unwrap();
    assert_eq!(list.len(), 3);
    assert!(parse_selector("> a").is_err());
    assert!(parse_selector("a >").is_err());
    assert!(parse_selector("a[href").is_err());
}

#[test]
fn test_groupings_compare_as_sets() {
    let sheet = parse_stylesheet("h1, h2 { color: red } h2, h1 { color: blue } @media print { h1, h2 { margin: 0 } }")
        .unwrap();
    let entries: Vec<_> = sheet.all_selectors().map(|(_, e)| e).collect();
    assert!(entries[0].is_grouping());
    assert!(entries[0].selector_equals(entries[1], true));
    assert!(!entries[0].selector_equals(entries[2], true));
    assert!(entries[0].selector_equals(entries[2], false));
}

#[test]
fn test_xpath_shapes() {
    let selector = parse_selector("ul.menu > li").unwrap();
    assert_eq!(
        selector.to_xpath().unwrap(),
        "//ul[contains(concat(' ', normalize-space(@class), ' '), ' menu ')]/li"
    );
    assert!(parse_selector("a:hover").unwrap().to_xpath().is_err());
    assert!(parse_selector("p::first-line").unwrap().to_xpath().is_err());
}

/// Builds:
/// ```text
/// <html><body>
///   <ul class="menu">
///     <li class="active">A</li><li>B</li><li lang="en-US">C</li>
///   </ul>
///   <p id="intro">hi</p><p></p>
/// </body></html>
/// ```
fn sample() -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    let ul = tree.append_element(body, "ul", &[("class", "menu")]);
    let li1 = tree.append_element(ul, "li", &[("class", "active")]);
    let _ = tree.append_text(li1, "A");
    let li2 = tree.append_element(ul, "li", &[]);
    let _ = tree.append_text(li2, "B");
    let li3 = tree.append_element(ul, "li", &[("lang", "en-US")]);
    let _ = tree.append_text(li3, "C");
    let p1 = tree.append_element(body, "p", &[("id", "intro")]);
    let _ = tree.append_text(p1, "hi");
    let p2 = tree.append_element(body, "p", &[]);
    (tree, vec![ul, li1, li2, li3, p1, p2])
}

fn select(tree: &DomTree, selector: &str) -> Vec<NodeId> {
    let xpath = parse_selector(selector).unwrap().to_xpath().unwrap();
    query_document(tree, &xpath).unwrap_or_else(|e| panic!("{xpath}: {e}"))
}

#[test]
fn test_xpath_matches_document() {
    let (tree, ids) = sample();
    let [ul, li1, li2, li3, p1, p2] = ids[..] else {
        unreachable!()
    };
    assert_eq!(select(&tree, ".menu > li.active"), vec![li1]);
    assert_eq!(select(&tree, "ul li"), vec![li1, li2, li3]);
    assert_eq!(select(&tree, "li + li"), vec![li2, li3]);
    assert_eq!(select(&tree, "li.active ~ li"), vec![li2, li3]);
    assert_eq!(select(&tree, "li:first-child"), vec![li1]);
    assert_eq!(select(&tree, "li:last-child"), vec![li3]);
    assert_eq!(select(&tree, "li:nth-child(2)"), vec![li2]);
    assert_eq!(select(&tree, "li:not(.active)"), vec![li2, li3]);
    assert_eq!(select(&tree, "[lang|=en]"), vec![li3]);
    assert_eq!(select(&tree, "#intro"), vec![p1]);
    assert_eq!(select(&tree, "p:empty"), vec![p2]);
    assert_eq!(select(&tree, "ul > p"), Vec::<NodeId>::new());
    assert_eq!(select(&tree, "body > ul"), vec![ul]);
}

#[test]
fn test_different_selectors_can_match_the_same_elements() {
    let (tree, _) = sample();
    assert_eq!(select(&tree, "li:first-child"), select(&tree, "li.active"));
    assert_ne!(select(&tree, "li:first-child"), select(&tree, "li"));
}
