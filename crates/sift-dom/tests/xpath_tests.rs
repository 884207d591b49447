//! Integration tests for the DOM tree and XPath evaluation.

use sift_dom::{DomTree, NodeId, XPathError, query_document, xpath::compile};

/// Builds:
/// ```text
/// <html><body>
///   <ul class="menu main">
///     <li class="active">A</li><li>B</li><li class="x">C</li>
///   </ul>
///   <p id="intro">hi</p><div></div>
/// </body></html>
/// ```
fn sample() -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    let ul = tree.append_element(body, "ul", &[("class", "menu main")]);
    let li1 = tree.append_element(ul, "li", &[("class", "active")]);
    let _ = tree.append_text(li1, "A");
    let li2 = tree.append_element(ul, "li", &[]);
    let _ = tree.append_text(li2, "B");
    let li3 = tree.append_element(ul, "li", &[("class", "x")]);
    let _ = tree.append_text(li3, "C");
    let p = tree.append_element(body, "p", &[("id", "intro")]);
    let _ = tree.append_text(p, "hi");
    let div = tree.append_element(body, "div", &[]);
    (tree, vec![html, body, ul, li1, li2, li3, p, div])
}

#[test]
fn test_descendant_name_test() {
    let (tree, ids) = sample();
    let result = query_document(&tree, "//li").unwrap();
    assert_eq!(result, vec![ids[3], ids[4], ids[5]]);
}

#[test]
fn test_child_path() {
    let (tree, ids) = sample();
    assert_eq!(query_document(&tree, "/html/body/p").unwrap(), vec![ids[6]]);
    assert!(query_document(&tree, "/html/p").unwrap().is_empty());
}

#[test]
fn test_class_contains_idiom() {
    let (tree, ids) = sample();
    let xpath = "//*[contains(concat(' ', normalize-space(@class), ' '), ' menu ')]";
    assert_eq!(query_document(&tree, xpath).unwrap(), vec![ids[2]]);
}

#[test]
fn test_attribute_equality_and_existence() {
    let (tree, ids) = sample();
    assert_eq!(query_document(&tree, "//*[@id = 'intro']").unwrap(), vec![ids[6]]);
    assert_eq!(query_document(&tree, "//li[@class]").unwrap(), vec![ids[3], ids[5]]);
}

#[test]
fn test_positional_predicates() {
    let (tree, ids) = sample();
    assert_eq!(query_document(&tree, "//li[1]").unwrap(), vec![ids[3]]);
    assert_eq!(query_document(&tree, "//li[last()]").unwrap(), vec![ids[5]]);
    assert_eq!(
        query_document(&tree, "//li[not(preceding-sibling::*)]").unwrap(),
        vec![ids[3]]
    );
}

#[test]
fn test_sibling_axes() {
    let (tree, ids) = sample();
    assert_eq!(
        query_document(&tree, "//ul/following-sibling::*[1][self::p]").unwrap(),
        vec![ids[6]]
    );
    assert_eq!(query_document(&tree, "//ul/following-sibling::div").unwrap(), vec![ids[7]]);
    assert_eq!(
        query_document(&tree, "//li[preceding-sibling::li[@class = 'active']]").unwrap(),
        vec![ids[4], ids[5]]
    );
}

#[test]
fn test_empty_element_predicate() {
    let (tree, ids) = sample();
    assert_eq!(
        query_document(&tree, "//*[not(*) and not(text())]").unwrap(),
        vec![ids[7]]
    );
}

#[test]
fn test_arithmetic_nth_child() {
    let (tree, ids) = sample();
    let odd = "//li[(count(preceding-sibling::*) + 1) mod 2 = 1]";
    assert_eq!(query_document(&tree, odd).unwrap(), vec![ids[3], ids[5]]);
}

#[test]
fn test_suffix_match_idiom() {
    let (tree, ids) = sample();
    let xpath = "//*[substring(@class, string-length(@class) - string-length('ain') + 1) = 'ain']";
    assert_eq!(query_document(&tree, xpath).unwrap(), vec![ids[2]]);
}

#[test]
fn test_union_is_document_ordered() {
    let (tree, ids) = sample();
    assert_eq!(query_document(&tree, "//p | //ul").unwrap(), vec![ids[2], ids[6]]);
}

#[test]
fn test_malformed_expression_is_syntax_error() {
    let (tree, _) = sample();
    assert!(matches!(
        query_document(&tree, "//li[@class"),
        Err(XPathError::Syntax { .. })
    ));
    assert!(matches!(compile("//li]"), Err(XPathError::Syntax { .. })));
}

#[test]
fn test_unknown_function_fails() {
    let (tree, _) = sample();
    assert_eq!(
        query_document(&tree, "//li[matches(@class, 'a')]"),
        Err(XPathError::UnsupportedFunction("matches".to_string()))
    );
}

#[test]
fn test_scalar_result_is_not_node_set() {
    let (tree, _) = sample();
    assert_eq!(query_document(&tree, "count(//li)"), Err(XPathError::NotANodeSet));
}

#[test]
fn test_document_order_and_text_content() {
    let (tree, ids) = sample();
    let order = tree.document_order();
    assert!(order[ids[3].0] < order[ids[4].0]);
    assert_eq!(tree.text_content(ids[2]), "ABC");
    assert_eq!(tree.following_siblings(ids[3]), &[ids[4], ids[5]]);
    assert_eq!(tree.preceding_siblings(ids[5]).collect::<Vec<_>>(), vec![ids[4], ids[3]]);
}
