//! Integration tests for building a stylesheet from CSS text.

use sift_css::{CssError, DeclarationError, SelectorKind, parse_stylesheet};

#[test]
fn test_rules_and_declarations_in_document_order() {
    let sheet = parse_stylesheet(
        "/* header */\n\
         h1 { color: red; margin: 0 }\n\
         .menu > li { padding: 1px 2px; }\n",
    )
    .unwrap();
    assert_eq!(sheet.selector_count(), 2);
    let properties: Vec<&str> = sheet.all_declarations().map(|(_, d)| d.property()).collect();
    assert_eq!(properties, vec!["color", "margin", "padding"]);

    let (id, entry) = sheet.all_selectors().nth(1).unwrap();
    assert_eq!(entry.text(), ".menu > li");
    assert_eq!(entry.location().line, 3);
    assert!(matches!(entry.kind(), SelectorKind::Base(_)));
    let (_, padding) = sheet.declarations_of(id).next().unwrap();
    assert_eq!(padding.selector(), Some(id));
}

#[test]
fn test_media_context_is_recorded() {
    let sheet = parse_stylesheet(
        "a { color: red }\n\
         @media screen and (max-width: 600px) {\n\
           @media  PRINT { a { color: red } }\n\
           b { color: blue }\n\
         }",
    )
    .unwrap();
    let media: Vec<Vec<String>> = sheet
        .all_selectors()
        .map(|(_, entry)| entry.media().clone())
        .collect();
    assert_eq!(
        media,
        vec![
            Vec::<String>::new(),
            vec!["screen and (max-width: 600px)".to_string(), "print".to_string()],
            vec!["screen and (max-width: 600px)".to_string()],
        ]
    );
    let ids: Vec<_> = sheet.all_declarations().map(|(id, _)| id).collect();
    assert!(!sheet.declarations_equal(ids[0], ids[1]));
    assert!(
        sheet
            .declaration(ids[0])
            .unwrap()
            .declaration_equals(sheet.declaration(ids[1]).unwrap())
    );
}

#[test]
fn test_important_is_stripped_from_values() {
    let sheet = parse_stylesheet("a { color: red ! IMPORTANT; width: 1px }").unwrap();
    let declarations: Vec<_> = sheet.all_declarations().map(|(_, d)| d).collect();
    assert!(declarations[0].is_important());
    assert_eq!(declarations[0].values().len(), 1);
    assert!(!declarations[1].is_important());
}

#[test]
fn test_invalid_declarations_are_dropped() {
    let sheet = parse_stylesheet("a { margin: 1px, 2px; color: red; width: \"unterminated\n }").unwrap();
    let properties: Vec<&str> = sheet.all_declarations().map(|(_, d)| d.property()).collect();
    assert_eq!(properties, vec!["color"]);
}

#[test]
fn test_unparseable_selector_skips_its_rule() {
    let sheet = parse_stylesheet("a > { color: red } p { color: blue }").unwrap();
    let texts: Vec<&str> = sheet.all_selectors().map(|(_, e)| e.text()).collect();
    assert_eq!(texts, vec!["p"]);
}

#[test]
fn test_other_at_rules_are_skipped() {
    let sheet = parse_stylesheet(
        "@import url(x.css);\n\
         @font-face { font-family: X; src: url(x.woff) }\n\
         @supports (display: grid) { a { color: red } }\n\
         p { color: blue }",
    )
    .unwrap();
    let texts: Vec<&str> = sheet.all_selectors().map(|(_, e)| e.text()).collect();
    assert_eq!(texts, vec!["p"]);
}

#[test]
fn test_grouping_keeps_members() {
    let sheet = parse_stylesheet("h1, h2,h3 { margin: 0 }").unwrap();
    let (_, entry) = sheet.all_selectors().next().unwrap();
    assert!(entry.is_grouping());
    assert_eq!(entry.base_selectors().len(), 3);
    assert_eq!(sheet.all_base_selectors().count(), 0);
}

#[test]
fn test_unclosed_media_block_is_an_error() {
    let error = parse_stylesheet("@media print { a { color: red }").unwrap_err();
    assert!(matches!(error, CssError::Parse { .. }));
}

#[test]
fn test_fatal_declaration_aborts_with_location() {
    let error = parse_stylesheet("a {\n  quotes: \"a\" \"b\" \"c\";\n}").unwrap_err();
    match error {
        CssError::Declaration { line, source, .. } => {
            assert_eq!(line, 2);
            assert!(matches!(source, DeclarationError::OddArity { count: 3, .. }));
        }
        CssError::Parse { .. } => panic!("expected a declaration error"),
    }
}
