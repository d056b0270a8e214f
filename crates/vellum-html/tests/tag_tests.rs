//! Integration tests for tag-string parsing.

use vellum_html::{LengthAttr, ParsedTag};

#[test]
fn test_bare_tag() {
    let tag = ParsedTag::parse("p").unwrap();
    assert_eq!(tag.name, "p");
    assert!(!tag.is_close);
    assert!(tag.attrs.is_empty());
}

#[test]
fn test_close_tag() {
    let tag = ParsedTag::parse("/table").unwrap();
    assert_eq!(tag.name, "table");
    assert!(tag.is_close);
}

#[test]
fn test_name_is_lowercased() {
    let tag = ParsedTag::parse("TABLE Border=1").unwrap();
    assert_eq!(tag.name, "table");
    assert_eq!(tag.get("border"), Some("1"));
}

#[test]
fn test_unquoted_attribute() {
    let tag = ParsedTag::parse("p align=center").unwrap();
    assert_eq!(tag.get("align"), Some("center"));
}

#[test]
fn test_quoted_attribute_with_spaces() {
    let tag = ParsedTag::parse(r#"img alt="a b c" src='x.gif'"#).unwrap();
    assert_eq!(tag.get("alt"), Some("a b c"));
    assert_eq!(tag.get("src"), Some("x.gif"));
}

#[test]
fn test_first_occurrence_wins() {
    let tag = ParsedTag::parse("p align=left align=right").unwrap();
    assert_eq!(tag.get("align"), Some("left"));
}

#[test]
fn test_boolean_attribute_by_presence() {
    let tag = ParsedTag::parse("td nowrap").unwrap();
    assert!(tag.has("nowrap"));
    assert_eq!(tag.get("nowrap"), Some(""));
    assert!(!tag.has("selected"));
}

#[test]
fn test_value_keeps_later_equals() {
    let tag = ParsedTag::parse("a href=x?a=1").unwrap();
    assert_eq!(tag.get("href"), Some("x?a=1"));
}

#[test]
fn test_self_closing_slash_ignored() {
    let tag = ParsedTag::parse("br/").unwrap();
    assert_eq!(tag.name, "br");
    let tag = ParsedTag::parse("hr /").unwrap();
    assert_eq!(tag.name, "hr");
    assert!(tag.attrs.is_empty());
}

#[test]
fn test_empty_body_is_none() {
    assert!(ParsedTag::parse("").is_none());
    assert!(ParsedTag::parse("/").is_none());
    assert!(ParsedTag::parse("   ").is_none());
}

#[test]
fn test_numeric_clamping() {
    let tag = ParsedTag::parse("table border=99999 cellspacing=junk").unwrap();
    assert_eq!(tag.get_u32("border", 100), Some(100));
    assert_eq!(tag.get_u32("cellspacing", 100), None);
}

#[test]
fn test_trailing_junk_after_digits() {
    let tag = ParsedTag::parse("img width=120px").unwrap();
    assert_eq!(tag.get_length("width"), Some(LengthAttr::Pixels(120.0)));
}

#[test]
fn test_length_percent() {
    let tag = ParsedTag::parse("td width=50%").unwrap();
    assert_eq!(tag.get_length("width"), Some(LengthAttr::Percent(50)));
}

#[test]
fn test_percent_clamped_to_100() {
    let tag = ParsedTag::parse("td width=250%").unwrap();
    assert_eq!(tag.get_length("width"), Some(LengthAttr::Percent(100)));
}

#[test]
fn test_relative_font_size() {
    let tag = ParsedTag::parse("font size=+2").unwrap();
    assert_eq!(tag.get_i32("size"), Some((2, true)));
    let tag = ParsedTag::parse("font size=-1").unwrap();
    assert_eq!(tag.get_i32("size"), Some((-1, true)));
    let tag = ParsedTag::parse("font size=5").unwrap();
    assert_eq!(tag.get_i32("size"), Some((5, false)));
}
