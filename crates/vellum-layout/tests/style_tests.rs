//! Integration tests for style value types.

use vellum_layout::{ColorValue, DisplayClass, FontStyle, HAlign};

#[test]
fn test_hex_color_with_and_without_hash() {
    assert_eq!(
        ColorValue::from_attribute("#ff0000"),
        Some(ColorValue::rgb(255, 0, 0))
    );
    // Legacy tolerance: authors routinely wrote color=FF0000.
    assert_eq!(
        ColorValue::from_attribute("FF0000"),
        Some(ColorValue::rgb(255, 0, 0))
    );
    assert_eq!(
        ColorValue::from_attribute("#abc"),
        Some(ColorValue::rgb(0xAA, 0xBB, 0xCC))
    );
}

#[test]
fn test_named_colors() {
    assert_eq!(
        ColorValue::from_attribute("Navy"),
        Some(ColorValue::rgb(0, 0, 128))
    );
    assert_eq!(ColorValue::from_attribute("no-such-color"), None);
}

#[test]
fn test_font_size_scale_clamps() {
    let style = FontStyle::DEFAULT.with_size_delta(10);
    assert_eq!(style.size, 7);
    let style = FontStyle::DEFAULT.with_size_delta(-10);
    assert_eq!(style.size, 1);
    let style = FontStyle::DEFAULT.with_size(5);
    assert_eq!(style.size, 5);
}

#[test]
fn test_heading_base_fonts_are_bold_and_scaled() {
    use vellum_layout::FlowStyle;
    let h1 = FlowStyle::Heading(1).base_font();
    let h6 = FlowStyle::Heading(6).base_font();
    assert!(h1.bold && h6.bold);
    assert!(h1.size > FontStyle::DEFAULT.size);
    assert!(h6.size < FontStyle::DEFAULT.size);
}

#[test]
fn test_display_class_ordering_drives_pop_rule() {
    // Inline closes may never cross these; block closes sweep inlines.
    assert!(DisplayClass::Inline < DisplayClass::Block);
    assert!(DisplayClass::Block < DisplayClass::TableCell);
    assert!(DisplayClass::TableCell < DisplayClass::Table);
    assert!(DisplayClass::Table < DisplayClass::Document);

    assert!(DisplayClass::Inline.passes_style());
    assert!(!DisplayClass::TableCell.passes_style());
    assert!(DisplayClass::TableCell.passes_alignment());
    assert!(!DisplayClass::Table.passes_alignment());
}

#[test]
fn test_align_attribute_parsing() {
    assert_eq!(HAlign::from_attribute("CENTER"), HAlign::Center);
    assert_eq!(HAlign::from_attribute(" right "), HAlign::Right);
    assert_eq!(HAlign::from_attribute("bogus"), HAlign::None);
}
