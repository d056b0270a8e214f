//! Integration tests for the print driver.

use vellum_engine::{Engine, StreamStatus};
use vellum_layout::paint::print::PrintPainter;
use vellum_layout::{DisplayCommand, Painter, Rect};

fn parse(html: &str) -> Engine {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.write(html).unwrap();
    engine.end(StreamStatus::Ok);
    engine.parse_all();
    engine
}

fn long_document() -> Engine {
    let mut html = String::new();
    for i in 0..200 {
        html.push_str(&format!("<p>paragraph {i} with some words in it</p>"));
    }
    parse(&html)
}

#[test]
fn test_page_count_matches_print() {
    let mut engine = long_document();
    let painter = PrintPainter::letter();
    let count = engine.page_count(&painter, 36.0, 36.0);
    assert!(count > 1);

    let mut painter = PrintPainter::letter();
    let printed = engine.print(&mut painter, 36.0, 36.0, None, None);
    assert_eq!(printed, count);
    assert_eq!(painter.page_count(), count);
}

#[test]
fn test_every_page_carries_content() {
    let mut engine = long_document();
    let mut painter = PrintPainter::letter();
    let printed = engine.print(&mut painter, 0.0, 0.0, None, None);
    assert!(printed > 1);
    for page in painter.pages() {
        let texts = page
            .commands()
            .iter()
            .filter(|c| matches!(c, DisplayCommand::DrawText { .. }))
            .count();
        assert!(texts > 0, "a page rendered no text");
    }
}

#[test]
fn test_header_footer_callbacks_run_once_per_page() {
    let mut engine = long_document();
    let mut painter = PrintPainter::letter();
    let mut header_calls: Vec<usize> = Vec::new();
    let mut footer_calls = 0usize;

    let mut header = |painter: &mut dyn Painter, page: usize, band: Rect| {
        header_calls.push(page);
        painter.draw_text(
            band.x,
            band.y + 20.0,
            &format!("page {page}"),
            &vellum_layout::FontStyle::DEFAULT,
            vellum_layout::ColorValue::BLACK,
        );
    };
    let mut footer = |_: &mut dyn Painter, _: usize, _: Rect| {
        footer_calls += 1;
    };

    let printed = engine.print(
        &mut painter,
        36.0,
        24.0,
        Some(&mut header as &mut vellum_engine::PageChrome<'_>),
        Some(&mut footer as &mut vellum_engine::PageChrome<'_>),
    );
    assert_eq!(header_calls.len(), printed);
    assert_eq!(footer_calls, printed);
    // Page numbers are 1-based and increasing.
    assert_eq!(header_calls[0], 1);
    assert!(header_calls.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn test_oversized_chrome_disables_header_footer_but_prints() {
    let mut engine = long_document();
    let mut painter = PrintPainter::letter();
    let mut header_calls = 0usize;
    let mut header = |_: &mut dyn Painter, _: usize, _: Rect| {
        header_calls += 1;
    };

    // Letter body height in engine pixels is 792/0.75 = 1056; 600 + 600
    // leaves no room, so chrome is disabled and printing continues.
    let printed = engine.print(
        &mut painter,
        600.0,
        600.0,
        Some(&mut header as &mut vellum_engine::PageChrome<'_>),
        None,
    );
    assert!(printed >= 1);
    assert_eq!(header_calls, 0);

    let count = engine.page_count(&PrintPainter::letter(), 600.0, 600.0);
    assert!(count >= 1);
}
