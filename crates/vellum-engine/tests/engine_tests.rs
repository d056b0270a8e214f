//! Integration tests for the document engine: streaming, dispatch, stack
//! discipline, and the end-to-end pipeline.

use vellum_engine::{Engine, EngineEvent, StreamStatus};
use vellum_layout::tree::{BoxId, BoxKind, BoxTree};
use vellum_layout::{DisplayCommand, DisplayListPainter, FlowStyle, Rect};

/// Parse a complete document.
fn parse(html: &str) -> Engine {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.write(html).unwrap();
    engine.end(StreamStatus::Ok);
    engine.parse_all();
    engine
}

/// Collect every text box reachable from the root, in document order.
fn collect_texts(tree: &BoxTree, id: BoxId, out: &mut Vec<(String, bool, bool)>) {
    if let BoxKind::Text(t) = tree.kind(id) {
        out.push((t.text.clone(), t.style.bold, t.style.italic));
    }
    for &child in tree.children(id) {
        collect_texts(tree, child, out);
    }
}

/// Collect every reachable flow id.
fn collect_flows(tree: &BoxTree, id: BoxId, out: &mut Vec<BoxId>) {
    if matches!(tree.kind(id), BoxKind::Flow(_)) {
        out.push(id);
    }
    for &child in tree.children(id) {
        collect_flows(tree, child, out);
    }
    if let BoxKind::Table(t) = tree.kind(id) {
        if let Some(caption) = t.caption {
            collect_flows(tree, caption, out);
        }
    }
}

/// Find the first table reachable from the root.
fn find_table(tree: &BoxTree, id: BoxId) -> Option<BoxId> {
    if matches!(tree.kind(id), BoxKind::Table(_)) {
        return Some(id);
    }
    tree.children(id)
        .iter()
        .find_map(|&child| find_table(tree, child))
}

#[test]
fn test_mismatched_inline_nesting_leaves_empty_stack() {
    let engine = parse("<b><i>x</b>y</i>");
    assert!(engine.open_elements().is_empty());

    let mut texts = Vec::new();
    collect_texts(engine.tree(), engine.root(), &mut texts);
    assert_eq!(texts.len(), 2);
    // "x" carries both styles; closing </b> swept the <i> frame, so "y"
    // is plain.
    assert_eq!(texts[0], ("x".to_string(), true, true));
    assert_eq!(texts[1], ("y".to_string(), false, false));
}

#[test]
fn test_heading_close_normalization() {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.write("<h2>a<h1>b</h2>").unwrap();
    engine.parse_all();

    // Exactly one heading frame remains open after the mismatched close.
    let headings = ["h1", "h2", "h3", "h4", "h5", "h6"];
    let open: Vec<&str> = engine
        .open_elements()
        .into_iter()
        .filter(|t| headings.contains(t))
        .collect();
    assert_eq!(open.len(), 1);

    engine.end(StreamStatus::Ok);
    engine.parse_all();
    assert!(engine.open_elements().is_empty());
}

#[test]
fn test_table_default_row_synthesis() {
    let engine = parse("<table><td>x</td></table>");
    let table = find_table(engine.tree(), engine.root()).expect("a table");
    let BoxKind::Table(t) = engine.tree().kind(table) else {
        unreachable!()
    };
    assert_eq!(t.grid.row_count(), 1);
    assert_eq!(t.grid.column_count(), 1);
    assert!(t.grid.origin_at(0, 0).is_some());
}

#[test]
fn test_end_to_end_hello_world() {
    let mut engine = parse("<html><body><p>Hello <b>World</b></p></body></html>");

    // The root block container holds exactly one flow with two text runs.
    let root_children = engine.tree().children(engine.root()).to_vec();
    assert_eq!(root_children.len(), 1);
    assert!(matches!(engine.tree().kind(root_children[0]), BoxKind::Flow(_)));
    let flow_children = engine.tree().children(root_children[0]).to_vec();
    assert_eq!(flow_children.len(), 2);

    let mut texts = Vec::new();
    collect_texts(engine.tree(), engine.root(), &mut texts);
    assert_eq!(texts[0], ("Hello ".to_string(), false, false));
    assert_eq!(texts[1], ("World".to_string(), true, false));

    // Drawing the full viewport issues exactly one glyph run per run.
    engine.relayout();
    let mut painter = DisplayListPainter::new();
    let clip = Rect::new(0.0, 0.0, engine.viewport_width(), 1000.0);
    engine.draw(&mut painter, clip, 0.0, 0.0);
    let glyph_runs = painter
        .list()
        .commands()
        .iter()
        .filter(|c| matches!(c, DisplayCommand::DrawText { .. }))
        .count();
    assert_eq!(glyph_runs, 2);
}

#[test]
fn test_unterminated_list_still_closes_cleanly() {
    let engine = parse("<ul><li>a<li>b");
    assert!(engine.open_elements().is_empty());

    let mut flows = Vec::new();
    collect_flows(engine.tree(), engine.root(), &mut flows);
    let items: Vec<BoxId> = flows
        .iter()
        .copied()
        .filter(|&f| {
            matches!(engine.tree().kind(f), BoxKind::Flow(flow) if flow.style == FlowStyle::ListItem)
        })
        .collect();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(!engine.tree().children(item).is_empty());
        let BoxKind::Flow(flow) = engine.tree().kind(item) else {
            unreachable!()
        };
        assert!(flow.marker.is_some());
    }
}

#[test]
fn test_ordered_list_numbers_baked_at_creation() {
    let engine = parse("<ol start=3><li>a<li>b</ol>");
    let mut flows = Vec::new();
    collect_flows(engine.tree(), engine.root(), &mut flows);
    let markers: Vec<String> = flows
        .iter()
        .filter_map(|&f| match engine.tree().kind(f) {
            BoxKind::Flow(flow) => flow.marker.as_ref().map(|m| m.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec!["3.".to_string(), "4.".to_string()]);
}

#[test]
fn test_no_reachable_flow_is_empty() {
    let documents = [
        "<p></p><p>x</p>",
        "<ul><li></ul>",
        "<table><tr><td></td><td>x</td></tr></table>",
        "<center></center>done",
        "<h1></h1>",
    ];
    for html in documents {
        let engine = parse(html);
        let mut flows = Vec::new();
        collect_flows(engine.tree(), engine.root(), &mut flows);
        for flow in flows {
            assert!(
                !engine.tree().children(flow).is_empty(),
                "empty flow survived in {html:?}"
            );
        }
    }
}

#[test]
fn test_inline_close_cannot_escape_table_cell() {
    let engine = parse("<p>start<table><td>cell</p>more</td></table>");
    // The </p> inside the cell may not cross the cell boundary to close
    // the outer <p>; "more" therefore stays inside the cell.
    let table = find_table(engine.tree(), engine.root()).expect("a table");
    let BoxKind::Table(t) = engine.tree().kind(table) else {
        unreachable!()
    };
    let cell = t.grid.origin_at(0, 0).expect("cell");
    let mut texts = Vec::new();
    collect_texts(engine.tree(), cell, &mut texts);
    let joined: Vec<&str> = texts.iter().map(|(t, _, _)| t.as_str()).collect();
    assert!(joined.contains(&"cell"));
    assert!(joined.contains(&"more"));
}

#[test]
fn test_title_event() {
    let mut engine = parse("<head><title>My   Page</title></head><p>x</p>");
    assert_eq!(engine.title(), Some("My Page"));
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::TitleChanged("My Page".to_string())));
}

#[test]
fn test_meta_refresh_redirect_event() {
    let mut engine = parse(r#"<meta http-equiv="refresh" content="5; url=next.html">"#);
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::RedirectRequested {
        url: "next.html".to_string(),
        delay_seconds: 5,
    }));
}

#[test]
fn test_base_events() {
    let mut engine = parse(r#"<base href="http://example.com/" target="_top">"#);
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::BaseUrlChanged("http://example.com/".to_string())));
    assert!(events.contains(&EngineEvent::BaseTargetChanged("_top".to_string())));
}

#[test]
fn test_load_done_emitted_once() {
    let mut engine = parse("<p>x</p>");
    let events = engine.take_events();
    assert_eq!(
        events.iter().filter(|e| matches!(e, EngineEvent::LoadDone)).count(),
        1
    );
}

#[test]
fn test_form_submission_encoding() {
    let mut engine = parse(
        r#"<form action="/search" method=post>
            <input type=text name=a value="x y">
            <input type=hidden name=b value="&">
        </form>"#,
    );
    engine.submit_form(0);
    let events = engine.take_events();
    let submitted = events.iter().find_map(|e| match e {
        EngineEvent::FormSubmitted { method, action, body } => {
            Some((method.clone(), action.clone(), body.clone()))
        }
        _ => None,
    });
    let (method, action, body) = submitted.expect("a form submission");
    assert_eq!(method, "post");
    assert_eq!(action, "/search");
    assert_eq!(body, "a=x+y&b=%26");
}

#[test]
fn test_select_options_accumulate_via_side_buffer() {
    let engine = parse(
        "<form><select name=s><option value=1>One<option selected>Two</select></form>",
    );
    let mut found = false;
    for id in 0..engine.tree().len() {
        if let BoxKind::FormControl(control) = engine.tree().kind(BoxId(id)) {
            if let vellum_layout::FormControlKind::Select { options, .. } = &control.kind {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].value, "1");
                assert_eq!(options[0].label, "One");
                assert_eq!(options[1].value, "Two");
                assert!(options[1].selected);
                found = true;
            }
        }
    }
    assert!(found, "no select control in tree");
}

#[test]
fn test_option_outside_select_is_ignored() {
    let engine = parse("<option>stray</option><p>x</p>");
    // No select exists; the stray option created nothing and parsing
    // carried on.
    assert!(engine.open_elements().is_empty());
    let mut texts = Vec::new();
    collect_texts(engine.tree(), engine.root(), &mut texts);
    assert!(texts.iter().any(|(t, _, _)| t == "x"));
}

#[test]
fn test_image_requests_resource_and_resolves_intrinsic_size() {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.write(r#"<p><img src="pic.png"></p>"#).unwrap();
    engine.end(StreamStatus::Ok);
    engine.parse_all();

    let id = engine
        .take_events()
        .into_iter()
        .find_map(|e| match e {
            EngineEvent::ResourceRequested { url, id } => {
                assert_eq!(url, "pic.png");
                Some(id)
            }
            _ => None,
        })
        .expect("a resource request");

    // Answer with a real 2x3 PNG.
    let mut bytes = Vec::new();
    let png = image::RgbaImage::new(2, 3);
    png.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    engine.resource_write(id, &bytes).unwrap();
    engine.resource_end(id, StreamStatus::Ok).unwrap();

    let mut intrinsic = None;
    for node in 0..engine.tree().len() {
        if let BoxKind::Image(img) = engine.tree().kind(BoxId(node)) {
            intrinsic = img.intrinsic;
        }
    }
    assert_eq!(intrinsic, Some((2, 3)));
    assert!(engine.images().contains_key("pic.png"));
}

#[test]
fn test_failed_resource_keeps_placeholder() {
    let mut engine = parse(r#"<img src="gone.png">"#);
    let id = engine
        .take_events()
        .into_iter()
        .find_map(|e| match e {
            EngineEvent::ResourceRequested { id, .. } => Some(id),
            _ => None,
        })
        .unwrap();
    engine.resource_end(id, StreamStatus::Error).unwrap();
    for node in 0..engine.tree().len() {
        if let BoxKind::Image(img) = engine.tree().kind(BoxId(node)) {
            assert!(img.intrinsic.is_none());
        }
    }
}

#[test]
fn test_poll_respects_token_budget() {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.set_tokens_per_tick(2);
    engine.write("<p>a</p><p>b</p><p>c</p>").unwrap();
    engine.end(StreamStatus::Ok);

    let progress = engine.poll();
    assert_eq!(progress.tokens_consumed, 2);
    assert!(!progress.done);

    engine.parse_all();
    assert!(engine.is_finished());
}

#[test]
fn test_stop_is_idempotent_and_leaves_drawable_tree() {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.write("<ul><li><b>deep").unwrap();
    engine.parse_all();
    engine.stop();
    engine.stop();
    assert!(engine.is_finished());
    assert!(engine.open_elements().is_empty());

    engine.relayout();
    let mut painter = DisplayListPainter::new();
    let clip = Rect::new(0.0, 0.0, 640.0, 480.0);
    engine.draw(&mut painter, clip, 0.0, 0.0);
}

#[test]
fn test_write_after_end_is_an_error() {
    let mut engine = Engine::new();
    engine.begin("text/html");
    engine.end(StreamStatus::Ok);
    assert!(engine.write("late").is_err());
}

#[test]
fn test_link_hit_test_and_activation() {
    let mut engine = parse(r#"<p><a href="dest.html">click here</a> plain</p>"#);
    engine.relayout();

    // Somewhere inside the first word of the link text.
    let hit = engine.link_at(10.0, 10.0);
    assert_eq!(hit, Some("dest.html"));
    assert!(engine.activate_link_at(10.0, 10.0));
    let events = engine.take_events();
    assert!(events.contains(&EngineEvent::LinkActivated {
        url: "dest.html".to_string(),
    }));

    // Far to the right of the line there is no link.
    assert!(!engine.activate_link_at(600.0, 10.0));
}

#[test]
fn test_body_attributes_set_document_defaults() {
    let engine = parse(r##"<body bgcolor="#000080" text=white><p>x</p></body>"##);
    let BoxKind::ClueV(root) = engine.tree().kind(engine.root()) else {
        unreachable!()
    };
    assert_eq!(root.background, Some(vellum_layout::ColorValue::rgb(0, 0, 128)));
    let mut texts = Vec::new();
    collect_texts(engine.tree(), engine.root(), &mut texts);
    assert_eq!(texts.len(), 1);
}
