//! Integration tests for the box tree and layout engine.

use vellum_layout::{
    ApproximateFontMetrics, BoxKind, BoxTree, CellBox, ColorValue, DisplayCommand,
    DisplayListPainter, FlowBox, FlowStyle, FontMetrics, FontStyle, HAlign, ImageBox, Length,
    Painter, Rect, TableBox, TextBox, VAlign, calc_min_width, calc_size, draw, layout,
    set_max_width,
};

fn text_node(tree: &mut BoxTree, text: &str, style: FontStyle) -> vellum_layout::BoxId {
    tree.alloc(BoxKind::Text(TextBox {
        text: text.to_string(),
        style,
        color: ColorValue::BLACK,
        link: None,
        segments: Vec::new(),
    }))
}

fn flow_node(tree: &mut BoxTree) -> vellum_layout::BoxId {
    tree.alloc(BoxKind::Flow(FlowBox::default()))
}

fn image_node(tree: &mut BoxTree, percent: Option<u8>) -> vellum_layout::BoxId {
    let id = tree.alloc(BoxKind::Image(ImageBox {
        src: "x.gif".to_string(),
        alt: String::new(),
        width_attr: None,
        height_attr: Some(20.0),
        intrinsic: None,
        border: 0.0,
        hspace: 0.0,
        vspace: 0.0,
        float: None,
    }));
    tree.geometry_mut(id).percent = percent;
    id
}

#[test]
fn test_percent_width_reflow_without_reparse() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = flow_node(&mut tree);
    let image = image_node(&mut tree, Some(50));
    tree.append_child(root, flow);
    tree.append_child(flow, image);

    let metrics = ApproximateFontMetrics;
    layout(&mut tree, root, 200.0, &metrics);
    assert!((tree.geometry(image).width - 100.0).abs() < 0.01);

    // Re-propagate a new max width and re-size: the percent object
    // recomputes without any reparse.
    set_max_width(&mut tree, root, 300.0);
    calc_size(&mut tree, root, &metrics);
    assert!((tree.geometry(image).width - 150.0).abs() < 0.01);
}

#[test]
fn test_text_wraps_at_word_boundaries() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = flow_node(&mut tree);
    let text = text_node(&mut tree, "aaaa bbbb cccc", FontStyle::DEFAULT);
    tree.append_child(root, flow);
    tree.append_child(flow, text);

    let metrics = ApproximateFontMetrics;
    // 14 characters at ~9.6px will not fit in 100px; expect wrapping.
    layout(&mut tree, root, 100.0, &metrics);

    let BoxKind::Flow(f) = tree.kind(flow) else {
        panic!("expected flow")
    };
    assert!(f.lines.len() >= 2, "expected wrapping, got {} line(s)", f.lines.len());

    let BoxKind::Text(t) = tree.kind(text) else {
        panic!("expected text")
    };
    assert_eq!(t.segments.len(), f.lines.len());
    // No segment starts or ends with a collapsible space.
    for seg in &t.segments {
        let s = &t.text[seg.start..seg.end];
        assert_eq!(s, s.trim(), "segment {s:?} has loose whitespace");
    }
}

#[test]
fn test_unwrapped_run_has_one_segment() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = flow_node(&mut tree);
    let text = text_node(&mut tree, "short", FontStyle::DEFAULT);
    tree.append_child(root, flow);
    tree.append_child(flow, text);

    layout(&mut tree, root, 500.0, &ApproximateFontMetrics);

    let BoxKind::Text(t) = tree.kind(text) else {
        panic!("expected text")
    };
    assert_eq!(t.segments.len(), 1);
}

#[test]
fn test_one_glyph_run_drawn_per_text_run() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = flow_node(&mut tree);
    let plain = text_node(&mut tree, "Hello ", FontStyle::DEFAULT);
    let mut bold_style = FontStyle::DEFAULT;
    bold_style.bold = true;
    let bold = text_node(&mut tree, "World", bold_style);
    tree.append_child(root, flow);
    tree.append_child(flow, plain);
    tree.append_child(flow, bold);

    layout(&mut tree, root, 500.0, &ApproximateFontMetrics);

    let mut painter = DisplayListPainter::new();
    let clip = Rect::new(0.0, 0.0, 500.0, 500.0);
    painter.begin(clip);
    draw(&tree, root, &mut painter, &clip, 0.0, 0.0);
    painter.end();

    let texts: Vec<&DisplayCommand> = painter
        .list()
        .commands()
        .iter()
        .filter(|c| matches!(c, DisplayCommand::DrawText { .. }))
        .collect();
    assert_eq!(texts.len(), 2);
    match texts[0] {
        DisplayCommand::DrawText { text, style, .. } => {
            assert_eq!(text, "Hello ");
            assert!(!style.bold);
        }
        _ => unreachable!(),
    }
    match texts[1] {
        DisplayCommand::DrawText { text, style, .. } => {
            assert_eq!(text, "World");
            assert!(style.bold);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_empty_flow_placeholder_still_contributes_line_height() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = flow_node(&mut tree);
    tree.append_child(root, flow);
    assert!(tree.ensure_flow_not_empty(flow, FontStyle::DEFAULT, ColorValue::BLACK));
    assert!(!tree.children(flow).is_empty());

    let metrics = ApproximateFontMetrics;
    layout(&mut tree, root, 200.0, &metrics);
    let expected = metrics.line_height(&FontStyle::DEFAULT);
    assert!((tree.geometry(flow).height() - expected).abs() < 0.01);

    // The placeholder never produces a glyph run.
    let mut painter = DisplayListPainter::new();
    let clip = Rect::new(0.0, 0.0, 200.0, 200.0);
    painter.begin(clip);
    draw(&tree, root, &mut painter, &clip, 0.0, 0.0);
    assert!(
        !painter
            .list()
            .commands()
            .iter()
            .any(|c| matches!(c, DisplayCommand::DrawText { .. }))
    );
}

#[test]
fn test_centered_flow_shifts_segments() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = tree.alloc(BoxKind::Flow(FlowBox {
        halign: HAlign::Center,
        ..Default::default()
    }));
    let text = text_node(&mut tree, "hi", FontStyle::DEFAULT);
    tree.append_child(root, flow);
    tree.append_child(flow, text);

    let metrics = ApproximateFontMetrics;
    layout(&mut tree, root, 400.0, &metrics);

    let width = metrics.text_width("hi", &FontStyle::DEFAULT);
    let BoxKind::Text(t) = tree.kind(text) else {
        panic!("expected text")
    };
    let expected = (400.0 - width) / 2.0;
    assert!((t.segments[0].x - expected).abs() < 0.5);
}

#[test]
fn test_min_width_is_longest_word() {
    let mut tree = BoxTree::new();
    let flow = flow_node(&mut tree);
    let text = text_node(&mut tree, "a incomprehensibilities b", FontStyle::DEFAULT);
    tree.append_child(flow, text);

    let metrics = ApproximateFontMetrics;
    let min = calc_min_width(&tree, flow, &metrics);
    let longest = metrics.text_width("incomprehensibilities", &FontStyle::DEFAULT);
    assert!((min - longest).abs() < 0.01);
}

#[test]
fn test_preformatted_text_splits_on_newlines_only() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let flow = tree.alloc(BoxKind::Flow(FlowBox {
        style: FlowStyle::Pre,
        ..Default::default()
    }));
    let mut style = FontStyle::DEFAULT;
    style.fixed = true;
    let text = text_node(&mut tree, "first line\nsecond much longer line", style);
    tree.append_child(root, flow);
    tree.append_child(flow, text);

    // Narrow max width: a normal flow would wrap, pre must not.
    layout(&mut tree, root, 50.0, &ApproximateFontMetrics);

    let BoxKind::Flow(f) = tree.kind(flow) else {
        panic!("expected flow")
    };
    assert_eq!(f.lines.len(), 2);
}

fn build_table(
    tree: &mut BoxTree,
    cells: &[&[(u32, u32, &str)]],
    border: f32,
) -> vellum_layout::BoxId {
    let table = tree.alloc(BoxKind::Table(TableBox {
        border,
        spacing: 2.0,
        padding: 1.0,
        ..Default::default()
    }));
    for row in cells {
        if let BoxKind::Table(t) = tree.kind_mut(table) {
            t.grid.start_row();
        }
        for &(rowspan, colspan, content) in *row {
            let cell = tree.alloc(BoxKind::TableCell(CellBox {
                rowspan,
                colspan,
                width_attr: None,
                nowrap: false,
                bgcolor: None,
                heading: false,
                valign: VAlign::Top,
                bevel: 0.0,
            }));
            let flow = flow_node(tree);
            let text = text_node(tree, content, FontStyle::DEFAULT);
            tree.append_child(flow, text);
            tree.append_child(cell, flow);
            tree.append_child(table, cell);
            if let BoxKind::Table(t) = tree.kind_mut(table) {
                let _ = t.grid.add_cell(cell, rowspan, colspan);
            }
        }
    }
    table
}

#[test]
fn test_table_rowspan_shifts_second_row_cell() {
    let mut tree = BoxTree::new();
    // Row 1: a cell spanning two rows, then a normal cell.
    // Row 2: one cell, which must land in column 2.
    let table = build_table(
        &mut tree,
        &[&[(2, 1, "tall"), (1, 1, "a")], &[(1, 1, "b")]],
        0.0,
    );
    layout(&mut tree, table, 400.0, &ApproximateFontMetrics);

    let BoxKind::Table(t) = tree.kind(table) else {
        panic!("expected table")
    };
    assert_eq!(t.column_widths.len(), 2);
    assert_eq!(t.row_heights.len(), 2);
    let second_row_cell = t.grid.origin_at(1, 1).expect("cell in row 2, column 2");
    let spanning_cell = t.grid.origin_at(0, 0).expect("spanning cell");
    // The second-row cell sits in the second column, to the right of the
    // rowspan cell.
    assert!(tree.geometry(second_row_cell).x > tree.geometry(spanning_cell).x);
    assert!(t.grid.origin_at(1, 0).is_none());
}

#[test]
fn test_table_fixed_column_pinned_first() {
    let mut tree = BoxTree::new();
    let table = build_table(&mut tree, &[&[(1, 1, "a"), (1, 1, "b")]], 0.0);
    // Pin the first cell at 120px.
    let first = {
        let BoxKind::Table(t) = tree.kind(table) else {
            panic!()
        };
        t.grid.origin_at(0, 0).unwrap()
    };
    if let BoxKind::TableCell(c) = tree.kind_mut(first) {
        c.width_attr = Some(Length::Pixels(120.0));
    }

    layout(&mut tree, table, 400.0, &ApproximateFontMetrics);
    let BoxKind::Table(t) = tree.kind(table) else {
        panic!()
    };
    // Fixed column gets its pixels (plus cell padding).
    assert!(t.column_widths[0] >= 120.0);
}

#[test]
fn test_rule_centered_by_default() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let rule = tree.alloc(BoxKind::Rule(vellum_layout::RuleBox {
        size: 2.0,
        length: Some(Length::Percent(50)),
        halign: HAlign::None,
        noshade: true,
    }));
    tree.append_child(root, rule);

    layout(&mut tree, root, 200.0, &ApproximateFontMetrics);
    assert!((tree.geometry(rule).width - 100.0).abs() < 0.01);

    let mut painter = DisplayListPainter::new();
    let clip = Rect::new(0.0, 0.0, 200.0, 200.0);
    painter.begin(clip);
    draw(&tree, root, &mut painter, &clip, 0.0, 0.0);
    let rects: Vec<&DisplayCommand> = painter
        .list()
        .commands()
        .iter()
        .filter(|c| matches!(c, DisplayCommand::FillRect { .. }))
        .collect();
    assert_eq!(rects.len(), 1);
    match rects[0] {
        DisplayCommand::FillRect { rect, .. } => {
            assert!((rect.x - 50.0).abs() < 0.5, "rule not centered: {rect:?}");
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_float_reserves_margin_for_following_flow() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let float = tree.alloc(BoxKind::Image(ImageBox {
        src: "f.gif".to_string(),
        alt: String::new(),
        width_attr: Some(Length::Pixels(60.0)),
        height_attr: Some(100.0),
        intrinsic: None,
        border: 0.0,
        hspace: 0.0,
        vspace: 0.0,
        float: Some(vellum_layout::FloatSide::Left),
    }));
    tree.add_float(root, float);
    let flow = flow_node(&mut tree);
    let text = text_node(&mut tree, "hi", FontStyle::DEFAULT);
    tree.append_child(root, flow);
    tree.append_child(flow, text);

    layout(&mut tree, root, 300.0, &ApproximateFontMetrics);

    // The flow's text starts to the right of the 60px float band.
    let BoxKind::Text(t) = tree.kind(text) else {
        panic!("expected text")
    };
    assert!(t.segments[0].x >= 60.0);
    // The clue is tall enough to contain the float.
    assert!(tree.geometry(root).height() >= 100.0);
}
