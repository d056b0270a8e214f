//! Integration tests for pagination.

use vellum_layout::{
    ApproximateFontMetrics, BoxKind, BoxTree, ColorValue, FlowBox, FontStyle, TextBox,
    DEFAULT_MIN_FILL, find_page_split, layout, paginate,
};

fn flow_with_text(tree: &mut BoxTree, root: vellum_layout::BoxId, words: &str) {
    let flow = tree.alloc(BoxKind::Flow(FlowBox::default()));
    let text = tree.alloc(BoxKind::Text(TextBox {
        text: words.to_string(),
        style: FontStyle::DEFAULT,
        color: ColorValue::BLACK,
        link: None,
        segments: Vec::new(),
    }));
    tree.append_child(root, flow);
    tree.append_child(flow, text);
}

fn build_document(paragraphs: usize) -> (BoxTree, vellum_layout::BoxId) {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    for i in 0..paragraphs {
        flow_with_text(&mut tree, root, &format!("paragraph number {i}"));
    }
    layout(&mut tree, root, 500.0, &ApproximateFontMetrics);
    (tree, root)
}

#[test]
fn test_split_lands_on_flow_boundary() {
    let (tree, root) = build_document(10);
    let limit = tree.geometry(root).height() / 2.0;
    let split = find_page_split(&tree, root, limit);
    assert!(split > 0.0);
    assert!(split <= limit);

    // The split coincides with some child's top or bottom edge.
    let on_boundary = tree.children(root).iter().any(|&c| {
        let g = tree.geometry(c);
        (g.y - split).abs() < 0.01 || (g.y + g.height() - split).abs() < 0.01
    });
    assert!(on_boundary, "split {split} not on a flow boundary");
}

#[test]
fn test_pagination_monotonic_and_bounded() {
    let (tree, root) = build_document(40);
    let body_height = 100.0;
    let pages = paginate(&tree, root, body_height, DEFAULT_MIN_FILL);
    assert!(pages.len() > 1);

    let document_height = tree.geometry(root).height();
    let mut previous_end = 0.0;
    for (index, page) in pages.iter().enumerate() {
        assert!(
            (page.start - previous_end).abs() < 0.01,
            "page {index} does not start where the previous ended"
        );
        assert!(page.end > page.start, "page {index} is empty");
        assert!(
            page.height() <= body_height + 0.01,
            "page {index} overflows: {} > {body_height}",
            page.height()
        );
        previous_end = page.end;
    }
    assert!((previous_end - document_height).abs() < 0.01);
}

#[test]
fn test_short_document_is_one_page() {
    let (tree, root) = build_document(2);
    let pages = paginate(&tree, root, 10_000.0, DEFAULT_MIN_FILL);
    assert_eq!(pages.len(), 1);
    assert!((pages[0].end - tree.geometry(root).height()).abs() < 0.01);
}

#[test]
fn test_unsplittable_content_forces_hard_break() {
    // One giant image: no clean split anywhere, so the driver must force
    // page-height breaks.
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let image = tree.alloc(BoxKind::Image(vellum_layout::ImageBox {
        src: "big.gif".to_string(),
        alt: String::new(),
        width_attr: Some(vellum_layout::Length::Pixels(100.0)),
        height_attr: Some(950.0),
        intrinsic: None,
        border: 0.0,
        hspace: 0.0,
        vspace: 0.0,
        float: None,
    }));
    tree.append_child(root, image);
    layout(&mut tree, root, 500.0, &ApproximateFontMetrics);

    let pages = paginate(&tree, root, 400.0, DEFAULT_MIN_FILL);
    assert_eq!(pages.len(), 3);
    assert!((pages[0].height() - 400.0).abs() < 0.01);
    assert!((pages[1].height() - 400.0).abs() < 0.01);
    assert!(pages[2].height() <= 400.0);
}

#[test]
fn test_split_between_lines_inside_tall_flow() {
    let mut tree = BoxTree::new();
    let root = tree.alloc(BoxKind::ClueV(Default::default()));
    let words = "word ".repeat(200);
    flow_with_text(&mut tree, root, words.trim_end());
    layout(&mut tree, root, 100.0, &ApproximateFontMetrics);

    let flow = tree.children(root)[0];
    let BoxKind::Flow(f) = tree.kind(flow) else {
        panic!("expected flow")
    };
    assert!(f.lines.len() > 5);
    let line_height = f.lines[1].y - f.lines[0].y;

    // A limit in the middle of the flow snaps back to a line boundary.
    let limit = line_height.mul_add(3.0, line_height / 2.0);
    let split = find_page_split(&tree, root, limit);
    assert!((split - line_height * 3.0).abs() < 0.5, "split {split} not on a line boundary");
}
