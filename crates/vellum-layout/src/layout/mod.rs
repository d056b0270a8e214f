//! The layout engine.
//!
//! Layout is a two-phase walk over the box tree:
//!
//! 1. [`set_max_width`] propagates the available width top-down. Any node
//!    with a percent width recomputes its pixel width here, which is the
//!    whole reflow mechanism: changing the viewport width and re-running
//!    the two phases reflows the document without reparsing.
//! 2. [`calc_size`] computes concrete geometry bottom-up: children first,
//!    then the container derives its own width/ascent/descent from them.
//!
//! [`calc_min_width`] reports the intrinsic minimum a node can shrink to
//! (the longest unbreakable word, a fixed control width, the sum of table
//! column minimums); containers consult it to keep from crushing content.
//!
//! # Module Structure
//!
//! - [`flow`] - line breaking and inline placement inside a paragraph
//! - [`table`] - the two-pass table width algorithm and cell placement

pub mod flow;
pub mod table;

use crate::metrics::FontMetrics;
use crate::style::Length;
use crate::tree::{BoxId, BoxKind, BoxTree, FormControlKind, IMAGE_PLACEHOLDER_SIZE};

/// Pixel offset per indentation level (blockquotes, list nesting).
pub const INDENT_UNIT: f32 = 36.0;

/// Vertical gap a rule reserves above and below its line.
const RULE_GAP: f32 = 4.0;

/// Convenience entry point: propagate `max_width` and compute sizes.
pub fn layout(tree: &mut BoxTree, root: BoxId, max_width: f32, metrics: &dyn FontMetrics) {
    set_max_width(tree, root, max_width);
    calc_size(tree, root, metrics);
}

/// Top-down pass: record the propagated max width and resolve percent
/// widths against it.
pub fn set_max_width(tree: &mut BoxTree, id: BoxId, max_width: f32) {
    let geometry = tree.geometry_mut(id);
    geometry.max_width = max_width;
    if let Some(pct) = geometry.percent {
        geometry.width = f32::from(pct) * max_width / 100.0;
    }

    match tree.kind(id) {
        BoxKind::ClueV(_) | BoxKind::ClueH(_) | BoxKind::TableCell(_) => {
            let children: Vec<BoxId> = tree.children(id).to_vec();
            for child in children {
                set_max_width(tree, child, max_width);
            }
            if let BoxKind::ClueV(v) = tree.kind(id) {
                let floats = v.floats.clone();
                for float in floats {
                    set_max_width(tree, float.id, max_width);
                }
            }
        }
        BoxKind::Flow(f) => {
            let inner = (max_width - f32::from(f.indent) * INDENT_UNIT).max(1.0);
            let children: Vec<BoxId> = tree.children(id).to_vec();
            for child in children {
                set_max_width(tree, child, inner);
            }
        }
        BoxKind::Table(t) => {
            // The table's own width target resolves here; column
            // distribution happens in calc_size.
            let width_attr = t.width_attr;
            let caption = t.caption;
            let geometry = tree.geometry_mut(id);
            if geometry.percent.is_none() {
                if let Some(Length::Pixels(px)) = width_attr {
                    geometry.width = px.min(max_width);
                }
            }
            if let Some(caption) = caption {
                set_max_width(tree, caption, max_width);
            }
        }
        _ => {}
    }
}

/// Bottom-up pass: compute each node's concrete geometry from its
/// already-sized children.
pub fn calc_size(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    match tree.kind(id) {
        BoxKind::Text(_) => calc_text_size(tree, id, metrics),
        BoxKind::Image(_) => calc_image_size(tree, id),
        BoxKind::Rule(_) => calc_rule_size(tree, id),
        BoxKind::FormControl(_) => calc_control_size(tree, id, metrics),
        BoxKind::Anchor(_) | BoxKind::Break(_) => {
            let geometry = tree.geometry_mut(id);
            geometry.width = 0.0;
            geometry.ascent = 0.0;
            geometry.descent = 0.0;
        }
        BoxKind::Flow(_) => flow::layout_flow(tree, id, metrics, 0.0, 0.0),
        BoxKind::ClueV(_) => calc_cluev_size(tree, id, metrics),
        BoxKind::ClueH(_) => calc_clueh_size(tree, id, metrics),
        BoxKind::Table(_) => table::layout_table(tree, id, metrics),
        BoxKind::TableCell(_) => {
            // Free-standing cells lay out as a plain vertical stack; the
            // table pass lays its own cells with padding and column widths.
            let max_width = tree.geometry(id).max_width;
            table::layout_cell(tree, id, metrics, max_width, 0.0);
        }
    }
}

/// Intrinsic minimum width: the narrowest this node can be laid out
/// without clipping content.
pub fn calc_min_width(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> f32 {
    match tree.kind(id) {
        BoxKind::Text(t) => {
            if t.text.is_empty() {
                0.0
            } else {
                t.text
                    .split_ascii_whitespace()
                    .map(|word| metrics.text_width(word, &t.style))
                    .fold(0.0, f32::max)
            }
        }
        BoxKind::Image(img) => {
            // Percent images shrink to nearly nothing; fixed ones do not.
            let content = match (tree.geometry(id).percent, img.width_attr) {
                (Some(_), _) => 1.0,
                (None, Some(Length::Pixels(px))) => px,
                (None, _) => img
                    .intrinsic
                    .map_or(IMAGE_PLACEHOLDER_SIZE, |(w, _)| w as f32),
            };
            content + 2.0 * (img.border + img.hspace)
        }
        BoxKind::Rule(_) | BoxKind::Anchor(_) | BoxKind::Break(_) => 1.0,
        BoxKind::FormControl(_) => control_width(tree, id, metrics),
        BoxKind::Flow(f) => {
            let indent = f32::from(f.indent) * INDENT_UNIT;
            let widest = tree
                .children(id)
                .iter()
                .map(|&c| calc_min_width(tree, c, metrics))
                .fold(0.0, f32::max);
            widest + indent
        }
        BoxKind::ClueV(v) => tree
            .children(id)
            .iter()
            .copied()
            .chain(v.floats.iter().map(|f| f.id))
            .map(|c| calc_min_width(tree, c, metrics))
            .fold(0.0, f32::max),
        BoxKind::ClueH(_) => tree
            .children(id)
            .iter()
            .map(|&c| calc_min_width(tree, c, metrics))
            .sum(),
        BoxKind::TableCell(_) => tree
            .children(id)
            .iter()
            .map(|&c| calc_min_width(tree, c, metrics))
            .fold(0.0, f32::max),
        BoxKind::Table(_) => table::table_min_width(tree, id, metrics),
    }
}

/// Preferred (unwrapped) width: what the node would occupy given
/// unlimited horizontal room. Tables use this to apportion flexible
/// columns.
pub fn calc_pref_width(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> f32 {
    match tree.kind(id) {
        BoxKind::Text(t) => {
            if matches!(
                tree.parent(id)
                    .map(|p| tree.kind(p)),
                Some(BoxKind::Flow(f)) if f.style == crate::style::FlowStyle::Pre
            ) {
                t.text
                    .split('\n')
                    .map(|line| metrics.text_width(line, &t.style))
                    .fold(0.0, f32::max)
            } else {
                metrics.text_width(&t.text, &t.style)
            }
        }
        BoxKind::Flow(f) => {
            let indent = f32::from(f.indent) * INDENT_UNIT;
            let total: f32 = tree
                .children(id)
                .iter()
                .map(|&c| calc_pref_width(tree, c, metrics))
                .sum();
            total + indent
        }
        BoxKind::ClueV(_) | BoxKind::TableCell(_) => tree
            .children(id)
            .iter()
            .map(|&c| calc_pref_width(tree, c, metrics))
            .fold(0.0, f32::max),
        _ => calc_min_width(tree, id, metrics),
    }
}

// ----------------------------------------------------------------------
// Leaf sizing
// ----------------------------------------------------------------------

fn calc_text_size(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    let BoxKind::Text(t) = tree.kind(id) else {
        return;
    };
    let width = metrics.text_width(&t.text, &t.style);
    let ascent = metrics.ascent(&t.style);
    let descent = metrics.descent(&t.style);
    let geometry = tree.geometry_mut(id);
    geometry.width = width;
    geometry.ascent = ascent;
    geometry.descent = descent;
}

fn calc_image_size(tree: &mut BoxTree, id: BoxId) {
    let geometry = *tree.geometry(id);
    let BoxKind::Image(img) = tree.kind(id) else {
        return;
    };

    // Content width: percent of the propagated max width, an explicit
    // pixel width, the intrinsic width once the resource resolved, or the
    // placeholder size.
    let content_width = if let Some(pct) = geometry.percent {
        (f32::from(pct) * geometry.max_width / 100.0).max(1.0)
    } else {
        match img.width_attr {
            Some(length) => length.resolve(geometry.max_width).max(1.0),
            None => img
                .intrinsic
                .map_or(IMAGE_PLACEHOLDER_SIZE, |(w, _)| w as f32),
        }
    };

    // Content height: explicit, or scaled from the intrinsic aspect ratio
    // when only the width was given, or the placeholder size.
    let content_height = img.height_attr.unwrap_or_else(|| match img.intrinsic {
        Some((w, h)) if w > 0 => content_width * (h as f32) / (w as f32),
        Some((_, h)) => h as f32,
        None => IMAGE_PLACEHOLDER_SIZE,
    });

    let border = img.border;
    let hspace = img.hspace;
    let vspace = img.vspace;
    let geometry = tree.geometry_mut(id);
    geometry.width = content_width + 2.0 * (border + hspace);
    geometry.ascent = content_height + 2.0 * (border + vspace);
    geometry.descent = 0.0;
}

fn calc_rule_size(tree: &mut BoxTree, id: BoxId) {
    let geometry = *tree.geometry(id);
    let BoxKind::Rule(rule) = tree.kind(id) else {
        return;
    };
    let width = rule
        .length
        .map_or(geometry.max_width, |l| l.resolve(geometry.max_width))
        .min(geometry.max_width)
        .max(1.0);
    let size = rule.size;
    let geometry = tree.geometry_mut(id);
    geometry.width = width;
    geometry.ascent = size + 2.0 * RULE_GAP;
    geometry.descent = 0.0;
}

/// Fixed default geometry per control kind; text-like controls scale with
/// the average character width of the default font.
fn control_width(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> f32 {
    let BoxKind::FormControl(control) = tree.kind(id) else {
        return 0.0;
    };
    let style = crate::style::FontStyle::DEFAULT;
    let char_width = metrics.text_width("0", &style);
    match &control.kind {
        FormControlKind::TextInput { size, .. } => (*size as f32) * char_width + 8.0,
        FormControlKind::Checkbox { .. } | FormControlKind::Radio { .. } => 14.0,
        FormControlKind::Submit { label }
        | FormControlKind::Reset { label }
        | FormControlKind::Button { label } => metrics.text_width(label, &style) + 16.0,
        FormControlKind::Hidden => 0.0,
        FormControlKind::Select { options, .. } => {
            let widest = options
                .iter()
                .map(|o| metrics.text_width(&o.label, &style))
                .fold(0.0, f32::max);
            widest + 24.0
        }
        FormControlKind::TextArea { cols, .. } => (*cols as f32) * char_width + 8.0,
    }
}

fn calc_control_size(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    let width = control_width(tree, id, metrics);
    let BoxKind::FormControl(control) = tree.kind(id) else {
        return;
    };
    let style = crate::style::FontStyle::DEFAULT;
    let line = metrics.line_height(&style);
    let height = match &control.kind {
        FormControlKind::Checkbox { .. } | FormControlKind::Radio { .. } => 14.0,
        FormControlKind::Hidden => 0.0,
        FormControlKind::Select { size, .. } => line.mul_add((*size).max(1) as f32, 6.0),
        FormControlKind::TextArea { rows, .. } => line.mul_add((*rows).max(1) as f32, 6.0),
        _ => line + 8.0,
    };
    let geometry = tree.geometry_mut(id);
    geometry.width = width;
    geometry.ascent = height;
    geometry.descent = 0.0;
}

// ----------------------------------------------------------------------
// Containers
// ----------------------------------------------------------------------

/// A float's reserved margin band: vertical extent, width, and side.
struct MarginBand {
    top: f32,
    bottom: f32,
    width: f32,
    side: crate::style::FloatSide,
}

fn margins_at(bands: &[MarginBand], y: f32) -> (f32, f32) {
    let mut left = 0.0_f32;
    let mut right = 0.0_f32;
    for band in bands {
        if y >= band.top && y < band.bottom {
            match band.side {
                crate::style::FloatSide::Left => left = left.max(band.width),
                crate::style::FloatSide::Right => right = right.max(band.width),
            }
        }
    }
    (left, right)
}

/// Stack children of a vertical clue top-to-bottom, laying aligned floats
/// into margin bands that subsequent flows wrap around.
fn calc_cluev_size(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    let max_width = tree.geometry(id).max_width;
    let children: Vec<BoxId> = tree.children(id).to_vec();
    let floats = match tree.kind(id) {
        BoxKind::ClueV(v) => v.floats.clone(),
        _ => Vec::new(),
    };

    let mut bands: Vec<MarginBand> = Vec::new();
    let mut float_cursor = 0usize;
    let mut cursor = 0.0_f32;
    let mut widest = 0.0_f32;
    let mut previous_was_flow = false;

    let mut place_floats = |tree: &mut BoxTree,
                            bands: &mut Vec<MarginBand>,
                            float_cursor: &mut usize,
                            upto_child: usize,
                            cursor: f32| {
        while *float_cursor < floats.len() && floats[*float_cursor].anchor <= upto_child {
            let float = floats[*float_cursor].id;
            calc_size(tree, float, metrics);
            let float_geometry = *tree.geometry(float);
            let side = match tree.kind(float) {
                BoxKind::Image(img) => img.float,
                _ => None,
            }
            .unwrap_or(crate::style::FloatSide::Left);
            let x = match side {
                crate::style::FloatSide::Left => 0.0,
                crate::style::FloatSide::Right => (max_width - float_geometry.width).max(0.0),
            };
            let geometry = tree.geometry_mut(float);
            geometry.x = x;
            geometry.y = cursor;
            bands.push(MarginBand {
                top: cursor,
                bottom: cursor + float_geometry.height(),
                width: float_geometry.width,
                side,
            });
            *float_cursor += 1;
        }
    };

    for (index, child) in children.iter().copied().enumerate() {
        place_floats(tree, &mut bands, &mut float_cursor, index, cursor);

        let is_flow = matches!(tree.kind(child), BoxKind::Flow(_));
        if is_flow && previous_was_flow {
            if let BoxKind::Flow(f) = tree.kind(child) {
                cursor += f.style.vertical_spacing();
            }
        }

        if is_flow {
            let (left, right) = margins_at(&bands, cursor);
            flow::layout_flow(tree, child, metrics, left, right);
        } else {
            calc_size(tree, child, metrics);
        }

        let child_geometry = tree.geometry_mut(child);
        child_geometry.x = 0.0;
        child_geometry.y = cursor;
        cursor += child_geometry.height();
        widest = widest.max(child_geometry.width);
        previous_was_flow = is_flow;
    }
    place_floats(tree, &mut bands, &mut float_cursor, usize::MAX, cursor);

    // The clue must also contain its floats vertically.
    let float_bottom = bands.iter().map(|b| b.bottom).fold(0.0, f32::max);
    let geometry = tree.geometry_mut(id);
    geometry.width = if widest > max_width { widest } else { max_width };
    geometry.ascent = cursor.max(float_bottom);
    geometry.descent = 0.0;
}

/// Lay children of a horizontal clue left-to-right; the vertical alignment
/// policy selects each child's offset within the row.
fn calc_clueh_size(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    let valign = match tree.kind(id) {
        BoxKind::ClueH(h) => h.valign,
        _ => crate::style::VAlign::Top,
    };
    let children: Vec<BoxId> = tree.children(id).to_vec();
    for &child in &children {
        calc_size(tree, child, metrics);
    }
    let row_height = children
        .iter()
        .map(|&c| tree.geometry(c).height())
        .fold(0.0, f32::max);

    let mut x = 0.0_f32;
    for child in children {
        let height = tree.geometry(child).height();
        let y = match valign {
            crate::style::VAlign::Top => 0.0,
            crate::style::VAlign::Middle => (row_height - height) / 2.0,
            crate::style::VAlign::Bottom => row_height - height,
        };
        let geometry = tree.geometry_mut(child);
        geometry.x = x;
        geometry.y = y;
        x += geometry.width;
    }

    let geometry = tree.geometry_mut(id);
    geometry.width = x;
    geometry.ascent = row_height;
    geometry.descent = 0.0;
}
