//! Inline layout: line breaking and placement inside a flow.
//!
//! A flow holds one paragraph of inline content (text runs, images, form
//! controls, explicit breaks). Line breaking and horizontal alignment are
//! resolved here at layout time, never at parse time: the same tree can be
//! re-laid at any width.
//!
//! Text runs record the result as per-line segments; an unwrapped run ends
//! up with exactly one segment, and the draw walk issues one glyph-run
//! call per segment.

use crate::metrics::FontMetrics;
use crate::style::{FlowStyle, FontStyle, HAlign};
use crate::tree::{BoxId, BoxKind, BoxTree, LineInfo, TextSegment};

use super::{INDENT_UNIT, calc_size};

/// One item placed on the line being built.
enum Placement {
    /// A byte range of a text run, plus its baseline shift for sub/sup.
    Segment {
        child: BoxId,
        start: usize,
        end: usize,
        width: f32,
        ascent: f32,
        descent: f32,
        shift: f32,
    },
    /// An atomic inline box (image, form control).
    Atomic { child: BoxId },
}

impl Placement {
    fn width(&self, tree: &BoxTree) -> f32 {
        match self {
            Self::Segment { width, .. } => *width,
            Self::Atomic { child } => tree.geometry(*child).width,
        }
    }

    fn extents(&self, tree: &BoxTree) -> (f32, f32) {
        match self {
            Self::Segment {
                ascent, descent, ..
            } => (*ascent, *descent),
            Self::Atomic { child } => {
                let geometry = tree.geometry(*child);
                (geometry.ascent, geometry.descent)
            }
        }
    }
}

/// Accumulates placements for the current line and writes them back to the
/// tree when the line is finished.
struct LineBuilder {
    placements: Vec<Placement>,
    /// Advance position within the line, before alignment shifting.
    cursor: f32,
    base_x: f32,
    avail: f32,
    halign: HAlign,
    y: f32,
    lines: Vec<LineInfo>,
}

impl LineBuilder {
    fn new(base_x: f32, avail: f32, halign: HAlign) -> Self {
        Self {
            placements: Vec::new(),
            cursor: 0.0,
            base_x,
            avail,
            halign,
            y: 0.0,
            lines: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn remaining(&self) -> f32 {
        self.avail - self.cursor
    }

    fn push(&mut self, tree: &BoxTree, placement: Placement) {
        self.cursor += placement.width(tree);
        self.placements.push(placement);
    }

    /// Finish the current line: resolve the line box extents, apply
    /// horizontal alignment, and write segment/child positions back.
    ///
    /// `fallback_height` supplies the extents of a line with no content of
    /// its own (an explicit blank line from `<br>`, or the empty-text
    /// placeholder that keeps a flow from being empty).
    fn finish_line(&mut self, tree: &mut BoxTree, fallback: (f32, f32)) {
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        for placement in &self.placements {
            let (a, d) = placement.extents(tree);
            ascent = ascent.max(a);
            descent = descent.max(d);
        }
        if ascent + descent <= 0.0 {
            ascent = fallback.0;
            descent = fallback.1;
        }

        let slack = (self.avail - self.cursor).max(0.0);
        let dx = self.base_x
            + match self.halign {
                HAlign::Center => slack / 2.0,
                HAlign::Right => slack,
                _ => 0.0,
            };

        let baseline = self.y + ascent;
        let mut x = 0.0_f32;
        for placement in self.placements.drain(..) {
            match placement {
                Placement::Segment {
                    child,
                    start,
                    end,
                    width,
                    shift,
                    ..
                } => {
                    if let BoxKind::Text(t) = tree.kind_mut(child) {
                        t.segments.push(TextSegment {
                            start,
                            end,
                            x: x + dx,
                            baseline: baseline + shift,
                            width,
                        });
                    }
                    x += width;
                }
                Placement::Atomic { child } => {
                    let geometry = tree.geometry_mut(child);
                    geometry.x = x + dx;
                    geometry.y = baseline - geometry.ascent;
                    x += geometry.width;
                }
            }
        }

        self.lines.push(LineInfo {
            y: self.y,
            ascent,
            descent,
        });
        self.y += ascent + descent;
        self.cursor = 0.0;
    }
}

/// Lay out one flow at its propagated max width, with `left_margin` and
/// `right_margin` reserved by aligned floats in the enclosing clue.
pub fn layout_flow(
    tree: &mut BoxTree,
    id: BoxId,
    metrics: &dyn FontMetrics,
    left_margin: f32,
    right_margin: f32,
) {
    let geometry = *tree.geometry(id);
    let (style, halign, indent) = match tree.kind(id) {
        BoxKind::Flow(f) => (f.style, f.halign, f.indent),
        _ => return,
    };
    let base_x = left_margin + f32::from(indent) * INDENT_UNIT;
    let avail = (geometry.max_width - base_x - right_margin).max(1.0);
    let base_font = style.base_font();
    let fallback = (metrics.ascent(&base_font), metrics.descent(&base_font));

    let children: Vec<BoxId> = tree.children(id).to_vec();
    let mut builder = LineBuilder::new(base_x, avail, halign);

    for child in children {
        match tree.kind(child) {
            BoxKind::Break(_) => {
                builder.finish_line(tree, fallback);
            }
            BoxKind::Text(_) => {
                place_text(tree, child, metrics, &mut builder, style, fallback);
            }
            BoxKind::Anchor(_) => {
                // Zero-size; participates in no line.
                let child_geometry = tree.geometry_mut(child);
                child_geometry.x = base_x;
                child_geometry.y = builder.y;
            }
            _ => {
                calc_size(tree, child, metrics);
                let width = tree.geometry(child).width;
                if width > builder.remaining() && !builder.is_empty() {
                    builder.finish_line(tree, fallback);
                }
                builder.push(tree, Placement::Atomic { child });
            }
        }
    }
    if !builder.is_empty() {
        builder.finish_line(tree, fallback);
    }

    let total_height = builder.y;
    let lines = std::mem::take(&mut builder.lines);

    // Give text children a conservative bounding box covering the whole
    // flow, so clip culling keeps them whenever the flow is visible.
    let flow_children: Vec<BoxId> = tree.children(id).to_vec();
    for child in flow_children {
        if matches!(tree.kind(child), BoxKind::Text(_)) {
            let child_geometry = tree.geometry_mut(child);
            child_geometry.x = 0.0;
            child_geometry.y = 0.0;
            child_geometry.width = geometry.max_width;
            child_geometry.ascent = total_height;
            child_geometry.descent = 0.0;
        }
    }

    if let BoxKind::Flow(f) = tree.kind_mut(id) {
        f.lines = lines;
    }
    let flow_geometry = tree.geometry_mut(id);
    flow_geometry.width = geometry.max_width;
    flow_geometry.ascent = total_height;
    flow_geometry.descent = 0.0;
}

/// Place one text run, wrapping at soft break opportunities.
fn place_text(
    tree: &mut BoxTree,
    child: BoxId,
    metrics: &dyn FontMetrics,
    builder: &mut LineBuilder,
    flow_style: FlowStyle,
    fallback: (f32, f32),
) {
    let (text, style) = match tree.kind_mut(child) {
        BoxKind::Text(t) => {
            t.segments.clear();
            (t.text.clone(), t.style)
        }
        _ => return,
    };

    if text.is_empty() {
        // The empty-text placeholder: contributes its line height but no
        // drawable segment.
        builder.push(
            tree,
            Placement::Segment {
                child,
                start: 0,
                end: 0,
                width: 0.0,
                ascent: metrics.ascent(&style),
                descent: metrics.descent(&style),
                shift: 0.0,
            },
        );
        return;
    }

    if flow_style == FlowStyle::Pre {
        place_preformatted(tree, child, &text, style, metrics, builder, fallback);
        return;
    }

    let (ascent, descent, shift) = text_extents(&style, metrics);
    let mut cursor = 0usize;
    while cursor < text.len() {
        let rest = &text[cursor..];
        let rest_width = metrics.text_width(rest, &style);
        if rest_width <= builder.remaining() {
            builder.push(
                tree,
                Placement::Segment {
                    child,
                    start: cursor,
                    end: text.len(),
                    width: rest_width,
                    ascent,
                    descent,
                    shift,
                },
            );
            break;
        }

        match find_break_opportunity(rest, builder.remaining(), &style, metrics) {
            Some(break_at) if break_at > 0 => {
                let kept = rest[..break_at].trim_end();
                let width = metrics.text_width(kept, &style);
                builder.push(
                    tree,
                    Placement::Segment {
                        child,
                        start: cursor,
                        end: cursor + kept.len(),
                        width,
                        ascent,
                        descent,
                        shift,
                    },
                );
                builder.finish_line(tree, fallback);
                cursor += skip_leading_space(rest, break_at);
            }
            _ => {
                if builder.is_empty() {
                    // Nothing fits on a fresh line: place the first
                    // unbreakable chunk anyway and let it overflow.
                    let chunk_end = first_break(rest).unwrap_or(rest.len());
                    let kept = rest[..chunk_end].trim_end();
                    let width = metrics.text_width(kept, &style);
                    builder.push(
                        tree,
                        Placement::Segment {
                            child,
                            start: cursor,
                            end: cursor + kept.len(),
                            width,
                            ascent,
                            descent,
                            shift,
                        },
                    );
                    builder.finish_line(tree, fallback);
                    cursor += skip_leading_space(rest, chunk_end);
                } else {
                    builder.finish_line(tree, fallback);
                    cursor += skip_leading_space(rest, 0);
                }
            }
        }
    }
}

/// Place a preformatted run: split at literal newlines, never wrap.
fn place_preformatted(
    tree: &mut BoxTree,
    child: BoxId,
    text: &str,
    style: FontStyle,
    metrics: &dyn FontMetrics,
    builder: &mut LineBuilder,
    fallback: (f32, f32),
) {
    let (ascent, descent, shift) = text_extents(&style, metrics);
    let mut offset = 0usize;
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            builder.finish_line(tree, fallback);
        }
        first = false;
        if !line.is_empty() {
            let width = metrics.text_width(line, &style);
            builder.push(
                tree,
                Placement::Segment {
                    child,
                    start: offset,
                    end: offset + line.len(),
                    width,
                    ascent,
                    descent,
                    shift,
                },
            );
        }
        offset += line.len() + 1;
    }
}

/// Vertical extents of a run in `style`, with the sub/superscript baseline
/// shift folded in so line boxes grow to contain the shifted run.
fn text_extents(style: &FontStyle, metrics: &dyn FontMetrics) -> (f32, f32, f32) {
    let mut ascent = metrics.ascent(style);
    let mut descent = metrics.descent(style);
    let mut shift = 0.0;
    if style.superscript {
        shift = -ascent * 0.4;
        ascent -= shift;
    } else if style.subscript {
        shift = descent;
        descent += shift;
    }
    (ascent, descent, shift)
}

/// Find the last soft wrap opportunity in `text` whose prefix fits within
/// `max_width`. A soft wrap opportunity exists at the boundary of
/// whitespace (the start of the next word).
fn find_break_opportunity(
    text: &str,
    max_width: f32,
    style: &FontStyle,
    metrics: &dyn FontMetrics,
) -> Option<usize> {
    let mut last_fitting_break: Option<usize> = None;
    let mut prev_was_whitespace = false;

    for (byte_idx, ch) in text.char_indices() {
        let is_whitespace = ch == ' ' || ch == '\t';
        if !is_whitespace && prev_was_whitespace {
            let prefix_width = metrics.text_width(text[..byte_idx].trim_end(), style);
            if prefix_width <= max_width {
                last_fitting_break = Some(byte_idx);
            } else {
                break;
            }
        }
        prev_was_whitespace = is_whitespace;
    }
    last_fitting_break
}

/// The first soft wrap opportunity in `text`, for the overflow case.
fn first_break(text: &str) -> Option<usize> {
    let mut prev_was_whitespace = false;
    for (byte_idx, ch) in text.char_indices() {
        let is_whitespace = ch == ' ' || ch == '\t';
        if !is_whitespace && prev_was_whitespace {
            return Some(byte_idx);
        }
        prev_was_whitespace = is_whitespace;
    }
    None
}

/// Advance past the whitespace run beginning at `from`, so a wrapped
/// continuation never starts with a collapsible space.
fn skip_leading_space(text: &str, from: usize) -> usize {
    let mut end = from;
    for (idx, ch) in text[from..].char_indices() {
        if ch == ' ' || ch == '\t' {
            end = from + idx + ch.len_utf8();
        } else {
            break;
        }
    }
    end
}
