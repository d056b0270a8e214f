//! The draw walk: box tree in, painter calls out.
//!
//! The walk is backend-agnostic and clip-culled: subtrees whose bounds
//! fall outside the clip rectangle are skipped entirely. Coordinates
//! accumulate down the tree (`tx`/`ty` carry the parent origin), since
//! node geometry is parent-relative.

use crate::layout::INDENT_UNIT;
use crate::style::{ColorValue, FlowStyle, FontStyle, HAlign};
use crate::tree::{BoxId, BoxKind, BoxTree, Rect};

use super::painter::{BorderStyle, Painter};

/// Draw the subtree rooted at `id` through `painter`, limited to `clip`
/// (absolute engine-pixel coordinates). `tx`/`ty` translate the subtree,
/// which is how scrolling and per-page offsets are applied.
pub fn draw(
    tree: &BoxTree,
    id: BoxId,
    painter: &mut dyn Painter,
    clip: &Rect,
    tx: f32,
    ty: f32,
) {
    let geometry = tree.geometry(id);
    let bounds = Rect::new(
        tx + geometry.x,
        ty + geometry.y,
        geometry.width.max(geometry.max_width),
        geometry.height(),
    );
    if !bounds.intersects(clip) {
        return;
    }
    let x = tx + geometry.x;
    let y = ty + geometry.y;

    match tree.kind(id) {
        BoxKind::ClueV(v) => {
            if let Some(background) = v.background {
                painter.draw_background(
                    Rect::new(x, y, geometry.width, geometry.height()),
                    background,
                );
            }
            for float in &v.floats {
                draw(tree, float.id, painter, clip, x, y);
            }
            for &child in tree.children(id) {
                draw(tree, child, painter, clip, x, y);
            }
        }
        BoxKind::ClueH(_) => {
            for &child in tree.children(id) {
                draw(tree, child, painter, clip, x, y);
            }
        }
        BoxKind::Flow(_) => {
            draw_marker(tree, id, painter, x, y);
            for &child in tree.children(id) {
                draw(tree, child, painter, clip, x, y);
            }
        }
        BoxKind::Text(t) => {
            for segment in &t.segments {
                if segment.end > segment.start {
                    let run = &t.text[segment.start..segment.end];
                    painter.draw_text(x + segment.x, y + segment.baseline, run, &t.style, t.color);
                    draw_decorations(painter, t.style, t.color, x + segment.x, y + segment.baseline, segment.width);
                }
            }
        }
        BoxKind::Image(img) => {
            let content = Rect::new(
                x + img.hspace + img.border,
                y + img.vspace + img.border,
                (geometry.width - 2.0 * (img.hspace + img.border)).max(1.0),
                (geometry.ascent - 2.0 * (img.vspace + img.border)).max(1.0),
            );
            painter.draw_image(content, &img.src);
            if img.border > 0.0 {
                painter.draw_border(
                    Rect::new(
                        x + img.hspace,
                        y + img.vspace,
                        geometry.width - 2.0 * img.hspace,
                        geometry.ascent - 2.0 * img.vspace,
                    ),
                    img.border,
                    BorderStyle::Solid,
                    ColorValue::BLACK,
                );
            }
        }
        BoxKind::Rule(rule) => {
            let slack = (geometry.max_width - geometry.width).max(0.0);
            let dx = match rule.halign {
                HAlign::Center | HAlign::None => slack / 2.0,
                HAlign::Right => slack,
                HAlign::Left => 0.0,
            };
            let rect = Rect::new(
                x + dx,
                y + (geometry.height() - rule.size) / 2.0,
                geometry.width,
                rule.size.max(1.0),
            );
            if rule.noshade {
                painter.fill_rect(rect, ColorValue::rgb(128, 128, 128));
            } else {
                painter.draw_border(rect, 1.0, BorderStyle::Inset, ColorValue::rgb(192, 192, 192));
            }
        }
        BoxKind::Table(t) => {
            let grid_top = if t.caption_at_bottom {
                0.0
            } else {
                t.caption.map_or(0.0, |c| tree.geometry(c).height())
            };
            if let Some(bgcolor) = t.bgcolor {
                painter.draw_background(
                    Rect::new(x, y + grid_top, geometry.width, geometry.height() - grid_top),
                    bgcolor,
                );
            }
            if t.border > 0.0 {
                painter.draw_border(
                    Rect::new(x, y + grid_top, geometry.width, geometry.height() - grid_top),
                    t.border,
                    BorderStyle::Outset,
                    ColorValue::rgb(192, 192, 192),
                );
            }
            if let Some(caption) = t.caption {
                draw(tree, caption, painter, clip, x, y);
            }
            for &child in tree.children(id) {
                draw(tree, child, painter, clip, x, y);
            }
        }
        BoxKind::TableCell(cell) => {
            let rect = Rect::new(x, y, geometry.width, geometry.height());
            if let Some(bgcolor) = cell.bgcolor {
                painter.draw_background(rect, bgcolor);
            }
            if cell.bevel > 0.0 {
                painter.draw_border(rect, cell.bevel, BorderStyle::Inset, ColorValue::rgb(192, 192, 192));
            }
            for &child in tree.children(id) {
                draw(tree, child, painter, clip, x, y);
            }
        }
        BoxKind::FormControl(control) => {
            draw_control(painter, control, Rect::new(x, y, geometry.width, geometry.height()));
        }
        BoxKind::Anchor(_) | BoxKind::Break(_) => {}
    }
}

/// Draw a flow's list-item marker right-aligned in its indent gutter, on
/// the first line's baseline.
fn draw_marker(tree: &BoxTree, id: BoxId, painter: &mut dyn Painter, x: f32, y: f32) {
    let BoxKind::Flow(f) = tree.kind(id) else {
        return;
    };
    let Some(marker) = &f.marker else { return };
    let Some(first_line) = f.lines.first() else {
        return;
    };
    let style = if f.style == FlowStyle::ListItem {
        FontStyle::DEFAULT
    } else {
        f.style.base_font()
    };
    let width = painter.metrics().text_width(&marker.text, &style);
    let gutter_right = x + f32::from(f.indent) * INDENT_UNIT - 6.0;
    painter.draw_text(
        (gutter_right - width).max(x),
        y + first_line.y + first_line.ascent,
        &marker.text,
        &style,
        ColorValue::BLACK,
    );
}

/// Underline and strike-through decoration for one text segment.
fn draw_decorations(
    painter: &mut dyn Painter,
    style: FontStyle,
    color: ColorValue,
    x: f32,
    baseline: f32,
    width: f32,
) {
    if width <= 0.0 {
        return;
    }
    if style.underline {
        let y = baseline + 1.5;
        painter.draw_line(x, y, x + width, y, color);
    }
    if style.strikeout {
        let y = baseline - style.size_px() * 0.3;
        painter.draw_line(x, y, x + width, y, color);
    }
}

/// Draw a form control at the box-model boundary: a bordered rect with a
/// value or label, never a native widget.
fn draw_control(painter: &mut dyn Painter, control: &crate::tree::FormControlBox, rect: Rect) {
    use crate::tree::FormControlKind;

    let gray = ColorValue::rgb(192, 192, 192);
    let text_style = FontStyle::DEFAULT;
    let text_color = if control.disabled {
        ColorValue::rgb(128, 128, 128)
    } else {
        ColorValue::BLACK
    };

    match &control.kind {
        FormControlKind::Hidden => {}
        FormControlKind::Checkbox { checked } | FormControlKind::Radio { checked } => {
            painter.draw_border(rect, 1.0, BorderStyle::Inset, gray);
            if *checked {
                let inner = Rect::new(
                    rect.x + 4.0,
                    rect.y + 4.0,
                    (rect.width - 8.0).max(1.0),
                    (rect.height - 8.0).max(1.0),
                );
                painter.fill_rect(inner, text_color);
            }
        }
        FormControlKind::Submit { label }
        | FormControlKind::Reset { label }
        | FormControlKind::Button { label } => {
            painter.fill_rect(rect, gray);
            painter.draw_border(rect, 2.0, BorderStyle::Outset, gray);
            let width = painter.metrics().text_width(label, &text_style);
            let ascent = painter.metrics().ascent(&text_style);
            painter.draw_text(
                rect.x + (rect.width - width).max(0.0) / 2.0,
                rect.y + (rect.height + ascent) / 2.0 - 2.0,
                label,
                &text_style,
                text_color,
            );
        }
        FormControlKind::TextInput { password, .. } => {
            painter.fill_rect(rect, ColorValue::WHITE);
            painter.draw_border(rect, 1.0, BorderStyle::Inset, gray);
            let shown = if *password {
                "*".repeat(control.value.chars().count())
            } else {
                control.value.clone()
            };
            let ascent = painter.metrics().ascent(&text_style);
            painter.draw_text(rect.x + 4.0, rect.y + (rect.height + ascent) / 2.0 - 2.0, &shown, &text_style, text_color);
        }
        FormControlKind::Select { options, .. } => {
            painter.fill_rect(rect, ColorValue::WHITE);
            painter.draw_border(rect, 1.0, BorderStyle::Inset, gray);
            let shown = options
                .iter()
                .find(|o| o.selected)
                .or_else(|| options.first())
                .map(|o| o.label.as_str())
                .unwrap_or("");
            let ascent = painter.metrics().ascent(&text_style);
            painter.draw_text(rect.x + 4.0, rect.y + (rect.height + ascent) / 2.0 - 2.0, shown, &text_style, text_color);
        }
        FormControlKind::TextArea { text, .. } => {
            painter.fill_rect(rect, ColorValue::WHITE);
            painter.draw_border(rect, 1.0, BorderStyle::Inset, gray);
            let ascent = painter.metrics().ascent(&text_style);
            let line_height = painter.metrics().line_height(&text_style);
            for (i, line) in text.lines().enumerate() {
                let baseline = (i as f32).mul_add(line_height, rect.y + 3.0 + ascent);
                if baseline > rect.y + rect.height {
                    break;
                }
                painter.draw_text(rect.x + 4.0, baseline, line, &text_style, text_color);
            }
        }
    }
}
