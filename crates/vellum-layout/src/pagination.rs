//! Pagination: carving the laid-out document into page-sized slices.
//!
//! The driver repeatedly asks the box tree "what is the furthest offset at
//! or before `limit` where a clean split is legal". Containers answer
//! recursively: a vertical clue allows splits at child boundaries, a flow
//! between its lines, a table between its rows. Nothing allows a
//! split inside a single line. When no usable split lands inside the
//! minimum-fill fraction of a page, a hard split is forced at exactly one
//! page height, so pathological content (one enormous image) still
//! paginates.

use crate::tree::{BoxId, BoxKind, BoxTree};

/// Default minimum-fill fraction: a found split must leave the page at
/// least this full, or the driver forces a hard split instead.
pub const DEFAULT_MIN_FILL: f32 = 0.75;

/// One page's vertical slice of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Document offset of the page top.
    pub start: f32,
    /// Document offset just past the page content.
    pub end: f32,
}

impl PageSlice {
    /// Content height of this page.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.end - self.start
    }
}

/// The furthest legal split offset at or before `limit`, in coordinates
/// local to `id`'s subtree. Returns 0.0 when the subtree offers no usable
/// split in range.
#[must_use]
pub fn find_page_split(tree: &BoxTree, id: BoxId, limit: f32) -> f32 {
    if limit <= 0.0 {
        return 0.0;
    }
    let mut best = 0.0_f32;

    match tree.kind(id) {
        BoxKind::ClueV(_) | BoxKind::ClueH(_) => {
            for &child in tree.children(id) {
                let geometry = tree.geometry(child);
                let top = geometry.y;
                let bottom = geometry.y + geometry.height();
                // The boundary above a child is always clean.
                if top <= limit {
                    best = best.max(top);
                }
                // So is the boundary below it.
                if bottom <= limit {
                    best = best.max(bottom);
                }
                // A child straddling the limit may offer an inner split.
                if top < limit && bottom > limit {
                    let inner = find_page_split(tree, child, limit - top);
                    if inner > 0.0 {
                        best = best.max(top + inner);
                    }
                }
            }
        }
        BoxKind::Flow(f) => {
            // Between lines, never inside one.
            for line in &f.lines {
                if line.y > 0.0 && line.y <= limit {
                    best = best.max(line.y);
                }
            }
        }
        BoxKind::Table(t) => {
            // Between rows: the spacing band above each row is clean.
            let grid_top = if t.caption_at_bottom {
                0.0
            } else {
                t.caption.map_or(0.0, |c| tree.geometry(c).height())
            };
            let mut y = grid_top + t.border + t.spacing;
            for (index, height) in t.row_heights.iter().enumerate() {
                if index > 0 && y - t.spacing <= limit {
                    best = best.max(y - t.spacing);
                }
                y += height + t.spacing;
            }
        }
        _ => {}
    }

    best
}

/// Carve the document rooted at `root` into pages of `body_height`.
///
/// Every page's content height is at most `body_height` except none: a
/// forced split is exactly one page high, and found splits are shorter.
/// The returned slice starts are strictly increasing.
#[must_use]
pub fn paginate(tree: &BoxTree, root: BoxId, body_height: f32, min_fill: f32) -> Vec<PageSlice> {
    let document_height = tree.geometry(root).height();
    if document_height <= 0.0 || body_height <= 0.0 {
        return vec![PageSlice {
            start: 0.0,
            end: document_height.max(0.0),
        }];
    }

    let mut pages = Vec::new();
    let mut start = 0.0_f32;
    while start < document_height - 0.01 {
        let limit = start + body_height;
        if document_height <= limit {
            pages.push(PageSlice {
                start,
                end: document_height,
            });
            break;
        }

        let split = find_page_split(tree, root, limit);
        let end = if split <= min_fill.mul_add(body_height, start) {
            // No usable split inside the minimum fill: force a hard break
            // at exactly one page height.
            limit
        } else {
            split
        };
        pages.push(PageSlice { start, end });
        start = end;
    }

    if pages.is_empty() {
        pages.push(PageSlice {
            start: 0.0,
            end: document_height,
        });
    }
    pages
}
