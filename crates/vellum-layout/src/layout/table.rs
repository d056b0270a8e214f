//! Table layout.
//!
//! The legacy two-pass width algorithm: cells with fixed or percent widths
//! get their columns pinned first, and the remaining width is distributed
//! to flexible columns in proportion to their preferred (unwrapped)
//! content width. Row heights derive from the tallest cell in each row;
//! rowspan cells stretch the rows they cover. Span handling walks the
//! pre-built slot grid and skips non-origin slots.

use crate::metrics::FontMetrics;
use crate::style::{Length, VAlign};
use crate::tree::{BoxId, BoxKind, BoxTree, CellBox, TableBox};

use super::{calc_min_width, calc_pref_width, calc_size, set_max_width};

/// Per-column sizing requirements gathered from the cells.
struct ColumnRequirements {
    min: Vec<f32>,
    pref: Vec<f32>,
    fixed: Vec<Option<f32>>,
    percent: Vec<Option<u8>>,
}

/// Everything needed from a cell during width gathering.
struct CellEntry {
    id: BoxId,
    row: usize,
    col: usize,
    colspan: usize,
    rowspan: usize,
    data: CellBox,
}

fn gather_cells(tree: &BoxTree, table: &TableBox) -> Vec<CellEntry> {
    let mut cells = Vec::new();
    for (row, col, id) in table.grid.cells() {
        if let BoxKind::TableCell(data) = tree.kind(id) {
            cells.push(CellEntry {
                id,
                row,
                col,
                colspan: data.colspan.max(1) as usize,
                rowspan: data.rowspan.max(1) as usize,
                data: *data,
            });
        }
    }
    cells
}

fn column_requirements(
    tree: &BoxTree,
    table: &TableBox,
    cells: &[CellEntry],
    metrics: &dyn FontMetrics,
) -> ColumnRequirements {
    let cols = table.grid.column_count();
    let pad = 2.0 * table.padding;
    let mut req = ColumnRequirements {
        min: vec![0.0; cols],
        pref: vec![0.0; cols],
        fixed: vec![None; cols],
        percent: vec![None; cols],
    };

    // Single-column cells pin their column directly.
    for cell in cells.iter().filter(|c| c.colspan == 1) {
        let min = calc_min_width(tree, cell.id, metrics) + pad;
        let pref = calc_pref_width(tree, cell.id, metrics) + pad;
        req.min[cell.col] = req.min[cell.col].max(min);
        req.pref[cell.col] = req.pref[cell.col].max(pref.max(min));
        match cell.data.width_attr {
            Some(Length::Pixels(px)) => {
                let pinned = req.fixed[cell.col].unwrap_or(0.0).max(px + pad);
                req.fixed[cell.col] = Some(pinned);
            }
            Some(Length::Percent(pct)) => {
                let pinned = req.percent[cell.col].unwrap_or(0).max(pct);
                req.percent[cell.col] = Some(pinned);
            }
            None => {}
        }
    }

    // Spanning cells spread any deficit evenly over the columns they cover.
    for cell in cells.iter().filter(|c| c.colspan > 1) {
        let span = cell.colspan.min(cols.saturating_sub(cell.col)).max(1);
        let gaps = table.spacing * (span - 1) as f32;
        let min = calc_min_width(tree, cell.id, metrics) + pad;
        let pref = calc_pref_width(tree, cell.id, metrics) + pad;
        let covered: std::ops::Range<usize> = cell.col..cell.col + span;

        let current_min: f32 = req.min[covered.clone()].iter().sum::<f32>() + gaps;
        if min > current_min {
            let bonus = (min - current_min) / span as f32;
            for c in covered.clone() {
                req.min[c] += bonus;
            }
        }
        let current_pref: f32 = req.pref[covered.clone()].iter().sum::<f32>() + gaps;
        if pref > current_pref {
            let bonus = (pref - current_pref) / span as f32;
            for c in covered {
                req.pref[c] = req.pref[c].max(req.min[c]) + bonus;
            }
        }
    }

    for c in 0..cols {
        req.pref[c] = req.pref[c].max(req.min[c]);
    }
    req
}

/// The intrinsic minimum width of a whole table: column minimums plus
/// border and spacing chrome.
pub fn table_min_width(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> f32 {
    let BoxKind::Table(table) = tree.kind(id) else {
        return 0.0;
    };
    let cols = table.grid.column_count();
    if cols == 0 {
        return 2.0 * table.border;
    }
    let cells = gather_cells(tree, table);
    let req = column_requirements(tree, table, &cells, metrics);
    let chrome = 2.0_f32.mul_add(table.border, table.spacing * (cols + 1) as f32);
    req.min.iter().sum::<f32>() + chrome
}

/// Distribute the available content width over the columns.
fn distribute_columns(req: &ColumnRequirements, avail: f32, has_target: bool) -> Vec<f32> {
    let cols = req.min.len();
    let mut widths = vec![0.0_f32; cols];

    // Pass one: pin fixed and percent columns, start flexible columns at
    // their preferred width.
    for c in 0..cols {
        widths[c] = if let Some(px) = req.fixed[c] {
            px.max(req.min[c])
        } else if let Some(pct) = req.percent[c] {
            (f32::from(pct) * avail / 100.0).max(req.min[c])
        } else {
            req.pref[c]
        };
    }

    let total: f32 = widths.iter().sum();

    // Pass two: grow into an explicit width, or shrink to fit.
    if total < avail && has_target {
        let flexible: Vec<usize> = (0..cols)
            .filter(|&c| req.fixed[c].is_none() && req.percent[c].is_none())
            .collect();
        let extra = avail - total;
        if flexible.is_empty() {
            let bonus = extra / cols as f32;
            for w in &mut widths {
                *w += bonus;
            }
        } else {
            let pref_sum: f32 = flexible.iter().map(|&c| req.pref[c]).sum();
            for &c in &flexible {
                let share = if pref_sum > 0.0 {
                    req.pref[c] / pref_sum
                } else {
                    1.0 / flexible.len() as f32
                };
                widths[c] += extra * share;
            }
        }
    } else if total > avail {
        // Shrink flexible columns toward their minimums first; pinned
        // columns only give way when the flexible slack runs out.
        let mut need = total - avail;
        for pinned in [false, true] {
            if need <= 0.0 {
                break;
            }
            let candidates: Vec<usize> = (0..cols)
                .filter(|&c| {
                    let is_pinned = req.fixed[c].is_some() || req.percent[c].is_some();
                    is_pinned == pinned && widths[c] > req.min[c]
                })
                .collect();
            let slack: f32 = candidates.iter().map(|&c| widths[c] - req.min[c]).sum();
            if slack <= 0.0 {
                continue;
            }
            let take = need.min(slack);
            for &c in &candidates {
                let share = (widths[c] - req.min[c]) / slack;
                widths[c] -= take * share;
            }
            need -= take;
        }
    }

    for c in 0..cols {
        widths[c] = widths[c].max(req.min[c]);
    }
    widths
}

/// Lay out a table cell as a vertical stack with internal padding.
///
/// `cell_width` is the cell's outer width (span columns plus internal
/// spacing); `padding` comes from the owning table's `cellpadding`.
pub fn layout_cell(
    tree: &mut BoxTree,
    id: BoxId,
    metrics: &dyn FontMetrics,
    cell_width: f32,
    padding: f32,
) {
    let nowrap = match tree.kind(id) {
        BoxKind::TableCell(c) => c.nowrap,
        _ => false,
    };
    let inner = (cell_width - 2.0 * padding).max(1.0);
    // nowrap suppresses line breaking by giving content unbounded room.
    let wrap_width = if nowrap { 1.0e8 } else { inner };

    let children: Vec<BoxId> = tree.children(id).to_vec();
    let mut cursor = padding;
    for child in children {
        set_max_width(tree, child, wrap_width);
        calc_size(tree, child, metrics);
        let child_geometry = tree.geometry_mut(child);
        child_geometry.x = padding;
        child_geometry.y = cursor;
        cursor += child_geometry.height();
    }

    let geometry = tree.geometry_mut(id);
    geometry.width = cell_width;
    geometry.ascent = cursor + padding;
    geometry.descent = 0.0;
}

/// Lay out a table: distribute column widths, size cells, derive row
/// heights (including rowspan stretching), and position everything.
pub fn layout_table(tree: &mut BoxTree, id: BoxId, metrics: &dyn FontMetrics) {
    let geometry = *tree.geometry(id);
    let BoxKind::Table(table) = tree.kind(id) else {
        return;
    };
    let table_data = TableBox {
        grid: table.grid.clone(),
        column_widths: Vec::new(),
        row_heights: Vec::new(),
        ..table.clone()
    };

    let rows = table_data.grid.row_count();
    let cols = table_data.grid.column_count();
    let chrome = 2.0_f32.mul_add(table_data.border, table_data.spacing * (cols + 1) as f32);

    // An empty table is just its chrome (plus any caption).
    if cols == 0 || rows == 0 {
        let caption_height = layout_caption(tree, &table_data, geometry.max_width, metrics);
        let node_geometry = tree.geometry_mut(id);
        node_geometry.width = 2.0 * table_data.border;
        node_geometry.ascent = caption_height + 2.0 * table_data.border;
        node_geometry.descent = 0.0;
        return;
    }

    let cells = gather_cells(tree, &table_data);
    let req = column_requirements(tree, &table_data, &cells, metrics);

    // The width target: a percent width was already resolved into
    // `geometry.width` by set_max_width; an explicit pixel width likewise.
    let has_target = geometry.percent.is_some()
        || matches!(table_data.width_attr, Some(Length::Pixels(_)));
    let target = if has_target {
        geometry.width
    } else {
        geometry.max_width
    };
    let avail = (target - chrome).max(0.0);

    let widths = distribute_columns(&req, avail, has_target);
    let table_width = widths.iter().sum::<f32>() + chrome;

    // Caption spans the final table width.
    let caption_height = layout_caption(tree, &table_data, table_width, metrics);
    let grid_top = if table_data.caption_at_bottom {
        0.0
    } else {
        caption_height
    };

    // Size every cell at its span width.
    for cell in &cells {
        let span = cell.colspan.min(cols - cell.col).max(1);
        let span_width = widths[cell.col..cell.col + span].iter().sum::<f32>()
            + table_data.spacing * (span - 1) as f32;
        layout_cell(tree, cell.id, metrics, span_width, table_data.padding);
        if table_data.border > 0.0 {
            if let BoxKind::TableCell(c) = tree.kind_mut(cell.id) {
                c.bevel = 1.0;
            }
        }
    }

    // Row heights from single-row cells, then stretched by rowspans.
    let mut row_heights = vec![0.0_f32; rows];
    for cell in cells.iter().filter(|c| c.rowspan == 1) {
        row_heights[cell.row] = row_heights[cell.row].max(tree.geometry(cell.id).height());
    }
    for cell in cells.iter().filter(|c| c.rowspan > 1) {
        let span = cell.rowspan.min(rows - cell.row).max(1);
        let gaps = table_data.spacing * (span - 1) as f32;
        let covered: f32 = row_heights[cell.row..cell.row + span].iter().sum::<f32>() + gaps;
        let height = tree.geometry(cell.id).height();
        if height > covered {
            let bonus = (height - covered) / span as f32;
            for h in &mut row_heights[cell.row..cell.row + span] {
                *h += bonus;
            }
        }
    }

    // Position cells, stretching each to its covered region and applying
    // the cell's vertical alignment to the content.
    let column_x = column_offsets(&widths, table_data.border, table_data.spacing);
    let row_y = row_offsets(&row_heights, grid_top + table_data.border, table_data.spacing);
    for cell in &cells {
        let row_span = cell.rowspan.min(rows - cell.row).max(1);
        let region = row_heights[cell.row..cell.row + row_span].iter().sum::<f32>()
            + table_data.spacing * (row_span - 1) as f32;
        stretch_cell(tree, cell, region);
        let cell_geometry = tree.geometry_mut(cell.id);
        cell_geometry.x = column_x[cell.col];
        cell_geometry.y = row_y[cell.row];
    }

    let grid_height = row_heights.iter().sum::<f32>()
        + table_data.spacing * (rows + 1) as f32
        + 2.0 * table_data.border;

    if table_data.caption_at_bottom {
        if let Some(caption) = table_data.caption {
            tree.geometry_mut(caption).y = grid_height;
        }
    }

    if let BoxKind::Table(t) = tree.kind_mut(id) {
        t.column_widths = widths;
        t.row_heights = row_heights;
    }
    let node_geometry = tree.geometry_mut(id);
    node_geometry.width = table_width;
    node_geometry.ascent = caption_height + grid_height;
    node_geometry.descent = 0.0;
}

/// Lay out the caption clue across the table width; returns its height.
fn layout_caption(
    tree: &mut BoxTree,
    table: &TableBox,
    table_width: f32,
    metrics: &dyn FontMetrics,
) -> f32 {
    let Some(caption) = table.caption else {
        return 0.0;
    };
    let inner = (table_width - 2.0 * table.border).max(1.0);
    set_max_width(tree, caption, inner);
    calc_size(tree, caption, metrics);
    let caption_geometry = tree.geometry_mut(caption);
    caption_geometry.x = table.border;
    caption_geometry.y = 0.0;
    caption_geometry.height()
}

/// Stretch a cell to the region its spans cover and shift its content per
/// the cell's vertical alignment.
fn stretch_cell(tree: &mut BoxTree, cell: &CellEntry, region_height: f32) {
    let content_height = tree.geometry(cell.id).height();
    let extra = region_height - content_height;
    if extra <= 0.0 {
        return;
    }
    let offset = match cell.data.valign {
        VAlign::Top => 0.0,
        VAlign::Middle => extra / 2.0,
        VAlign::Bottom => extra,
    };
    if offset > 0.0 {
        let children: Vec<BoxId> = tree.children(cell.id).to_vec();
        for child in children {
            tree.geometry_mut(child).y += offset;
        }
    }
    tree.geometry_mut(cell.id).ascent = region_height;
}

fn column_offsets(widths: &[f32], border: f32, spacing: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(widths.len());
    let mut x = border + spacing;
    for &w in widths {
        offsets.push(x);
        x += w + spacing;
    }
    offsets
}

fn row_offsets(heights: &[f32], top: f32, spacing: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(heights.len());
    let mut y = top + spacing;
    for &h in heights {
        offsets.push(y);
        y += h + spacing;
    }
    offsets
}
