//! The table cell grid.
//!
//! Tables are built incrementally while parsing: rows are opened one at a
//! time and cells are placed left-to-right, skipping slots already
//! occupied by a rowspan from an earlier row. Span handling works by
//! reserving grid slots when a cell is placed and marking them occupied
//! in later rows, so layout can walk a rectangular grid and simply skip
//! non-origin slots.

use serde::Serialize;

use super::BoxId;

/// One slot of the table grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Slot {
    /// Nothing here (short row).
    #[default]
    Empty,
    /// The top-left slot of a cell: layout places the cell here.
    Origin(BoxId),
    /// Covered by a rowspan/colspan of the referenced cell.
    Spanned(BoxId),
}

/// Remaining rowspan coverage for one column while building.
#[derive(Debug, Clone, Copy, Serialize)]
struct DownSpan {
    remaining: u32,
    cell: BoxId,
}

/// The (row, column) → cell mapping of a table, including span occupancy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableGrid {
    rows: Vec<Vec<Slot>>,
    /// Per-column rowspan carry-over from earlier rows.
    down: Vec<Option<DownSpan>>,
    /// Column cursor within the row being built.
    cursor: usize,
}

impl TableGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (the widest row).
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True if no row was ever started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The slot at (row, column); out-of-range slots read as empty.
    #[must_use]
    pub fn slot(&self, row: usize, col: usize) -> Slot {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Slot::Empty)
    }

    /// The cell whose origin is at (row, column), if any.
    #[must_use]
    pub fn origin_at(&self, row: usize, col: usize) -> Option<BoxId> {
        match self.slot(row, col) {
            Slot::Origin(id) => Some(id),
            _ => None,
        }
    }

    /// Start a new row: carry rowspan coverage down from earlier rows and
    /// reset the cell cursor.
    pub fn start_row(&mut self) {
        let mut row = Vec::new();
        for down in &mut self.down {
            let slot = match down {
                Some(span) if span.remaining > 0 => {
                    span.remaining -= 1;
                    let covered = Slot::Spanned(span.cell);
                    if span.remaining == 0 {
                        *down = None;
                    }
                    covered
                }
                _ => Slot::Empty,
            };
            row.push(slot);
        }
        self.rows.push(row);
        self.cursor = 0;
    }

    /// Place a cell in the row being built, skipping slots occupied by
    /// spans from earlier rows. Returns the (row, column) of the cell's
    /// origin slot.
    ///
    /// A `rowspan`/`colspan` of 0 is treated as 1, the legacy engines'
    /// clamp for nonsense values.
    ///
    /// # Panics
    /// Panics if no row was started, which indicates an engine bug (the
    /// dispatch layer synthesizes a row before the first cell).
    pub fn add_cell(&mut self, cell: BoxId, rowspan: u32, colspan: u32) -> (usize, usize) {
        let rowspan = rowspan.max(1);
        let colspan = colspan.max(1).min(1000) as usize;
        let row_idx = self.rows.len().checked_sub(1).expect("add_cell before start_row");

        // Skip past slots covered by rowspans from above.
        while self.slot(row_idx, self.cursor) != Slot::Empty {
            self.cursor += 1;
        }
        let col_idx = self.cursor;

        let needed = col_idx + colspan;
        let row = &mut self.rows[row_idx];
        if row.len() < needed {
            row.resize(needed, Slot::Empty);
        }
        if self.down.len() < needed {
            self.down.resize(needed, None);
        }

        row[col_idx] = Slot::Origin(cell);
        for slot in &mut row[col_idx + 1..needed] {
            *slot = Slot::Spanned(cell);
        }
        if rowspan > 1 {
            for down in &mut self.down[col_idx..needed] {
                *down = Some(DownSpan {
                    remaining: rowspan - 1,
                    cell,
                });
            }
        }
        self.cursor = needed;
        (row_idx, col_idx)
    }

    /// Iterate over every origin cell with its grid position.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, BoxId)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, slot)| match slot {
                Slot::Origin(id) => Some((r, c, *id)),
                _ => None,
            })
        })
    }
}
