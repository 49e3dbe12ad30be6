//! Grid placement of widgets
//!
//! The panel is split into equally sized cells. Cell sizes use integer
//! division, the remainder pixels on the right and bottom edge are never part
//! of a cell.

use crate::rect::Rect;

/// Columns of the dashboard grid
pub const GRID_COLS: u32 = 4;
/// Rows of the dashboard grid
pub const GRID_ROWS: u32 = 3;

/// A fixed grid over the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cols: u32,
    rows: u32,
    width: u32,
    height: u32,
}

impl Grid {
    /// Grid of `cols` x `rows` cells over a `width` x `height` panel
    ///
    /// A zero column or row count is treated as one.
    pub const fn new(cols: u32, rows: u32, width: u32, height: u32) -> Grid {
        Grid {
            cols: if cols == 0 { 1 } else { cols },
            rows: if rows == 0 { 1 } else { rows },
            width,
            height,
        }
    }

    /// The dashboard grid ([`GRID_COLS`] x [`GRID_ROWS`]) over a panel
    pub const fn for_panel(width: u32, height: u32) -> Grid {
        Grid::new(GRID_COLS, GRID_ROWS, width, height)
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cell_width(&self) -> u32 {
        self.width / self.cols
    }

    pub const fn cell_height(&self) -> u32 {
        self.height / self.rows
    }

    /// Pixel rectangle of a widget at cell `(col, row)` spanning
    /// `span_cols` x `span_rows` cells.
    ///
    /// Placement is not checked against the grid, see
    /// [`DashboardConfig::validate`](crate::config::DashboardConfig::validate).
    pub fn grid_to_pixels(&self, col: u32, row: u32, span_cols: u32, span_rows: u32) -> Rect {
        let cell_w = self.cell_width();
        let cell_h = self.cell_height();
        Rect::new(
            col.saturating_mul(cell_w),
            row.saturating_mul(cell_h),
            span_cols.saturating_mul(cell_w),
            span_rows.saturating_mul(cell_h),
        )
    }

    /// Whether the cells `(col, row)` to `(col + span_cols, row + span_rows)`
    /// are all inside the grid
    pub fn contains(&self, col: u32, row: u32, span_cols: u32, span_rows: u32) -> bool {
        span_cols > 0
            && span_rows > 0
            && col
                .checked_add(span_cols)
                .map_or(false, |end| end <= self.cols)
            && row
                .checked_add(span_rows)
                .map_or(false, |end| end <= self.rows)
    }
}
