//! Grid layout primitives.
//!
//! Assigns each rendered cell a rectangle in document coordinates so the
//! scroll viewport can decide what intersects. Cells flow left-to-right and
//! wrap at the viewport width, stacked top-to-bottom.

use crate::dom::{Document, ElementId};
use crate::{Result, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Fixed cell dimensions for the grid flow.
#[derive(Debug, Clone, Copy)]
pub struct CellMetrics {
    pub width: u32,
    pub height: u32,
    pub gap: u32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            gap: 8,
        }
    }
}

/// One laid-out element: its handle plus its rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub element: ElementId,
    pub rect: Rect,
}

/// Lay out the children of `container` as a wrapping grid of fixed cells.
///
/// Returns one slot per child, in document order. The container itself
/// takes no space; the grid total height is simply the bottom of the last
/// row.
pub fn layout_grid(
    doc: &Document,
    container: ElementId,
    viewport: Viewport,
    cell: CellMetrics,
) -> Result<Vec<Slot>> {
    let gap = cell.gap as i32;
    let step_x = (cell.width + cell.gap) as i32;
    let step_y = (cell.height + cell.gap) as i32;
    let per_row = ((viewport.width.saturating_sub(cell.gap)) / (cell.width + cell.gap)).max(1);

    let mut slots = Vec::new();
    for (i, child) in doc.children(container)?.iter().enumerate() {
        let col = (i as u32 % per_row) as i32;
        let row = (i as u32 / per_row) as i32;
        slots.push(Slot {
            element: *child,
            rect: Rect {
                x: gap + col * step_x,
                y: gap + row * step_y,
                width: cell.width,
                height: cell.height,
            },
        });
    }
    Ok(slots)
}
