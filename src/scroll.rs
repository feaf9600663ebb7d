//! Scroll viewport simulation.
//!
//! Stands in for the host's rendering/scroll pipeline: given the current
//! vertical scroll offset and an observer's options, it computes one
//! intersection update per observed element. Batches are delivered in slot
//! order; the observer only ever hears about elements it subscribed to.

use crate::layout::Slot;
use crate::observe::{IntersectionEntry, IntersectionObserver};
use crate::Viewport;

/// A vertically scrollable view over the laid-out document.
#[derive(Debug, Clone, Copy)]
pub struct ScrollViewport {
    viewport: Viewport,
    offset_y: f64,
}

impl ScrollViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            offset_y: 0.0,
        }
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Jump to an absolute offset; negative offsets clamp to the top.
    pub fn scroll_to(&mut self, y: f64) {
        self.offset_y = y.max(0.0);
    }

    pub fn scroll_by(&mut self, dy: f64) {
        self.scroll_to(self.offset_y + dy);
    }

    /// Compute the current intersection batch for the observer's watch set.
    ///
    /// The root rect is the viewport at the current offset, expanded by the
    /// observer's root margin; the ratio is visible target area over total
    /// target area.
    pub fn entries(&self, slots: &[Slot], observer: &IntersectionObserver) -> Vec<IntersectionEntry> {
        let (top, right, bottom, left) = observer
            .root_margin()
            .resolve(self.viewport.width as f64, self.viewport.height as f64);
        let root_x0 = -left;
        let root_y0 = self.offset_y - top;
        let root_x1 = self.viewport.width as f64 + right;
        let root_y1 = self.offset_y + self.viewport.height as f64 + bottom;

        let mut batch = Vec::new();
        for slot in slots {
            if !observer.is_observing(slot.element) {
                continue;
            }
            let tx0 = slot.rect.x as f64;
            let ty0 = slot.rect.y as f64;
            let tx1 = slot.rect.right() as f64;
            let ty1 = slot.rect.bottom() as f64;

            let overlap_w = (root_x1.min(tx1) - root_x0.max(tx0)).max(0.0);
            let overlap_h = (root_y1.min(ty1) - root_y0.max(ty0)).max(0.0);
            let area = slot.rect.area() as f64;
            let ratio = if area > 0.0 {
                (overlap_w * overlap_h) / area
            } else {
                0.0
            };

            batch.push(IntersectionEntry {
                target: slot.element,
                is_intersecting: observer.passes(ratio),
                intersection_ratio: ratio,
            });
        }
        batch
    }
}
