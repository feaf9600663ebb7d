//! Lazygrid
//!
//! A lazy-loading image grid engine: renders a grid of image elements into
//! an owned document and defers activation of each element's real source
//! until it scrolls near the viewport.
//!
//! # Design
//!
//! - **Explicit ownership**: the watcher is a constructed value with explicit
//!   teardown, not a global registry
//! - **Handle-based wiring**: the renderer hands the watcher the created
//!   element handles directly; selector snapshot queries remain available
//! - **One-shot activation**: an element fires at most once and is
//!   unsubscribed the instant it does
//!
//! # Example
//!
//! ```
//! use lazygrid::{new_grid, GridConfig, Item};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut grid = new_grid(GridConfig::default())?;
//! grid.mount(&[Item::new(1, "a.png"), Item::new(2, "b.png")])?;
//!
//! // Nothing is loaded until the viewport reports intersection
//! let activated = grid.pump()?;
//! assert_eq!(activated, 2);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

// Owned document model standing in for the host DOM
pub mod dom;

// Item data model
pub mod item;

// Grid markup renderer
pub mod render;

// Intersection observation and lazy activation (the core)
pub mod observe;

// Layout rects and the scroll-pipeline stand-in
pub mod layout;
pub mod scroll;

mod grid;
pub use grid::ImageGrid;
pub use item::{items_from_json, Item};
pub use layout::CellMetrics;
pub use observe::{IntersectionEntry, IntersectionObserver, LazyLoader, ObserverOptions};

/// Configuration for the image grid
///
/// Defaults are the conservative ones: a 1280x720 viewport, grid cells of
/// 200x150 with an 8px gap, the `image` watch class, and an observer with a
/// 30px trailing vertical margin so loading starts slightly before elements
/// are visually on-screen.
///
/// # Examples
///
/// ```
/// let cfg = lazygrid::GridConfig::default();
/// assert_eq!(cfg.class_name, "image");
/// ```
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Class attribute marking watch targets
    pub class_name: String,
    /// Grid cell dimensions used by layout
    pub cell: CellMetrics,
    /// Intersection observer options (root margin, threshold)
    pub observer: ObserverOptions,
    /// Optional base URL item sources are resolved against
    pub base_url: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            class_name: "image".to_string(),
            cell: CellMetrics::default(),
            observer: ObserverOptions::default(),
            base_url: None,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Create a new grid with the given configuration
///
/// Validates the configuration (root margin syntax, threshold range, base
/// URL) and returns the assembled [`ImageGrid`].
pub fn new_grid(config: GridConfig) -> Result<ImageGrid> {
    ImageGrid::new(config)
}
