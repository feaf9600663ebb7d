//! The outer grid application object.
//!
//! Wires document, renderer, lazy loader, layout, and scroll viewport
//! together. Rendering and watching happen in one explicit sequence inside
//! [`ImageGrid::mount`], so there is no ready-event to wait for and no race
//! between node insertion and the watcher's registration.

use log::info;

use crate::dom::{Document, ElementId};
use crate::item::Item;
use crate::layout::{layout_grid, Slot};
use crate::observe::LazyLoader;
use crate::render::Renderer;
use crate::scroll::ScrollViewport;
use crate::{GridConfig, Result};

/// A lazily-loading image grid over an owned document.
pub struct ImageGrid {
    config: GridConfig,
    doc: Document,
    container: ElementId,
    renderer: Renderer,
    loader: LazyLoader,
    view: ScrollViewport,
    slots: Vec<Slot>,
}

impl ImageGrid {
    /// Build an empty grid: a fresh document with a `div.div_wrapper`
    /// container and a watcher configured from `config`.
    pub fn new(config: GridConfig) -> Result<Self> {
        let mut doc = Document::new();
        let container = doc.create_element("div");
        doc.set_attr(container, "class", "div_wrapper")?;
        doc.append_child(doc.root(), container)?;

        let mut renderer = Renderer::new(&config.class_name);
        if let Some(base) = &config.base_url {
            renderer = renderer.with_base(base)?;
        }
        let loader = LazyLoader::new(&config.observer)?;
        let view = ScrollViewport::new(config.viewport);

        Ok(Self {
            config,
            doc,
            container,
            renderer,
            loader,
            view,
            slots: Vec::new(),
        })
    }

    /// Render `items` into the container, lay the grid out, and subscribe
    /// the created elements to the watcher. Returns the number of nodes
    /// rendered.
    ///
    /// The watcher is handed the created handles directly, so elements
    /// fired by an earlier mount are never re-subscribed. Mounting again
    /// appends and watches a further set.
    pub fn mount(&mut self, items: &[Item]) -> Result<usize> {
        let created = self.renderer.render(&mut self.doc, self.container, items)?;
        self.slots = layout_grid(
            &self.doc,
            self.container,
            self.config.viewport,
            self.config.cell,
        )?;
        let watched = self.loader.attach_elements(&created);
        info!("mounted {} item(s), watching {}", created.len(), watched);
        Ok(created.len())
    }

    /// Jump the viewport to an absolute vertical offset.
    pub fn scroll_to(&mut self, y: f64) {
        self.view.scroll_to(y);
    }

    /// Scroll the viewport by a delta.
    pub fn scroll_by(&mut self, dy: f64) {
        self.view.scroll_by(dy);
    }

    pub fn offset_y(&self) -> f64 {
        self.view.offset_y()
    }

    /// Compute the intersection batch for the current offset and deliver it
    /// to the loader. Returns the number of elements activated by this
    /// batch.
    pub fn pump(&mut self) -> Result<usize> {
        let batch = self.view.entries(&self.slots, self.loader.observer());
        self.loader.deliver(&mut self.doc, &batch)
    }

    /// Elements still waiting for their first intersection.
    pub fn pending(&self) -> usize {
        self.loader.observer().observed().len()
    }

    /// Bottom edge of the last grid row, in document pixels.
    pub fn content_height(&self) -> i32 {
        self.slots.last().map(|s| s.rect.bottom()).unwrap_or(0)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Serialize the grid markup.
    pub fn html(&self) -> String {
        self.doc.to_html()
    }

    /// Content digest of the grid markup.
    pub fn digest(&self) -> String {
        self.doc.digest()
    }

    /// Drop every remaining subscription.
    pub fn teardown(&mut self) {
        self.loader.detach_all();
    }
}
