//! Grid item renderer.
//!
//! Produces the inert markup: one `img` node per item, carrying the item key
//! and the deferred source in `data-src`. Nothing here triggers loading; the
//! active `src` attribute is only ever written by the lazy loader.

use log::debug;
use url::Url;

use crate::dom::{Document, ElementId};
use crate::item::Item;
use crate::{Error, Result};

/// Builds grid markup for item lists.
pub struct Renderer {
    class_name: String,
    base: Option<Url>,
}

impl Renderer {
    /// A renderer tagging every node with `class_name` so the watcher can
    /// find them.
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            base: None,
        }
    }

    /// Resolve item sources against a base URL before rendering.
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| Error::Config(format!("bad base url {:?}: {}", base, e)))?;
        self.base = Some(url);
        Ok(self)
    }

    /// Append one `img` node per item to `container`, in input order, and
    /// return the created handles in the same order.
    ///
    /// Rendering twice appends a second full set; there is no dedup. An
    /// empty item list renders nothing and succeeds.
    pub fn render(
        &self,
        doc: &mut Document,
        container: ElementId,
        items: &[Item],
    ) -> Result<Vec<ElementId>> {
        // Surface a bad container before creating any nodes
        doc.children(container)?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let img = doc.create_element("img");
            doc.set_attr(img, "class", &self.class_name)?;
            doc.set_attr(img, "key", &item.id.to_string())?;
            doc.set_attr(img, "data-src", &self.resolve(&item.src))?;
            doc.append_child(container, img)?;
            created.push(img);
        }
        debug!("rendered {} node(s) into {}", created.len(), container);
        Ok(created)
    }

    fn resolve(&self, src: &str) -> String {
        match &self.base {
            Some(base) => base
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string()),
            None => src.to_string(),
        }
    }
}
