//! Grid item data model.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One entry of the grid: an identifier plus a resource locator.
///
/// Items are plain data supplied by the caller and read once at render
/// time; the grid never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier, rendered into the element's `key` attribute
    pub id: u64,
    /// Resource locator, rendered into the element's deferred `data-src`
    pub src: String,
}

impl Item {
    pub fn new(id: u64, src: impl Into<String>) -> Self {
        Self {
            id,
            src: src.into(),
        }
    }
}

/// Decode an item list from a JSON array, e.g. loaded from a data file.
pub fn items_from_json(json: &str) -> Result<Vec<Item>> {
    Ok(serde_json::from_str(json)?)
}
