//! Owned document model backing the grid.
//!
//! Elements live in an arena and are addressed through copyable `ElementId`
//! handles. The model is element-only (tags and attributes, no text nodes),
//! which is all the grid markup needs. Documents can be serialized to HTML
//! and imported from HTML via `scraper`.

use scraper::Html;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Handle to an element inside a [`Document`] arena.
///
/// Handles are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct ElementNode {
    tag: String,
    // Insertion-ordered so serialization is deterministic
    attrs: Vec<(String, String)>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl ElementNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

/// An element-only document tree with handle-based access.
///
/// A fresh document contains a single `body` root; all content hangs off it.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<ElementNode>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![ElementNode::new("body")],
            root: ElementId(0),
        }
    }

    /// The root element handle.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of elements in the document, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // A document always has its root
        self.nodes.len() <= 1
    }

    fn get(&self, id: ElementId) -> Result<&ElementNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| Error::Node(format!("no element {}", id)))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut ElementNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| Error::Node(format!("no element {}", id)))
    }

    /// Create a detached element and return its handle.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(ElementNode::new(tag));
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Fails when either handle is invalid or when the child is already
    /// attached somewhere.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.get(parent)?;
        let node = self.get_mut(child)?;
        if node.parent.is_some() {
            return Err(Error::Node(format!("element {} is already attached", child)));
        }
        node.parent = Some(parent);
        self.get_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Tag name of an element.
    pub fn tag(&self, id: ElementId) -> Result<&str> {
        Ok(&self.get(id)?.tag)
    }

    /// Child handles of an element, in document order.
    pub fn children(&self, id: ElementId) -> Result<&[ElementId]> {
        Ok(&self.get(id)?.children)
    }

    /// Read an attribute. Returns `None` for missing attributes and for
    /// handles that do not resolve.
    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes.get(id.0).and_then(|n| {
            n.attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, id: ElementId, name: &str, value: &str) -> Result<()> {
        let node = self.get_mut(id)?;
        if let Some(slot) = node.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            node.attrs.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    /// Find all elements matching a compound selector, in document order.
    ///
    /// Supported syntax is a single compound selector: optional tag name,
    /// `#id`, any number of `.class` and `[attr]` / `[attr=value]` parts.
    /// Combinators are not supported. The query is a one-time snapshot of
    /// the tree at call time.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let compiled = Compound::parse(selector)?;
        let mut out = Vec::new();
        // Preorder walk keeps results in document order
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if id != self.root && self.matches(id, &compiled) {
                out.push(id);
            }
            if let Ok(children) = self.children(id) {
                for child in children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        Ok(out)
    }

    fn matches(&self, id: ElementId, sel: &Compound) -> bool {
        let node = match self.nodes.get(id.0) {
            Some(n) => n,
            None => return false,
        };
        if let Some(tag) = &sel.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(want) = &sel.id {
            if self.attr(id, "id") != Some(want.as_str()) {
                return false;
            }
        }
        for class in &sel.classes {
            let found = self
                .attr(id, "class")
                .map(|v| v.split_whitespace().any(|c| c == class))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }
        for (name, value) in &sel.attrs {
            match (self.attr(id, name), value) {
                (Some(_), None) => {}
                (Some(have), Some(want)) if have == want.as_str() => {}
                _ => return false,
            }
        }
        true
    }

    /// Serialize the document body's contents to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Ok(children) = self.children(self.root) {
            for child in children {
                self.write_element(*child, &mut out);
            }
        }
        out
    }

    /// Serialize one element and its subtree.
    pub fn outer_html(&self, id: ElementId) -> Result<String> {
        self.get(id)?;
        let mut out = String::new();
        self.write_element(id, &mut out);
        Ok(out)
    }

    fn write_element(&self, id: ElementId, out: &mut String) {
        let node = match self.nodes.get(id.0) {
            Some(n) => n,
            None => return,
        };
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if is_void(&node.tag) {
            return;
        }
        for child in &node.children {
            self.write_element(*child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }

    /// SHA-256 hex digest of the serialized document, for content-addressed
    /// comparisons in golden tests.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_html().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Import an HTML fragment into a fresh document.
    ///
    /// Text nodes are dropped; only the element structure and attributes are
    /// retained.
    pub fn from_html(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let mut doc = Document::new();

        // Depth-first over scraper's tree, mirroring document order by
        // pushing children in reverse.
        let root = fragment.root_element();
        let mut stack: Vec<(scraper::ElementRef, ElementId)> = root
            .children()
            .filter_map(scraper::ElementRef::wrap)
            .rev()
            .map(|el| (el, doc.root))
            .collect();
        while let Some((el, parent)) = stack.pop() {
            let id = doc.create_element(el.value().name());
            for (name, value) in el.value().attrs() {
                let _ = doc.set_attr(id, name, value);
            }
            // Parent always exists here, append cannot fail
            let _ = doc.append_child(parent, id);
            let children: Vec<_> = el.children().filter_map(scraper::ElementRef::wrap).collect();
            for child in children.into_iter().rev() {
                stack.push((child, id));
            }
        }
        doc
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "meta" | "link")
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// A parsed compound selector: `tag#id.class[attr=value]...`
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Selector("empty selector".into()));
        }
        if input.split_whitespace().count() > 1 || input.contains('>') {
            return Err(Error::Selector(format!(
                "combinators are not supported: {:?}",
                input
            )));
        }

        let mut sel = Compound::default();
        let mut chars = input.chars().peekable();

        // Leading tag name, if any
        let mut tag = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_alphanumeric() || c == '-' {
                tag.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if !tag.is_empty() {
            sel.tag = Some(tag.to_ascii_lowercase());
        }

        while let Some(c) = chars.next() {
            match c {
                '.' | '#' => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '-' || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        return Err(Error::Selector(format!("dangling {:?} in {:?}", c, input)));
                    }
                    if c == '.' {
                        sel.classes.push(name);
                    } else {
                        sel.id = Some(name);
                    }
                }
                '[' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == ']' {
                            closed = true;
                            break;
                        }
                        body.push(n);
                    }
                    if !closed || body.is_empty() {
                        return Err(Error::Selector(format!(
                            "malformed attribute selector in {:?}",
                            input
                        )));
                    }
                    match body.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim_matches('"').trim_matches('\'');
                            sel.attrs
                                .push((name.trim().to_string(), Some(value.to_string())));
                        }
                        None => sel.attrs.push((body.trim().to_string(), None)),
                    }
                }
                other => {
                    return Err(Error::Selector(format!(
                        "unexpected {:?} in {:?}",
                        other, input
                    )))
                }
            }
        }
        Ok(sel)
    }
}
