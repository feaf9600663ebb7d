//! Viewport-intersection observation and lazy source activation.
//!
//! [`IntersectionObserver`] owns the watch set: the elements currently
//! subscribed to intersection updates. It is an explicitly constructed value
//! with explicit teardown; nothing here registers global state. The
//! [`LazyLoader`] on top of it performs the one-shot side effect: on an
//! element's first reported intersection it copies the deferred `data-src`
//! attribute into `src` and permanently unsubscribes the element.

use log::{debug, warn};

use crate::dom::{Document, ElementId};
use crate::{Error, Result};

/// One margin component, absolute pixels or a percentage of the root size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginValue {
    Px(f64),
    Percent(f64),
}

impl MarginValue {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            MarginValue::Px(v) => v,
            MarginValue::Percent(v) => basis * v / 100.0,
        }
    }
}

/// Margins applied to the root rect before intersection is computed,
/// CSS order: top, right, bottom, left. Positive values grow the root, so
/// elements start intersecting before they are visually inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    /// Parse a CSS-margin-like string: one to four components, `px` or `%`
    /// units (a bare `0` is accepted).
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<MarginValue> = input
            .split_whitespace()
            .map(parse_margin_value)
            .collect::<Result<_>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [tb, lr] => (*tb, *lr, *tb, *lr),
            [t, lr, b] => (*t, *lr, *b, *lr),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => {
                return Err(Error::Config(format!(
                    "root margin needs 1-4 components, got {:?}",
                    input
                )))
            }
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Resolve to pixel offsets `(top, right, bottom, left)` against the
    /// root dimensions. Percentages of top/bottom use the root height,
    /// left/right the root width.
    pub fn resolve(&self, root_width: f64, root_height: f64) -> (f64, f64, f64, f64) {
        (
            self.top.resolve(root_height),
            self.right.resolve(root_width),
            self.bottom.resolve(root_height),
            self.left.resolve(root_width),
        )
    }
}

fn parse_margin_value(token: &str) -> Result<MarginValue> {
    if token == "0" {
        return Ok(MarginValue::Px(0.0));
    }
    let (number, ctor): (&str, fn(f64) -> MarginValue) = if let Some(n) = token.strip_suffix("px") {
        (n, MarginValue::Px)
    } else if let Some(n) = token.strip_suffix('%') {
        (n, MarginValue::Percent)
    } else {
        return Err(Error::Config(format!(
            "root margin component {:?} needs a px or % unit",
            token
        )));
    };
    number
        .parse::<f64>()
        .map(ctor)
        .map_err(|_| Error::Config(format!("bad root margin component {:?}", token)))
}

/// Observer configuration surface.
///
/// `root_margin` uses CSS-margin-like syntax; the default keeps a 30px
/// trailing vertical margin so elements begin loading slightly before they
/// scroll on-screen. `threshold` is the intersection ratio that counts as
/// intersecting; 0 means any nonzero overlap.
#[derive(Debug, Clone)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: "0px 0px 30px 0px".to_string(),
            threshold: 0.0,
        }
    }
}

/// One intersection update for an observed element, as delivered by the
/// host's scroll pipeline (or the in-crate simulation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

/// The watch set plus its firing policy.
///
/// Elements are processed per delivered batch, in batch order. An element
/// reported intersecting fires exactly once: it is removed from the watch
/// set in the same step, so later batches that mention it again (host
/// redelivery) are ignored.
#[derive(Debug)]
pub struct IntersectionObserver {
    margin: RootMargin,
    threshold: f64,
    watched: Vec<ElementId>,
}

impl IntersectionObserver {
    pub fn new(options: &ObserverOptions) -> Result<Self> {
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(Error::Config(format!(
                "threshold must be within [0, 1], got {}",
                options.threshold
            )));
        }
        Ok(Self {
            margin: RootMargin::parse(&options.root_margin)?,
            threshold: options.threshold,
            watched: Vec::new(),
        })
    }

    pub fn root_margin(&self) -> &RootMargin {
        &self.margin
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether a visible-area ratio counts as intersecting under this
    /// observer's threshold.
    pub fn passes(&self, ratio: f64) -> bool {
        if self.threshold == 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }

    /// Subscribe an element. Observing an already-watched element is a
    /// no-op.
    pub fn observe(&mut self, id: ElementId) {
        if !self.watched.contains(&id) {
            self.watched.push(id);
        }
    }

    /// Unsubscribe an element; unknown handles are ignored.
    pub fn unobserve(&mut self, id: ElementId) {
        self.watched.retain(|w| *w != id);
    }

    /// Explicit teardown: drop every subscription.
    pub fn unobserve_all(&mut self) {
        self.watched.clear();
    }

    /// Currently subscribed elements, in observation order.
    pub fn observed(&self) -> &[ElementId] {
        &self.watched
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.watched.contains(&id)
    }

    /// Process a batch of updates and return the elements that fired.
    ///
    /// Each fired element is unsubscribed before the next entry is looked
    /// at; non-intersecting elements stay subscribed for later batches.
    pub fn deliver(&mut self, entries: &[IntersectionEntry]) -> Vec<ElementId> {
        let mut fired = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            if !self.is_observing(entry.target) {
                // Stale redelivery after unsubscribe
                continue;
            }
            self.unobserve(entry.target);
            fired.push(entry.target);
        }
        fired
    }
}

/// Lazy activation of deferred image sources.
pub struct LazyLoader {
    observer: IntersectionObserver,
}

impl LazyLoader {
    pub fn new(options: &ObserverOptions) -> Result<Self> {
        Ok(Self {
            observer: IntersectionObserver::new(options)?,
        })
    }

    pub fn observer(&self) -> &IntersectionObserver {
        &self.observer
    }

    /// Snapshot-query the document and subscribe every current match.
    ///
    /// Elements added to the document afterwards are not picked up; call
    /// again to register them. Zero matches is valid and leaves the loader
    /// idle.
    pub fn attach(&mut self, doc: &Document, selector: &str) -> Result<usize> {
        let targets = doc.query_selector_all(selector)?;
        debug!("attaching to {} element(s) matching {:?}", targets.len(), selector);
        for id in &targets {
            self.observer.observe(*id);
        }
        Ok(targets.len())
    }

    /// Subscribe an explicit list of element handles, skipping the query.
    pub fn attach_elements(&mut self, elements: &[ElementId]) -> usize {
        for id in elements {
            self.observer.observe(*id);
        }
        elements.len()
    }

    /// Deliver a batch of intersection updates, activating every fired
    /// element. Returns the number of activations performed.
    pub fn deliver(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> Result<usize> {
        let mut activated = 0;
        for id in self.observer.deliver(entries) {
            match doc.attr(id, "data-src").map(str::to_owned) {
                Some(src) => {
                    doc.set_attr(id, "src", &src)?;
                    debug!("activated {} -> {}", id, src);
                    activated += 1;
                }
                None => {
                    // Fired without a deferred source; it stays unsubscribed
                    warn!("element {} fired without a data-src attribute", id);
                }
            }
        }
        Ok(activated)
    }

    /// Tear down every subscription.
    pub fn detach_all(&mut self) {
        self.observer.unobserve_all();
    }
}
