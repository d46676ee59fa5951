use crate::dom::locator::{FieldSpec, Probed};
use crate::error::Result;
use std::time::Duration;

/// Capability surface the extraction engine requires from a navigable
/// document. The engine depends only on this trait, never on a concrete
/// automation product; `crate::browser::CdpPage` is the CDP-backed
/// implementation and tests drive the engine with an in-memory fake.
pub trait Page {
    /// Live element handle scoped to one scan iteration. Handles must not be
    /// retained across a scroll; re-query instead.
    type Element<'a>: PageElement
    where
        Self: 'a;

    /// Navigate the document to a URL and wait for the load to settle
    fn navigate(&self, url: &str) -> Result<()>;

    /// Query all currently rendered elements matching a CSS selector.
    /// A transient failure (re-render mid-query) surfaces as
    /// `ScrapeError::StaleElement` so the caller can treat it as an empty scan.
    fn query_all(&self, css: &str) -> Result<Vec<Self::Element<'_>>>;

    /// Scroll the document down by a pixel amount
    fn scroll_by(&self, pixels: f64) -> Result<()>;

    /// Current total document height, the extent measure used for
    /// stall detection
    fn content_height(&self) -> Result<f64>;

    /// Block for the given duration
    fn pause(&self, wait: Duration);
}

/// One live element handle
pub trait PageElement {
    /// Opaque equality-comparable identifier for this handle, stable for the
    /// lifetime of the backing node. Used as the "already inspected" key so
    /// the handle itself is never stored.
    fn token(&self) -> String;

    /// The element's own rendered text
    fn text(&self) -> Result<String>;

    /// Resolve one field relative to this element. Returns `Probed::Absent`
    /// when the locator matches nothing; errors only for stale or failed
    /// evaluation, never for a missing sub-element.
    fn probe(&self, spec: &FieldSpec) -> Result<Probed>;
}
