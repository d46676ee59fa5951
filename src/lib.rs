//! # scroll-scraper
//!
//! A scroll-driven extraction engine for infinite-scroll feeds, built on the
//! Chrome DevTools Protocol (CDP).
//!
//! The engine drives a pagination loop — scroll, wait, re-query — over a
//! lazily rendered document, deduplicates records across overlapping renders
//! by identity, and terminates deterministically: target reached, explicit
//! empty state, load timeout, stall ceiling, or fault. Per-field extraction
//! is probe-with-fallback, so a missing counter or media element never costs
//! the rest of the record.
//!
//! ## Scraping a search feed
//!
//! ```rust,no_run
//! use scroll_scraper::{BrowserSession, LaunchOptions, ScrapeSession};
//! use scroll_scraper::model::hashtag_search_url;
//!
//! # fn main() -> scroll_scraper::Result<()> {
//! let browser = BrowserSession::launch(LaunchOptions::default())?;
//! let page = browser.page()?;
//!
//! let session = ScrapeSession::new(&page);
//! let url = hashtag_search_url("rustlang", "2024-01-01", "2024-02-01");
//! let outcome = session.search_posts(&url, "rustlang", 50)?;
//!
//! println!("{} records, stopped because {:?}", outcome.records.len(), outcome.cause);
//! # Ok(())
//! # }
//! ```
//!
//! ## Scraping a relation network
//!
//! ```rust,no_run
//! use scroll_scraper::{BrowserSession, LaunchOptions, ScrapeSession};
//! use scroll_scraper::scrape::RelationKind;
//!
//! # fn main() -> scroll_scraper::Result<()> {
//! let browser = BrowserSession::launch(LaunchOptions::default())?;
//! let page = browser.page()?;
//!
//! let map = ScrapeSession::new(&page).relation_map("some_user", 100)?;
//! let mutuals = map.mutuals(RelationKind::Following, RelationKind::Followers);
//! println!("{} mutual relations", mutuals.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session management and the CDP page adapter
//! - [`dom`]: the `Page`/`PageElement` capability traits and field locators
//! - [`model`]: the `Record` data model (posts and identities)
//! - [`scrape`]: extraction profiles, dedup ledger, pagination loop, façade
//! - [`error`]: error types and result alias

pub mod browser;
pub mod dom;
pub mod error;
pub mod model;
pub mod scrape;

pub use browser::{BrowserSession, CdpPage, ConnectionOptions, LaunchOptions};
pub use dom::{FieldSpec, Locator, Page, PageElement, Probed};
pub use error::{Result, ScrapeError};
pub use model::{Identity, Post, Record};
pub use scrape::{
    Pager, RelationKind, RelationMap, ScrapeConfig, ScrapeOutcome, ScrapeSession, StopCause,
};
