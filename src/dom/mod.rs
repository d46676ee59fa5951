//! Document query abstractions
//!
//! This module defines the capability surface the extraction engine consumes:
//! - Locator/FieldSpec: declarative per-field queries with declared fallbacks
//! - Page/PageElement: a navigable document and its short-lived element handles
//!
//! The concrete CDP-backed implementation lives in [`crate::browser`].

pub mod locator;
pub mod page;

pub use locator::{Fallback, FieldSpec, Locator, Probed, Target};
pub use page::{Page, PageElement};
