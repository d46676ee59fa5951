//! Browser session management and the CDP-backed page adapter
//!
//! [`BrowserSession`] launches or connects to a Chrome/Chromium instance;
//! [`CdpPage`] exposes its active tab through the [`crate::dom::Page`]
//! capability the extraction engine consumes.

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::{CdpElement, CdpPage};
pub use session::BrowserSession;
