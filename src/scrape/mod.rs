//! The scroll-driven extraction engine
//!
//! Components, leaf to root:
//! - [`field`]: per-field probe-with-fallback extraction
//! - [`profile`]: locator/field-mapping profiles for posts and identity rows
//! - [`ledger`]: per-run deduplication of element tokens and record identities
//! - [`pager`]: the scroll/wait/re-query state machine and termination policy
//! - [`session`]: the caller-facing façade and relation-map convenience

pub mod field;
pub mod ledger;
pub mod pager;
pub mod profile;
pub mod session;

pub use field::{FieldValue, extract_field};
pub use ledger::Ledger;
pub use pager::{
    FixedPolicy, JitterPolicy, Pager, ScrapeConfig, ScrapeOutcome, ScrollPolicy, ScrollSettings,
    StopCause,
};
pub use profile::{EmptyMarker, IdentityProfile, PostProfile, Profile};
pub use session::{RelationKind, RelationMap, ScrapeSession};
