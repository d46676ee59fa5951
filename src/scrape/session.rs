use crate::dom::Page;
use crate::error::Result;
use crate::model::{Identity, Record, normalize_handle};
use crate::scrape::pager::{JitterPolicy, Pager, ScrapeConfig, ScrapeOutcome, ScrollPolicy, StopCause};
use crate::scrape::profile::{IdentityProfile, PostProfile};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The three relation-list endpoints exposed per subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Following,
    Followers,
    VerifiedFollowers,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Following,
        RelationKind::Followers,
        RelationKind::VerifiedFollowers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Following => "following",
            RelationKind::Followers => "followers",
            RelationKind::VerifiedFollowers => "verified_followers",
        }
    }

    /// Relation-list URL for a subject handle
    pub fn url_for(&self, subject: &str) -> String {
        format!("https://x.com/{}/{}", normalize_handle(subject), self.as_str())
    }
}

/// Identities collected per relation kind for one subject, with the terminal
/// cause of each kind's scrape
#[derive(Debug, Default, Serialize)]
pub struct RelationMap {
    sets: HashMap<RelationKind, Vec<Identity>>,
    causes: HashMap<RelationKind, StopCause>,
}

impl RelationMap {
    pub fn insert(&mut self, kind: RelationKind, identities: Vec<Identity>, cause: StopCause) {
        self.sets.insert(kind, identities);
        self.causes.insert(kind, cause);
    }

    /// Identities for one relation kind, in admission order
    pub fn get(&self, kind: RelationKind) -> &[Identity] {
        self.sets.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Terminal cause of one kind's scrape
    pub fn cause(&self, kind: RelationKind) -> Option<&StopCause> {
        self.causes.get(&kind)
    }

    /// Handles present in both named relation sets, in the first set's order.
    /// Empty whenever either input set is empty.
    pub fn mutuals(&self, a: RelationKind, b: RelationKind) -> Vec<String> {
        let other: HashSet<&str> = self.get(b).iter().map(|i| i.handle.as_str()).collect();
        self.get(a)
            .iter()
            .filter(|identity| other.contains(identity.handle.as_str()))
            .map(|identity| identity.handle.clone())
            .collect()
    }

    /// Distinct handles across every collected relation kind
    pub fn total_unique(&self) -> usize {
        self.sets
            .values()
            .flatten()
            .map(|identity| identity.handle.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Caller-facing façade wiring profiles, ledger, and pagination together
/// over one exclusively-held page. One session drives one page at a time;
/// concurrent scrapes need a page each.
pub struct ScrapeSession<'p, P: Page> {
    page: &'p P,
    config: ScrapeConfig,
}

impl<'p, P: Page> ScrapeSession<'p, P> {
    pub fn new(page: &'p P) -> Self {
        Self::with_config(page, ScrapeConfig::default())
    }

    pub fn with_config(page: &'p P, config: ScrapeConfig) -> Self {
        Self { page, config }
    }

    /// Scrape posts from a search URL, capped at `max` admitted records.
    /// `context` is the provenance tag stored on every record.
    pub fn search_posts(&self, url: &str, context: &str, max: usize) -> Result<ScrapeOutcome> {
        Pager::new(self.page, self.config.clone()).run(
            &PostProfile::default(),
            url,
            Some(context),
            max,
        )
    }

    /// Scrape identities from a relation-list URL, capped at `max`
    pub fn identity_list(&self, url: &str, max: usize) -> Result<ScrapeOutcome> {
        Pager::new(self.page, self.config.clone()).run(&IdentityProfile::default(), url, None, max)
    }

    /// Scrape all three relation kinds for one subject. A failed kind yields
    /// an empty set tagged with its fault cause; the remaining kinds still
    /// run.
    pub fn relation_map(&self, subject: &str, max_per_kind: usize) -> Result<RelationMap> {
        info!("Scraping relation map for @{}", normalize_handle(subject));
        let mut map = RelationMap::default();
        let mut inter_kind_pause = JitterPolicy::new(self.config.scroll.clone());

        for kind in RelationKind::ALL {
            let url = kind.url_for(subject);
            match self.identity_list(&url, max_per_kind) {
                Ok(outcome) => {
                    let identities: Vec<Identity> = outcome
                        .records
                        .into_iter()
                        .filter_map(|record| match record {
                            Record::Identity(identity) => Some(identity),
                            Record::Post(_) => None,
                        })
                        .collect();
                    info!(
                        "{}: {} identities ({:?})",
                        kind.as_str(),
                        identities.len(),
                        outcome.cause
                    );
                    map.insert(kind, identities, outcome.cause);
                }
                Err(err) => {
                    warn!("{} scrape failed for @{}: {}", kind.as_str(), subject, err);
                    map.insert(kind, Vec::new(), StopCause::Fault(err.to_string()));
                }
            }
            // Brief pause between kinds, matching the scroll-wait jitter
            self.page.pause(inter_kind_pause.wait());
        }

        info!(
            "Relation map complete: {} unique identities",
            map.total_unique()
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identities(handles: &[&str]) -> Vec<Identity> {
        handles.iter().filter_map(|h| Identity::new(h)).collect()
    }

    #[test]
    fn test_relation_urls() {
        assert_eq!(
            RelationKind::Following.url_for("@alice"),
            "https://x.com/alice/following"
        );
        assert_eq!(
            RelationKind::VerifiedFollowers.url_for("bob"),
            "https://x.com/bob/verified_followers"
        );
    }

    #[test]
    fn test_mutuals_intersection() {
        let mut map = RelationMap::default();
        map.insert(
            RelationKind::Following,
            identities(&["alice", "bob", "carol"]),
            StopCause::Satisfied,
        );
        map.insert(
            RelationKind::Followers,
            identities(&["bob", "dave", "carol"]),
            StopCause::Stalled,
        );

        let mutual = map.mutuals(RelationKind::Following, RelationKind::Followers);
        assert_eq!(mutual, vec!["bob", "carol"]);
    }

    #[test]
    fn test_mutuals_empty_side() {
        let mut map = RelationMap::default();
        map.insert(
            RelationKind::Following,
            identities(&["alice"]),
            StopCause::Satisfied,
        );
        map.insert(RelationKind::Followers, Vec::new(), StopCause::Empty);

        assert!(map.mutuals(RelationKind::Following, RelationKind::Followers).is_empty());
        assert!(map.mutuals(RelationKind::Followers, RelationKind::Following).is_empty());
        // A kind that never ran behaves as empty
        assert!(map.mutuals(RelationKind::Following, RelationKind::VerifiedFollowers).is_empty());
    }

    #[test]
    fn test_total_unique_across_kinds() {
        let mut map = RelationMap::default();
        map.insert(
            RelationKind::Following,
            identities(&["alice", "bob"]),
            StopCause::Satisfied,
        );
        map.insert(
            RelationKind::Followers,
            identities(&["bob", "carol"]),
            StopCause::Satisfied,
        );
        assert_eq!(map.total_unique(), 3);
    }

    #[test]
    fn test_cause_recorded_per_kind() {
        let mut map = RelationMap::default();
        map.insert(RelationKind::Followers, Vec::new(), StopCause::Empty);
        assert_eq!(map.cause(RelationKind::Followers), Some(&StopCause::Empty));
        assert_eq!(map.cause(RelationKind::Following), None);
    }
}
