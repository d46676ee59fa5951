//! Record data model
//!
//! Records are the extracted logical entities: a post from a search feed or
//! an identity row from a relation list. They are created solely by the
//! extraction profiles, immutable once constructed, and owned by the caller
//! when a scrape returns.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// One extracted logical entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Post(Post),
    Identity(Identity),
}

impl Record {
    /// The unique key distinguishing this record from any other: the
    /// source-assigned post id, or the normalized handle. Never empty.
    pub fn identity(&self) -> &str {
        match self {
            Record::Post(post) => &post.id,
            Record::Identity(identity) => &identity.handle,
        }
    }
}

/// A post extracted from a search feed, with best-effort metadata.
/// Every field except `id` tolerates absence in the source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Source-assigned post id (last path segment of the status URL)
    pub id: String,

    /// Author handle, '@' stripped ("Unknown" when the handle span is absent)
    pub author: String,

    /// Author display name
    pub display_name: String,

    /// Body text
    pub text: String,

    /// ISO-8601 publication timestamp, or "No timestamp available"
    pub timestamp: String,

    /// Reply count as rendered ("0" when the counter is absent)
    pub replies: String,

    /// Repost count as rendered
    pub reposts: String,

    /// Like count as rendered
    pub likes: String,

    /// Bookmark count as rendered
    pub bookmarks: String,

    /// View count, when the stats group exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,

    /// Attached image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Attached video URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Video preview/thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_preview_url: Option<String>,

    /// Hashtags derived from `text`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,

    /// Direct URL to the post
    pub url: String,

    /// The query/hashtag/username context this post was found under
    pub context: String,
}

/// A user identity extracted from a relation list row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Normalized handle: '@' stripped, case preserved
    pub handle: String,
}

impl Identity {
    /// Build an identity from a raw handle string. Returns `None` when the
    /// handle is empty after normalization; an identity-less record is
    /// discarded before assembly.
    pub fn new(raw: &str) -> Option<Self> {
        let handle = normalize_handle(raw);
        if handle.is_empty() {
            None
        } else {
            Some(Self { handle })
        }
    }
}

/// Strip '@' and surrounding whitespace from a raw handle, preserving case
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().replace('@', "")
}

/// Extract `#word` hashtags from body text, in order of appearance
pub fn derive_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Search URL for posts carrying a hashtag within a date range
pub fn hashtag_search_url(tag: &str, since: &str, until: &str) -> String {
    format!(
        "https://x.com/search?q=%28%23{tag}%29+until%3A{until}+since%3A{since}&src=typed_query&f=live"
    )
}

/// Search URL for posts from one account within a date range
pub fn user_search_url(user: &str, since: &str, until: &str) -> String {
    let user = normalize_handle(user);
    format!(
        "https://x.com/search?q=%28from%3A{user}%29+until%3A{until}+since%3A{since}&src=typed_query&f=live"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_identity_accessor() {
        let identity = Identity::new("@alice").unwrap();
        assert_eq!(Record::Identity(identity).identity(), "alice");
    }

    #[test]
    fn test_normalize_handle() {
        assert_eq!(normalize_handle("@Alice"), "Alice");
        assert_eq!(normalize_handle("  @bob  "), "bob");
        assert_eq!(normalize_handle("carol"), "carol");
    }

    #[test]
    fn test_empty_identity_rejected() {
        assert!(Identity::new("@").is_none());
        assert!(Identity::new("   ").is_none());
        assert!(Identity::new("").is_none());
        assert!(Identity::new("@dave").is_some());
    }

    #[test]
    fn test_derive_hashtags() {
        let text = "big news #rustlang today, also #async_await and #2024";
        assert_eq!(derive_hashtags(text), vec!["#rustlang", "#async_await", "#2024"]);
    }

    #[test]
    fn test_derive_hashtags_empty_text() {
        assert!(derive_hashtags("").is_empty());
        assert!(derive_hashtags("no tags here").is_empty());
    }

    #[test]
    fn test_search_urls() {
        let url = hashtag_search_url("news", "2023-11-25", "2023-12-02");
        assert!(url.contains("%28%23news%29"));
        assert!(url.contains("since%3A2023-11-25"));
        assert!(url.contains("until%3A2023-12-02"));
        assert!(url.ends_with("&f=live"));

        let url = user_search_url("@alice", "2023-01-01", "2024-01-01");
        assert!(url.contains("%28from%3Aalice%29"));
    }
}
