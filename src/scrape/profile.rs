use crate::dom::{FieldSpec, PageElement};
use crate::error::Result;
use crate::model::{Identity, Post, Record, derive_hashtags, normalize_handle};
use crate::scrape::field::extract_field;

/// Locator for the source's explicit "no results" indicator
#[derive(Debug, Clone)]
pub struct EmptyMarker {
    /// CSS selector for the indicator element
    pub css: String,

    /// Text the indicator must contain to count as an empty signal.
    /// `None` means presence alone is the signal.
    pub text_contains: Option<String>,
}

/// A locator/field-mapping profile: which elements are record candidates,
/// what signals an empty result, and how one candidate becomes a record.
/// The pagination loop is shared; profiles are the only thing that differs
/// between post search and identity-list scraping.
pub trait Profile {
    /// Short name for logging
    fn kind(&self) -> &'static str;

    /// CSS selector matching all candidate record elements
    fn candidates(&self) -> &str;

    /// The source's explicit empty indicator
    fn empty_marker(&self) -> &EmptyMarker;

    /// Consecutive no-growth scrolls tolerated before the loop stops
    fn default_stall_ceiling(&self) -> u32;

    /// Build a record from one candidate element. Identity resolves first:
    /// if it cannot be established the element yields `None` with no further
    /// probing, and nothing is counted toward the target.
    fn assemble<E: PageElement>(&self, element: &E, context: Option<&str>)
    -> Result<Option<Record>>;
}

/// Profile for post-search feeds
#[derive(Debug, Clone)]
pub struct PostProfile {
    pub candidates: String,
    pub empty: EmptyMarker,
    pub link: FieldSpec,
    pub author: FieldSpec,
    pub display_name: FieldSpec,
    pub text: FieldSpec,
    pub timestamp: FieldSpec,
    pub replies: FieldSpec,
    pub reposts: FieldSpec,
    pub likes: FieldSpec,
    pub bookmarks: FieldSpec,
    pub stats_group: FieldSpec,
    pub image: FieldSpec,
    pub video: FieldSpec,
    pub video_preview: FieldSpec,
}

impl Default for PostProfile {
    fn default() -> Self {
        Self {
            candidates: "article[data-testid=\"tweet\"]".to_string(),
            empty: EmptyMarker {
                css: "span.css-1jxf684".to_string(),
                text_contains: Some("No results".to_string()),
            },
            link: FieldSpec::attr("a[href*=\"/status/\"]", "href"),
            author: FieldSpec::text_containing("span", "@").or_value("Unknown"),
            display_name: FieldSpec::text("div[data-testid=\"User-Name\"] span").or_value(""),
            text: FieldSpec::text("div[data-testid=\"tweetText\"]").or_value(""),
            timestamp: FieldSpec::attr("time", "datetime").or_value("No timestamp available"),
            replies: FieldSpec::text("button[data-testid=\"reply\"]").or_value("0"),
            reposts: FieldSpec::text("button[data-testid=\"retweet\"]").or_value("0"),
            likes: FieldSpec::text("button[data-testid=\"like\"]").or_value("0"),
            bookmarks: FieldSpec::text("button[data-testid=\"bookmark\"]").or_value("0"),
            stats_group: FieldSpec::text("[role=\"group\"]"),
            image: FieldSpec::attr("div[data-testid=\"tweetPhoto\"] img", "src"),
            video: FieldSpec::attr("div[data-testid=\"videoPlayer\"] video", "src"),
            video_preview: FieldSpec::attr("div[data-testid=\"videoPlayer\"] video", "poster"),
        }
    }
}

impl Profile for PostProfile {
    fn kind(&self) -> &'static str {
        "post"
    }

    fn candidates(&self) -> &str {
        &self.candidates
    }

    fn empty_marker(&self) -> &EmptyMarker {
        &self.empty
    }

    fn default_stall_ceiling(&self) -> u32 {
        10
    }

    fn assemble<E: PageElement>(
        &self,
        element: &E,
        context: Option<&str>,
    ) -> Result<Option<Record>> {
        // Identity first: no status link, no record
        let Some(url) = extract_field(element, &self.link)?.into_value() else {
            return Ok(None);
        };
        let id = url.rsplit('/').next().unwrap_or("").to_string();
        if id.is_empty() {
            return Ok(None);
        }

        let author = normalize_handle(
            &extract_field(element, &self.author)?
                .into_value()
                .unwrap_or_default(),
        );
        let display_name = extract_field(element, &self.display_name)?
            .into_value()
            .unwrap_or_default();
        let text = extract_field(element, &self.text)?
            .into_value()
            .unwrap_or_default();
        let timestamp = extract_field(element, &self.timestamp)?
            .into_value()
            .unwrap_or_default();
        let replies = extract_field(element, &self.replies)?
            .into_value()
            .unwrap_or_default();
        let reposts = extract_field(element, &self.reposts)?
            .into_value()
            .unwrap_or_default();
        let likes = extract_field(element, &self.likes)?
            .into_value()
            .unwrap_or_default();
        let bookmarks = extract_field(element, &self.bookmarks)?
            .into_value()
            .unwrap_or_default();

        // The stats group renders counters line by line; views come last
        let views = extract_field(element, &self.stats_group)?
            .into_value()
            .and_then(|group| group.lines().last().map(str::to_string))
            .filter(|line| !line.is_empty());

        let image_url = extract_field(element, &self.image)?.into_value();
        let video_url = extract_field(element, &self.video)?.into_value();
        let video_preview_url = extract_field(element, &self.video_preview)?.into_value();

        let hashtags = derive_hashtags(&text);

        Ok(Some(Record::Post(Post {
            id,
            author,
            display_name,
            text,
            timestamp,
            replies,
            reposts,
            likes,
            bookmarks,
            views,
            image_url,
            video_url,
            video_preview_url,
            hashtags,
            url,
            context: context.unwrap_or_default().to_string(),
        })))
    }
}

/// Profile for relation-list pages (followers/following)
#[derive(Debug, Clone)]
pub struct IdentityProfile {
    pub candidates: String,
    pub empty: EmptyMarker,
    pub handle: FieldSpec,
}

impl Default for IdentityProfile {
    fn default() -> Self {
        Self {
            candidates: "button[data-testid=\"UserCell\"]".to_string(),
            empty: EmptyMarker {
                css: "div[data-testid=\"emptyState\"]".to_string(),
                text_contains: None,
            },
            handle: FieldSpec::text_containing("span", "@"),
        }
    }
}

impl Profile for IdentityProfile {
    fn kind(&self) -> &'static str {
        "identity"
    }

    fn candidates(&self) -> &str {
        &self.candidates
    }

    fn empty_marker(&self) -> &EmptyMarker {
        &self.empty
    }

    fn default_stall_ceiling(&self) -> u32 {
        20
    }

    fn assemble<E: PageElement>(
        &self,
        element: &E,
        _context: Option<&str>,
    ) -> Result<Option<Record>> {
        let Some(raw) = extract_field(element, &self.handle)?.into_value() else {
            return Ok(None);
        };
        Ok(Identity::new(&raw).map(Record::Identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Probed;
    use crate::dom::locator::Locator;
    use std::collections::HashMap;

    /// Element stub keyed by locator CSS + target
    struct StubElement {
        fields: HashMap<String, String>,
    }

    fn spec_key(spec: &FieldSpec) -> String {
        use crate::dom::Target;
        let base = match &spec.locator {
            Locator::Css(css) => css.clone(),
            Locator::TextContains { css, needle } => format!("{css}~{needle}"),
        };
        match &spec.target {
            Target::Text => base,
            Target::Attr(attr) => format!("{base}@{attr}"),
        }
    }

    impl PageElement for StubElement {
        fn token(&self) -> String {
            "stub".to_string()
        }

        fn text(&self) -> Result<String> {
            Ok(String::new())
        }

        fn probe(&self, spec: &FieldSpec) -> Result<Probed> {
            match self.fields.get(&spec_key(spec)) {
                Some(value) => Ok(Probed::Found(value.clone())),
                None => Ok(Probed::Absent),
            }
        }
    }

    fn stub_with(entries: &[(&FieldSpec, &str)]) -> StubElement {
        StubElement {
            fields: entries
                .iter()
                .map(|(spec, value)| (spec_key(spec), value.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_post_assembly_full() {
        let profile = PostProfile::default();
        let element = stub_with(&[
            (&profile.link, "https://x.com/alice/status/12345"),
            (&profile.author, "@alice"),
            (&profile.display_name, "Alice A."),
            (&profile.text, "hello #world"),
            (&profile.timestamp, "2024-01-15T10:00:00.000Z"),
            (&profile.likes, "42"),
            (&profile.stats_group, "3 replies\n42 likes\n1.2K views"),
        ]);

        let record = profile.assemble(&element, Some("world")).unwrap().unwrap();
        let Record::Post(post) = record else {
            panic!("Expected a post record");
        };
        assert_eq!(post.id, "12345");
        assert_eq!(post.author, "alice");
        assert_eq!(post.display_name, "Alice A.");
        assert_eq!(post.likes, "42");
        // Absent counters fall back to "0"
        assert_eq!(post.replies, "0");
        assert_eq!(post.reposts, "0");
        assert_eq!(post.bookmarks, "0");
        assert_eq!(post.views, Some("1.2K views".to_string()));
        assert_eq!(post.hashtags, vec!["#world"]);
        assert_eq!(post.image_url, None);
        assert_eq!(post.context, "world");
    }

    #[test]
    fn test_post_identity_short_circuit() {
        // No status link means no record, regardless of other fields
        let profile = PostProfile::default();
        let element = stub_with(&[(&profile.text, "orphan text")]);
        assert!(profile.assemble(&element, None).unwrap().is_none());
    }

    #[test]
    fn test_post_missing_author_falls_back() {
        let profile = PostProfile::default();
        let element = stub_with(&[(&profile.link, "https://x.com/u/status/9")]);
        let record = profile.assemble(&element, None).unwrap().unwrap();
        let Record::Post(post) = record else {
            panic!("Expected a post record");
        };
        assert_eq!(post.author, "Unknown");
        assert_eq!(post.timestamp, "No timestamp available");
        assert!(post.hashtags.is_empty());
    }

    #[test]
    fn test_post_trailing_slash_url_rejected() {
        let profile = PostProfile::default();
        let element = stub_with(&[(&profile.link, "https://x.com/u/status/")]);
        assert!(profile.assemble(&element, None).unwrap().is_none());
    }

    #[test]
    fn test_identity_assembly() {
        let profile = IdentityProfile::default();
        let element = StubElement {
            fields: HashMap::from([(spec_key(&profile.handle), "@Bob".to_string())]),
        };
        let record = profile.assemble(&element, None).unwrap().unwrap();
        assert_eq!(record.identity(), "Bob");
    }

    #[test]
    fn test_identity_empty_handle_rejected() {
        let profile = IdentityProfile::default();
        let element = StubElement {
            fields: HashMap::from([(spec_key(&profile.handle), "@".to_string())]),
        };
        assert!(profile.assemble(&element, None).unwrap().is_none());

        let element = StubElement {
            fields: HashMap::new(),
        };
        assert!(profile.assemble(&element, None).unwrap().is_none());
    }
}
