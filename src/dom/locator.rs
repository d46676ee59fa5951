use serde::{Deserialize, Serialize};

/// A declarative query selecting sub-elements relative to a scope element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Locator {
    /// Match by CSS selector
    Css(String),

    /// Match elements under a CSS selector whose text contains a substring.
    /// Covers patterns CSS cannot express, like "the span holding the @handle".
    TextContains {
        /// CSS selector narrowing the candidate set
        css: String,

        /// Substring the element's text must contain
        needle: String,
    },
}

impl Locator {
    /// CSS selector the locator scans under
    pub fn css(&self) -> &str {
        match self {
            Locator::Css(css) => css,
            Locator::TextContains { css, .. } => css,
        }
    }
}

/// What to read from the first matching element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Target {
    /// The element's rendered text
    Text,

    /// An attribute (or same-named property) value
    Attr(String),
}

/// Declared value when the locator resolves to zero matches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Fallback {
    /// Substitute a fixed value
    Value(String),

    /// The field is simply absent
    Absent,
}

/// One logical field of a record: where to look, what to read, and what the
/// field resolves to when the sub-element is missing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    /// Locator relative to the scope element
    pub locator: Locator,

    /// Text or attribute to read from the first match
    pub target: Target,

    /// Value used when zero elements match
    pub fallback: Fallback,
}

impl FieldSpec {
    /// Field reading the text of the first CSS match, absent on no match
    pub fn text(css: impl Into<String>) -> Self {
        Self {
            locator: Locator::Css(css.into()),
            target: Target::Text,
            fallback: Fallback::Absent,
        }
    }

    /// Field reading an attribute of the first CSS match, absent on no match
    pub fn attr(css: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            locator: Locator::Css(css.into()),
            target: Target::Attr(attr.into()),
            fallback: Fallback::Absent,
        }
    }

    /// Field reading the text of the first match containing a substring
    pub fn text_containing(css: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            locator: Locator::TextContains {
                css: css.into(),
                needle: needle.into(),
            },
            target: Target::Text,
            fallback: Fallback::Absent,
        }
    }

    /// Builder method: substitute a fixed value when the locator is absent
    pub fn or_value(mut self, value: impl Into<String>) -> Self {
        self.fallback = Fallback::Value(value.into());
        self
    }
}

/// Result of probing one field on one element.
/// Missing sub-elements are a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Probed {
    /// The locator matched; first match's value, trimmed
    Found(String),

    /// The locator resolved to zero matches
    Absent,
}
