use crate::dom::{Fallback, FieldSpec, PageElement, Probed};
use crate::error::Result;

/// Outcome of extracting one field from one element
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The locator matched; first match's value
    Extracted(String),

    /// The locator matched nothing; the spec's declared fallback applies
    Fallback(Option<String>),
}

impl FieldValue {
    /// Whether the fallback was used instead of a live value
    pub fn used_fallback(&self) -> bool {
        matches!(self, FieldValue::Fallback(_))
    }

    /// Collapse to the resolved value, `None` when the field is absent
    /// with no substitute
    pub fn into_value(self) -> Option<String> {
        match self {
            FieldValue::Extracted(value) => Some(value),
            FieldValue::Fallback(value) => value,
        }
    }
}

/// Resolve one field on one element.
///
/// Never errors for a missing sub-element: zero matches yields exactly the
/// spec's declared fallback. One or more matches yields the first match's
/// trimmed value. Errors pass through only for stale handles and failed
/// evaluation, which the caller classifies.
pub fn extract_field<E: PageElement>(element: &E, spec: &FieldSpec) -> Result<FieldValue> {
    match element.probe(spec)? {
        Probed::Found(value) => Ok(FieldValue::Extracted(value)),
        Probed::Absent => Ok(FieldValue::Fallback(match &spec.fallback {
            Fallback::Value(value) => Some(value.clone()),
            Fallback::Absent => None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Locator;
    use crate::error::ScrapeError;
    use std::collections::HashMap;

    /// Minimal element stub: maps locator CSS to a value
    struct StubElement {
        fields: HashMap<String, String>,
        stale: bool,
    }

    impl PageElement for StubElement {
        fn token(&self) -> String {
            "stub".to_string()
        }

        fn text(&self) -> Result<String> {
            Ok(String::new())
        }

        fn probe(&self, spec: &FieldSpec) -> Result<Probed> {
            if self.stale {
                return Err(ScrapeError::StaleElement("detached".to_string()));
            }
            match self.fields.get(spec.locator.css()) {
                Some(value) => Ok(Probed::Found(value.clone())),
                None => Ok(Probed::Absent),
            }
        }
    }

    fn stub(fields: &[(&str, &str)]) -> StubElement {
        StubElement {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            stale: false,
        }
    }

    #[test]
    fn test_extracted_value() {
        let element = stub(&[("time", "2024-01-15T10:00:00.000Z")]);
        let value = extract_field(&element, &FieldSpec::text("time")).unwrap();
        assert_eq!(
            value,
            FieldValue::Extracted("2024-01-15T10:00:00.000Z".to_string())
        );
        assert!(!value.used_fallback());
    }

    #[test]
    fn test_fallback_on_absent_locator() {
        let element = stub(&[]);
        let spec = FieldSpec::text("button[data-testid=\"like\"]").or_value("0");
        let value = extract_field(&element, &spec).unwrap();
        assert!(value.used_fallback());
        assert_eq!(value.into_value(), Some("0".to_string()));
    }

    #[test]
    fn test_absent_without_substitute() {
        let element = stub(&[]);
        let spec = FieldSpec::attr("img", "src");
        let value = extract_field(&element, &spec).unwrap();
        assert!(value.used_fallback());
        assert_eq!(value.into_value(), None);
    }

    #[test]
    fn test_fallback_applies_to_every_spec_shape() {
        // Fallback completeness: no spec shape raises on an element
        // lacking the target locator.
        let element = stub(&[]);
        let specs = [
            FieldSpec::text("div"),
            FieldSpec::attr("a", "href"),
            FieldSpec::text_containing("span", "@"),
            FieldSpec::text("time").or_value("No timestamp available"),
        ];
        for spec in &specs {
            assert!(extract_field(&element, spec).unwrap().used_fallback());
        }
    }

    #[test]
    fn test_stale_error_passes_through() {
        let element = StubElement {
            fields: HashMap::new(),
            stale: true,
        };
        let err = extract_field(&element, &FieldSpec::text("div")).unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn test_stub_probe_matches_by_css() {
        let element = stub(&[("span", "@alice")]);
        let spec = FieldSpec::text_containing("span", "@");
        assert_eq!(
            extract_field(&element, &spec).unwrap().into_value(),
            Some("@alice".to_string())
        );
    }
}
