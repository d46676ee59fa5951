use crate::dom::{FieldSpec, Locator, Page, PageElement, Probed, Target};
use crate::error::{Result, ScrapeError};
use headless_chrome::{Element, Tab};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const OWN_TEXT_FN: &str = r#"
    function() {
        return this.innerText !== undefined ? this.innerText : (this.textContent || '');
    }
"#;

const QUERY_TEXT_FN: &str = r#"
    function(sel) {
        const m = this.querySelector(sel);
        if (!m) return null;
        return m.innerText !== undefined ? m.innerText : m.textContent;
    }
"#;

const QUERY_ATTR_FN: &str = r#"
    function(sel, attr) {
        const m = this.querySelector(sel);
        if (!m) return null;
        const v = m[attr];
        if (v !== undefined && v !== null && v !== '') return String(v);
        return m.getAttribute(attr);
    }
"#;

const QUERY_TEXT_CONTAINS_FN: &str = r#"
    function(sel, needle) {
        for (const m of this.querySelectorAll(sel)) {
            const t = m.innerText !== undefined ? m.innerText : m.textContent;
            if (t && t.includes(needle)) return t;
        }
        return null;
    }
"#;

const QUERY_ATTR_CONTAINS_FN: &str = r#"
    function(sel, needle, attr) {
        for (const m of this.querySelectorAll(sel)) {
            const t = m.innerText !== undefined ? m.innerText : m.textContent;
            if (t && t.includes(needle)) {
                const v = m[attr];
                if (v !== undefined && v !== null && v !== '') return String(v);
                return m.getAttribute(attr);
            }
        }
        return null;
    }
"#;

/// A browser tab exposed through the [`Page`] capability
pub struct CdpPage {
    tab: Arc<Tab>,
}

impl CdpPage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// The underlying tab, for operations outside the scraping capability
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

impl Page for CdpPage {
    type Element<'a> = CdpElement<'a>;

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| ScrapeError::NavigationFailed(format!("Navigation timeout: {}", e)))?;
        Ok(())
    }

    fn query_all(&self, css: &str) -> Result<Vec<Self::Element<'_>>> {
        match self.tab.find_elements(css) {
            Ok(elements) => Ok(elements.into_iter().map(CdpElement::new).collect()),
            // headless_chrome reports zero matches as an error; anything else
            // during a re-render is the stale-reference case
            Err(e) if e.to_string().contains("No element") => Ok(Vec::new()),
            Err(e) => Err(ScrapeError::StaleElement(e.to_string())),
        }
    }

    fn scroll_by(&self, pixels: f64) -> Result<()> {
        self.tab
            .evaluate(&format!("window.scrollBy(0, {});", pixels), false)
            .map_err(|e| ScrapeError::EvalFailed(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    fn content_height(&self) -> Result<f64> {
        let result = self
            .tab
            .evaluate("document.body.scrollHeight", false)
            .map_err(|e| ScrapeError::EvalFailed(format!("Height query failed: {}", e)))?;
        result
            .value
            .as_ref()
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ScrapeError::EvalFailed("Height query returned no number".to_string()))
    }

    fn pause(&self, wait: Duration) {
        std::thread::sleep(wait);
    }
}

/// A live element handle scoped to one scan iteration
pub struct CdpElement<'a> {
    inner: Element<'a>,
}

impl<'a> CdpElement<'a> {
    pub fn new(inner: Element<'a>) -> Self {
        Self { inner }
    }

    fn call(&self, function: &str, args: Vec<serde_json::Value>) -> Result<Probed> {
        let result = self
            .inner
            .call_js_fn(function, args, false)
            .map_err(|e| ScrapeError::StaleElement(e.to_string()))?;
        match result.value {
            Some(serde_json::Value::String(s)) => Ok(Probed::Found(s.trim().to_string())),
            _ => Ok(Probed::Absent),
        }
    }
}

impl PageElement for CdpElement<'_> {
    fn token(&self) -> String {
        // Remote object ids are release-scoped: never reused while the node
        // is held, fresh after a re-render
        self.inner.remote_object_id.clone()
    }

    fn text(&self) -> Result<String> {
        match self.call(OWN_TEXT_FN, Vec::new())? {
            Probed::Found(text) => Ok(text),
            Probed::Absent => Ok(String::new()),
        }
    }

    fn probe(&self, spec: &FieldSpec) -> Result<Probed> {
        match (&spec.locator, &spec.target) {
            (Locator::Css(css), Target::Text) => self.call(QUERY_TEXT_FN, vec![json!(css)]),
            (Locator::Css(css), Target::Attr(attr)) => {
                self.call(QUERY_ATTR_FN, vec![json!(css), json!(attr)])
            }
            (Locator::TextContains { css, needle }, Target::Text) => {
                self.call(QUERY_TEXT_CONTAINS_FN, vec![json!(css), json!(needle)])
            }
            (Locator::TextContains { css, needle }, Target::Attr(attr)) => self.call(
                QUERY_ATTR_CONTAINS_FN,
                vec![json!(css), json!(needle), json!(attr)],
            ),
        }
    }
}
