use crate::dom::{Page, PageElement};
use crate::error::Result;
use crate::model::Record;
use crate::scrape::ledger::Ledger;
use crate::scrape::profile::Profile;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Why the pagination loop stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// Target count reached
    Satisfied,

    /// Scrolling stopped producing new content
    Stalled,

    /// The source signalled an explicit empty state
    Empty,

    /// No content and no empty signal within the load wait ceiling
    Timeout,

    /// An unexpected fault aborted the loop; accumulated records are preserved
    Fault(String),
}

/// Result of one scrape invocation: the deduplicated records plus the
/// terminal cause, for observability
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub records: Vec<Record>,
    pub cause: StopCause,
}

impl ScrapeOutcome {
    fn new(records: Vec<Record>, cause: StopCause) -> Self {
        Self { records, cause }
    }

    fn bare(cause: StopCause) -> Self {
        Self::new(Vec::new(), cause)
    }
}

/// Bounds for the randomized scroll advance and post-scroll wait
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    pub min_advance_px: f64,
    pub max_advance_px: f64,
    pub min_wait_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            min_advance_px: 700.0,
            max_advance_px: 1000.0,
            min_wait_ms: 1000,
            max_wait_ms: 3000,
        }
    }
}

/// Tunable timing and termination parameters for one scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Polls for the explicit empty indicator before waiting for content
    pub empty_check_attempts: u32,

    /// Pause between empty-indicator polls
    pub empty_check_interval: Duration,

    /// Ceiling on waiting for the first candidate element
    pub load_wait: Duration,

    /// Pause between load polls
    pub load_poll_interval: Duration,

    /// Consecutive no-growth scrolls tolerated; `None` uses the profile default
    pub stall_ceiling: Option<u32>,

    /// Scroll jitter bounds
    pub scroll: ScrollSettings,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            empty_check_attempts: 3,
            empty_check_interval: Duration::from_millis(500),
            load_wait: Duration::from_secs(30),
            load_poll_interval: Duration::from_millis(500),
            stall_ceiling: None,
            scroll: ScrollSettings::default(),
        }
    }
}

/// Scroll advance/wait strategy. Injectable so tests can run the loop with
/// fixed advances and zero latency.
pub trait ScrollPolicy {
    /// Pixel amount for the next scroll advance
    fn advance(&mut self) -> f64;

    /// Wait after the scroll, before re-measuring document extent
    fn wait(&mut self) -> Duration;
}

/// Jittered policy drawn from [`ScrollSettings`] bounds
pub struct JitterPolicy {
    settings: ScrollSettings,
    rng: rand::rngs::ThreadRng,
}

impl JitterPolicy {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            rng: rand::thread_rng(),
        }
    }
}

impl ScrollPolicy for JitterPolicy {
    fn advance(&mut self) -> f64 {
        if self.settings.min_advance_px >= self.settings.max_advance_px {
            self.settings.min_advance_px
        } else {
            self.rng
                .gen_range(self.settings.min_advance_px..self.settings.max_advance_px)
        }
    }

    fn wait(&mut self) -> Duration {
        let ms = if self.settings.min_wait_ms >= self.settings.max_wait_ms {
            self.settings.min_wait_ms
        } else {
            self.rng
                .gen_range(self.settings.min_wait_ms..self.settings.max_wait_ms)
        };
        Duration::from_millis(ms)
    }
}

/// Deterministic policy: fixed advance, fixed wait
pub struct FixedPolicy {
    pub advance_px: f64,
    pub wait: Duration,
}

impl ScrollPolicy for FixedPolicy {
    fn advance(&mut self) -> f64 {
        self.advance_px
    }

    fn wait(&mut self) -> Duration {
        self.wait
    }
}

/// Drives the scroll/wait/re-query loop for one scrape invocation and owns
/// the termination policy. The loop runs to completion before control
/// returns; the page is exclusively held for the duration.
pub struct Pager<'p, P: Page> {
    page: &'p P,
    config: ScrapeConfig,
    policy: Box<dyn ScrollPolicy>,
}

impl<'p, P: Page> Pager<'p, P> {
    /// Pager with the default jittered scroll policy
    pub fn new(page: &'p P, config: ScrapeConfig) -> Self {
        let policy = Box::new(JitterPolicy::new(config.scroll.clone()));
        Self {
            page,
            config,
            policy,
        }
    }

    /// Pager with an injected scroll policy
    pub fn with_policy(page: &'p P, config: ScrapeConfig, policy: Box<dyn ScrollPolicy>) -> Self {
        Self {
            page,
            config,
            policy,
        }
    }

    /// Run the loop against one URL until a terminal state is reached.
    ///
    /// Returns `Err` only when navigation itself fails, before anything is
    /// accumulated; every in-loop failure path resolves to a terminal
    /// [`StopCause`] with the partial accumulation preserved.
    pub fn run(
        &mut self,
        profile: &impl Profile,
        url: &str,
        context: Option<&str>,
        target: usize,
    ) -> Result<ScrapeOutcome> {
        info!("Starting {} scrape: {}", profile.kind(), url);
        self.page.navigate(url)?;

        if self.empty_state_signalled(profile) {
            info!("Explicit empty state for {} scrape of {}", profile.kind(), url);
            return Ok(ScrapeOutcome::bare(StopCause::Empty));
        }

        if !self.wait_for_candidates(profile) {
            warn!(
                "Load timeout: no {} candidates within {:?} for {}",
                profile.kind(),
                self.config.load_wait,
                url
            );
            return Ok(ScrapeOutcome::bare(StopCause::Timeout));
        }

        Ok(self.scan_loop(profile, context, target))
    }

    /// Poll for the source's explicit "no results" indicator during the
    /// grace period
    fn empty_state_signalled(&self, profile: &impl Profile) -> bool {
        let marker = profile.empty_marker();
        for _ in 0..self.config.empty_check_attempts {
            if let Ok(elements) = self.page.query_all(&marker.css) {
                let matched = match &marker.text_contains {
                    None => !elements.is_empty(),
                    Some(needle) => elements.iter().any(|element| {
                        element
                            .text()
                            .map(|text| text.contains(needle))
                            .unwrap_or(false)
                    }),
                };
                if matched {
                    return true;
                }
            }
            self.page.pause(self.config.empty_check_interval);
        }
        false
    }

    /// Wait for at least one candidate element, bounded by the load ceiling
    fn wait_for_candidates(&self, profile: &impl Profile) -> bool {
        let deadline = Instant::now() + self.config.load_wait;
        loop {
            if let Ok(elements) = self.page.query_all(profile.candidates())
                && !elements.is_empty()
            {
                debug!("{} candidates loaded", elements.len());
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            self.page.pause(self.config.load_poll_interval);
        }
    }

    fn scan_loop(
        &mut self,
        profile: &impl Profile,
        context: Option<&str>,
        target: usize,
    ) -> ScrapeOutcome {
        let stall_ceiling = self
            .config
            .stall_ceiling
            .unwrap_or_else(|| profile.default_stall_ceiling());
        let mut ledger = Ledger::new();
        let mut records: Vec<Record> = Vec::new();
        let mut stalls: u32 = 0;
        let mut prev_height = self.page.content_height().unwrap_or(0.0);

        while records.len() < target && stalls < stall_ceiling {
            // SCANNING
            let scan = match self.page.query_all(profile.candidates()) {
                Ok(elements) => elements,
                Err(err) if err.is_transient() => {
                    debug!("Transient re-query fault, empty scan: {}", err);
                    Vec::new()
                }
                Err(err) => {
                    warn!("Unexpected fault while scanning: {}", err);
                    return ScrapeOutcome::new(records, StopCause::Fault(err.to_string()));
                }
            };
            debug!("Scanning {} candidate elements", scan.len());

            for element in &scan {
                if records.len() >= target {
                    break;
                }
                let token = element.token();
                if !ledger.should_process(&token) {
                    continue;
                }
                match profile.assemble(element, context) {
                    Ok(Some(record)) => {
                        ledger.mark_inspected(token);
                        if ledger.admit(&record) {
                            records.push(record);
                            if records.len() % 10 == 0 {
                                info!("Admitted {} records so far", records.len());
                            }
                        }
                    }
                    Ok(None) => {
                        // Identity unresolved; the element may still be
                        // hydrating, so leave its token unmarked and probe it
                        // again next scan.
                    }
                    Err(err) if err.is_transient() => {
                        debug!("Stale element, skipping for this scan: {}", err);
                    }
                    Err(err) => {
                        warn!("Unexpected fault while assembling: {}", err);
                        return ScrapeOutcome::new(records, StopCause::Fault(err.to_string()));
                    }
                }
            }

            if records.len() >= target {
                break;
            }

            // SCROLLING
            if let Err(err) = self.page.scroll_by(self.policy.advance()) {
                if err.is_transient() {
                    debug!("Transient scroll fault: {}", err);
                } else {
                    warn!("Unexpected fault while scrolling: {}", err);
                    return ScrapeOutcome::new(records, StopCause::Fault(err.to_string()));
                }
            }
            self.page.pause(self.policy.wait());

            let height = match self.page.content_height() {
                Ok(height) => height,
                Err(err) if err.is_transient() => prev_height,
                Err(err) => {
                    warn!("Unexpected fault while measuring extent: {}", err);
                    return ScrapeOutcome::new(records, StopCause::Fault(err.to_string()));
                }
            };
            if (height - prev_height).abs() < f64::EPSILON {
                stalls += 1;
                debug!("No new content, stall {}/{}", stalls, stall_ceiling);
            } else {
                stalls = 0;
            }
            prev_height = height;
        }

        let cause = if records.len() >= target {
            StopCause::Satisfied
        } else {
            StopCause::Stalled
        };
        info!(
            "Scrape finished: {} records, cause {:?}",
            records.len(),
            cause
        );
        ScrapeOutcome::new(records, cause)
    }
}
