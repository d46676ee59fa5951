use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::browser::page::CdpPage;
use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance.
///
/// One session is an exclusively-owned resource: only one scrape may drive a
/// given session at a time. Tabs are closed on drop regardless of which
/// terminal state a scrape reached.
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Strip the automation banner flags that anti-bot services key on
        launch_opts
            .ignore_default_args
            .push(OsStr::new("--enable-automation"));
        launch_opts
            .args
            .push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.args.push(OsStr::new("--disable-dev-shm-usage"));

        // Long scrapes outlive the default 30 second idle timeout
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let ua_arg = options
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(arg) = ua_arg.as_ref() {
            launch_opts.args.push(OsStr::new(arg));
        }

        let browser =
            Browser::new(launch_opts).map_err(|e| ScrapeError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| ScrapeError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url)
            .map_err(|e| ScrapeError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        tabs.into_iter()
            .next()
            .ok_or_else(|| ScrapeError::TabOperationFailed("No open tab".to_string()))
    }

    /// The active tab wrapped as a navigable page for scraping
    pub fn page(&self) -> Result<CdpPage> {
        Ok(CdpPage::new(self.tab()?))
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close all tabs, effectively shutting the browser down
    pub fn close(&self) -> Result<()> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ScrapeError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();
        for tab in tabs {
            let _ = tab.close(false); // Ignore errors on individual tab closes
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::debug!("Browser cleanup on drop failed: {}", e);
        }
    }
}
