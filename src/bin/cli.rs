//! scroll-scraper CLI
//!
//! Drives the extraction engine against a launched Chrome instance and
//! prints records as JSON lines on stdout. Export beyond that is left to
//! downstream tooling.

use clap::{Parser, Subcommand};
use scroll_scraper::model::{hashtag_search_url, user_search_url};
use scroll_scraper::{BrowserSession, LaunchOptions, ScrapeSession};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scroll-scraper", version, about = "Scroll-driven feed extraction")]
struct Cli {
    /// Launch the browser with a visible window
    #[arg(long, global = true)]
    headed: bool,

    /// Path to the Chrome binary
    #[arg(long, global = true)]
    chrome_path: Option<PathBuf>,

    /// User data directory (reuse an authenticated profile)
    #[arg(long, global = true)]
    user_data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape posts carrying a hashtag within a date range
    Hashtag {
        /// Hashtag to search for, without '#'
        #[arg(long)]
        tag: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        since: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        until: String,

        /// Maximum number of posts to collect
        #[arg(long, default_value_t = 50)]
        max: usize,
    },

    /// Scrape posts from one account within a date range
    User {
        /// Account handle, with or without '@'
        #[arg(long)]
        name: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        since: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        until: String,

        /// Maximum number of posts to collect
        #[arg(long, default_value_t = 100)]
        max: usize,
    },

    /// Scrape following/followers/verified followers for one subject
    Network {
        /// Subject handle, with or without '@'
        #[arg(long)]
        subject: String,

        /// Maximum identities per relation kind
        #[arg(long, default_value_t = 100)]
        max: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = LaunchOptions::new().headless(!cli.headed);
    if let Some(path) = cli.chrome_path {
        options = options.chrome_path(path);
    }
    if let Some(dir) = cli.user_data_dir {
        options = options.user_data_dir(dir);
    }

    let browser = BrowserSession::launch(options)?;
    let page = browser.page()?;
    let session = ScrapeSession::new(&page);

    match cli.command {
        Command::Hashtag {
            tag,
            since,
            until,
            max,
        } => {
            let url = hashtag_search_url(&tag, &since, &until);
            let outcome = session.search_posts(&url, &tag, max)?;
            for record in &outcome.records {
                println!("{}", serde_json::to_string(record)?);
            }
            eprintln!(
                "{} records, stopped because {:?}",
                outcome.records.len(),
                outcome.cause
            );
        }
        Command::User {
            name,
            since,
            until,
            max,
        } => {
            let url = user_search_url(&name, &since, &until);
            let outcome = session.search_posts(&url, &name, max)?;
            for record in &outcome.records {
                println!("{}", serde_json::to_string(record)?);
            }
            eprintln!(
                "{} records, stopped because {:?}",
                outcome.records.len(),
                outcome.cause
            );
        }
        Command::Network { subject, max } => {
            let map = session.relation_map(&subject, max)?;
            println!("{}", serde_json::to_string_pretty(&map)?);
            eprintln!("{} unique identities", map.total_unique());
        }
    }

    Ok(())
}
