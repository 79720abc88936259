//! # nico-filter
//!
//! Hides videos uploaded by block-listed users on the Niconico mobile site
//! (`sp.nicovideo.jp`), driving the page over the Chrome DevTools Protocol (CDP).
//!
//! ## How it works
//!
//! 1. The block-list is a mylist named `BlockUsers` (configurable). The owners of the
//!    videos in it are the blocked users.
//! 2. Each blocked user is expanded into their newest videos (50 by default).
//! 3. Both lists are cached in the tab's `sessionStorage` for the rest of the session.
//! 4. Every 2 seconds for an hour, links to those videos are hidden.
//!
//! API requests and storage access run as scripts inside the tab, so they carry the
//! logged-in session cookie the same way the site's own scripts do.
//!
//! ## Running
//!
//! ```bash
//! # Reuse a logged-in Chrome profile
//! cargo run --bin nico-filter -- --headed --user-data-dir ~/.config/nico-profile
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use nico_filter::{BrowserSession, FilterConfig, FilterDriver, LaunchOptions};
//!
//! # async fn run() -> nico_filter::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::new().headless(false))?;
//! let tab = session.tab()?;
//! session.navigate(&tab, "https://sp.nicovideo.jp/")?;
//!
//! let driver = FilterDriver::for_tab(tab, FilterConfig::default())?;
//! let report = driver.run().await;
//! println!("{} passes, {} matches", report.ticks, report.hidden_total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`api`]: credentialed reads of the platform API
//! - [`resolver`] / [`expander`]: block-list mylist -> users -> videos
//! - [`cache`]: session-scoped memoization
//! - [`dom`]: link matching and the documents elements are hidden in
//! - [`pipeline`], [`suppressor`], [`driver`]: wiring and the polling state machine
//! - [`browser`]: Chrome session management
//! - [`config`], [`error`]

pub mod api;
pub mod browser;
pub mod cache;
pub mod config;
pub mod dom;
pub mod driver;
pub mod error;
pub mod expander;
pub mod ids;
pub mod pipeline;
pub mod resolver;
pub mod suppressor;

pub use api::{ApiTransport, RemoteApiClient, TabFetchTransport};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use cache::{MemoryStore, SessionCache, SessionStore, TabSessionStorage};
pub use config::FilterConfig;
pub use dom::{Document, ElementNode, MatchMode, MemoryDocument, TabDocument};
pub use driver::{DriverReport, DriverState, FilterDriver};
pub use error::{FilterError, Result};
pub use expander::VideoIdExpander;
pub use ids::{BlockList, SuppressionSet, UserId, VideoId};
pub use pipeline::SuppressionPipeline;
pub use resolver::BlockListResolver;
pub use suppressor::DomSuppressor;
