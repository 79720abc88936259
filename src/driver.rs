//! Page-load driver: resolve the suppression set once, then poll the page
//!
//! ```text
//! Idle -> Resolving -> Polling -> Stopped
//! ```
//!
//! Polling hides matches every `poll_interval` until `timeout` after polling began. The
//! timeout cancels the driver's [`CancellationToken`]; the same token can be cancelled
//! from outside to stop early. Every exit path ends in [`DriverState::Stopped`].

use crate::api::{RemoteApiClient, TabFetchTransport};
use crate::cache::{SessionCache, TabSessionStorage};
use crate::config::FilterConfig;
use crate::dom::TabDocument;
use crate::error::Result;
use crate::ids::SuppressionSet;
use crate::pipeline::SuppressionPipeline;
use crate::suppressor::DomSuppressor;
use headless_chrome::Tab;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Stand-in for "never" when `start + duration` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

fn instant_after(start: Instant, duration: Duration) -> Instant {
    start.checked_add(duration).unwrap_or_else(|| start + FAR_FUTURE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Resolving,
    Polling,
    Stopped,
}

/// Summary of one driver run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub suppression_set_len: usize,
    /// Suppression passes that ran
    pub ticks: u64,
    /// Sum of matches over all passes; an element hidden on several passes counts each time
    pub hidden_total: u64,
    /// False when the run was cancelled before its timeout
    pub timed_out: bool,
}

pub struct FilterDriver {
    pipeline: SuppressionPipeline,
    suppressor: DomSuppressor,
    interval: Duration,
    timeout: Duration,
    state: watch::Sender<DriverState>,
    cancel: CancellationToken,
}

impl FilterDriver {
    /// Interval and timeout are taken from the pipeline's configuration, which
    /// [`SuppressionPipeline::new`] has already validated
    pub fn new(pipeline: SuppressionPipeline, suppressor: DomSuppressor) -> Self {
        let interval = pipeline.config().poll_interval_duration();
        let timeout = pipeline.config().timeout_duration();
        let (state, _) = watch::channel(DriverState::Idle);

        Self { pipeline, suppressor, interval, timeout, state, cancel: CancellationToken::new() }
    }

    /// Wire every component to one Chrome tab: in-tab fetch, its sessionStorage, its DOM
    pub fn for_tab(tab: Arc<Tab>, config: FilterConfig) -> Result<Self> {
        let transport = Arc::new(TabFetchTransport::new(tab.clone(), config.frontend_id.clone()));
        let client = RemoteApiClient::new(transport, config.api_base_url.clone());
        let cache = SessionCache::new(Arc::new(TabSessionStorage::new(tab.clone())));
        let suppressor = DomSuppressor::new(Arc::new(TabDocument::new(tab)), config.match_mode);

        Ok(Self::new(SuppressionPipeline::new(client, cache, config)?, suppressor))
    }

    pub fn state(&self) -> DriverState {
        *self.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<DriverState> {
        self.state.subscribe()
    }

    /// Token that stops the driver when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn transition(&self, next: DriverState) {
        let previous = self.state.send_replace(next);
        log::info!("Filter driver: {:?} -> {:?}", previous, next);
    }

    /// Run to completion; the driver cannot be restarted afterwards
    pub async fn run(self) -> DriverReport {
        let mut report = DriverReport::default();

        self.transition(DriverState::Resolving);
        let set = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.transition(DriverState::Stopped);
                return report;
            }
            set = self.pipeline.resolve() => set,
        };
        report.suppression_set_len = set.len();

        self.transition(DriverState::Polling);
        let timed_out = self.poll(&set, &mut report).await;
        report.timed_out = timed_out;

        self.transition(DriverState::Stopped);
        log::info!(
            "Filter stopped after {} passes ({} matches, {} suppressed videos)",
            report.ticks,
            report.hidden_total,
            report.suppression_set_len
        );
        report
    }

    /// Returns true if polling ended because the timeout elapsed
    async fn poll(&self, set: &SuppressionSet, report: &mut DriverReport) -> bool {
        let start = Instant::now();
        let deadline = time::sleep_until(instant_after(start, self.timeout));
        tokio::pin!(deadline);

        let mut ticker = time::interval_at(instant_after(start, self.interval), self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // A tick due at the same instant as the deadline does not run
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return false,
                _ = &mut deadline => {
                    self.cancel.cancel();
                    return true;
                }
                _ = ticker.tick() => {
                    report.ticks += 1;
                    match self.suppressor.suppress(set).await {
                        Ok(matched) => report.hidden_total += matched as u64,
                        Err(e) => log::warn!("Suppression pass failed: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubTransport;
    use crate::cache::MemoryStore;
    use crate::dom::{ElementNode, MatchMode, MemoryDocument};

    fn driver(cached: &str, doc: Arc<MemoryDocument>, interval: u64, timeout: u64) -> FilterDriver {
        driver_with(cached, doc, Duration::from_secs(interval), Duration::from_secs(timeout))
    }

    fn driver_with(cached: &str, doc: Arc<MemoryDocument>, interval: Duration, timeout: Duration) -> FilterDriver {
        let config = FilterConfig::new().poll_interval(interval).timeout(timeout);
        let store = Arc::new(MemoryStore::with_entries([(config.cache_keys.suppressed_videos.clone(), cached.to_string())]));
        let client = RemoteApiClient::new(Arc::new(StubTransport::new()), config.api_base_url.clone());
        let pipeline = SuppressionPipeline::new(client, SessionCache::new(store), config).unwrap();
        FilterDriver::new(pipeline, DomSuppressor::new(doc, MatchMode::Exact))
    }

    fn page() -> Arc<MemoryDocument> {
        Arc::new(MemoryDocument::new(
            ElementNode::new("body").with_children(vec![ElementNode::link("/watch/sm1"), ElementNode::link("/watch/sm2")]),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_timeout() {
        let doc = page();
        let driver = driver("sm1", doc.clone(), 2, 10);
        let state = driver.subscribe();

        let report = driver.run().await;

        // Ticks at 2s, 4s, 6s, 8s; the one due at 10s coincides with the timeout
        assert_eq!(report.ticks, 4);
        assert_eq!(report.hidden_total, 4);
        assert_eq!(report.suppression_set_len, 1);
        assert!(report.timed_out);
        assert_eq!(*state.borrow(), DriverState::Stopped);
        assert_eq!(doc.visible_links(), vec!["/watch/sm2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_waits_one_interval() {
        let doc = page();
        let driver = driver("sm1", doc.clone(), 2, 60);
        let token = driver.cancellation_token();

        let run = tokio::spawn(driver.run());
        time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(doc.hidden_count(), 0);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(doc.hidden_count(), 1);

        token.cancel();
        let report = run.await.unwrap();
        assert_eq!(report.ticks, 1);
        assert!(!report.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let driver = driver("sm1", page(), 2, 3600);
        let token = driver.cancellation_token();
        let mut state = driver.subscribe();

        let run = tokio::spawn(driver.run());
        state.wait_for(|s| *s == DriverState::Polling).await.unwrap();
        token.cancel();

        let report = run.await.unwrap();
        assert!(!report.timed_out);
        assert_eq!(report.ticks, 0);
        assert_eq!(*state.borrow(), DriverState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_polls_until_cancelled() {
        let driver = driver_with("sm1", page(), Duration::from_secs(1), Duration::MAX);
        let token = driver.cancellation_token();

        let run = tokio::spawn(driver.run());
        time::sleep(Duration::from_millis(3500)).await;
        token.cancel();

        let report = run.await.unwrap();
        assert_eq!(report.ticks, 3);
        assert!(!report.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_transitions() {
        let driver = driver("sm1", page(), 1, 1);
        let mut state = driver.subscribe();
        assert_eq!(driver.state(), DriverState::Idle);

        let run = tokio::spawn(driver.run());
        let mut seen = vec![*state.borrow_and_update()];
        while state.changed().await.is_ok() {
            seen.push(*state.borrow_and_update());
        }
        run.await.unwrap();

        let order = |s: &DriverState| [DriverState::Idle, DriverState::Resolving, DriverState::Polling, DriverState::Stopped]
            .iter()
            .position(|candidate| candidate == s);
        assert_eq!(seen.first(), Some(&DriverState::Idle));
        assert!(seen.windows(2).all(|w| order(&w[0]) < order(&w[1])));
        assert_eq!(*state.borrow(), DriverState::Stopped);
    }
}
