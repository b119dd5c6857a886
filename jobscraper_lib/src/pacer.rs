//! Fixed courtesy delay between board requests.
//!
//! Every request is followed by a blocking pause before the next one: a
//! shorter one after results pages and a longer one after detail pages.
//! Requests are never issued concurrently, so the pacer does not queue.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::sleep;

/// Default pause after a results page.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(5);

/// Default pause after a detail page.
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_secs(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    ListingPage,
    DetailPage,
}

pub struct Pacer {
    page_delay: Duration,
    detail_delay: Duration,
    tracker: RequestTracker,
}

impl Pacer {
    pub fn new(page_delay: Duration, detail_delay: Duration) -> Self {
        Self {
            page_delay,
            detail_delay,
            tracker: RequestTracker::new(),
        }
    }

    /// A pacer that never sleeps. Used by tests and local mirrors.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn delay_for(&self, kind: RequestKind) -> Duration {
        match kind {
            RequestKind::ListingPage => self.page_delay,
            RequestKind::DetailPage => self.detail_delay,
        }
    }

    /// Sleeps for the delay that follows a request of `kind`.
    pub async fn pause(&self, kind: RequestKind) {
        let delay = self.delay_for(kind);
        if delay.is_zero() {
            return;
        }
        self.tracker.record_delay(delay);
        sleep(delay).await;
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_DELAY, DEFAULT_DETAIL_DELAY)
    }
}

/// Atomic counters tracking request outcomes.
pub struct RequestTracker {
    pub(crate) listing_pages: AtomicU64,
    pub(crate) detail_pages: AtomicU64,
    /// Cumulative courtesy delay in milliseconds.
    pub(crate) total_delay_ms: AtomicU64,
}

impl RequestTracker {
    fn new() -> Self {
        Self {
            listing_pages: AtomicU64::new(0),
            detail_pages: AtomicU64::new(0),
            total_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self, kind: RequestKind) {
        let counter = match kind {
            RequestKind::ListingPage => &self.listing_pages,
            RequestKind::DetailPage => &self.detail_pages,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delay(&self, duration: Duration) {
        self.total_delay_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Snapshot the current counters.
    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            listing_pages: self.listing_pages.load(Ordering::Relaxed),
            detail_pages: self.detail_pages.load(Ordering::Relaxed),
            total_delay_secs: self.total_delay_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Immutable snapshot of tracker counters for display.
#[derive(Debug, Clone, Default)]
pub struct TrackerSummary {
    pub listing_pages: u64,
    pub detail_pages: u64,
    pub total_delay_secs: f64,
}

/// Runs one request and, when it succeeds, counts it and pauses.
///
/// A failed request is returned immediately without pausing: any failure
/// ends the run.
pub async fn paced<F, Fut, T, E>(pacer: &Pacer, kind: RequestKind, operation: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let val = operation().await?;
    pacer.tracker().record_success(kind);
    pacer.pause(kind).await;
    Ok(val)
}
