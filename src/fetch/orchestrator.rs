use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Duration, Utc};
use image::DynamicImage;
use rayon::prelude::*;

use crate::{
    fetch::http::ImageFetcher,
    foundation::error::{SatError, SatResult},
};

/// Satellite processing latency subtracted from "now" before picking days.
pub const PROCESSING_DELAY_HOURS: i64 = 3;

/// Number of daily frames requested by default.
pub const DEFAULT_DAYS: u32 = 7;

/// A decoded frame tagged with the timestamp it was requested for.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    /// ISO-8601 timestamp used in the request.
    pub timestamp: String,
    /// Decoded raster, RGB or RGBA.
    pub image: DynamicImage,
}

/// One URL to download, tagged with its timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// ISO-8601 timestamp of the frame.
    pub timestamp: String,
    /// Fully-qualified URL.
    pub url: String,
}

/// Outcome of [`FetchOrchestrator::fetch_all`].
#[derive(Clone, Debug)]
pub struct FetchReport {
    /// Successful frames, in request order.
    pub frames: Vec<ImageFrame>,
    /// Number of requests issued.
    pub requested: usize,
    /// Number of requests that yielded no frame.
    pub failed: usize,
}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; requests that have not started yet are skipped.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// `now` minus the processing delay.
pub fn reference_time(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(PROCESSING_DELAY_HOURS)
}

/// Midnight UTC timestamps for the `days` calendar days before `reference`, newest first.
pub fn day_timestamps(reference: DateTime<Utc>, days: u32) -> Vec<String> {
    let date = reference.date_naive();
    (1..=i64::from(days))
        .map(|offset| {
            (date - Duration::days(offset))
                .format("%Y-%m-%dT00:00:00Z")
                .to_string()
        })
        .collect()
}

/// Runs one download per request on a bounded worker pool.
///
/// Workers share nothing but the fetcher and the cancel flag. Results are gathered in request
/// order before anything downstream runs.
#[derive(Clone, Debug, Default)]
pub struct FetchOrchestrator {
    /// Worker count; `None` sizes the pool to the number of requests.
    pub threads: Option<usize>,
    /// Cancellation flag checked before each request starts.
    pub cancel: CancelToken,
}

impl FetchOrchestrator {
    /// Orchestrator with a pool sized per call and the given cancel token.
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            threads: None,
            cancel,
        }
    }

    /// Download every request; failures become "no frame" and are filtered out.
    ///
    /// Returns [`SatError::Cancelled`] if the token is set once all workers have finished.
    #[tracing::instrument(skip(self, fetcher, requests), fields(requested = requests.len()))]
    pub fn fetch_all(
        &self,
        fetcher: &dyn ImageFetcher,
        requests: &[FrameRequest],
    ) -> SatResult<FetchReport> {
        let threads = self.threads.unwrap_or(requests.len()).max(1);
        let pool = build_thread_pool(threads)?;

        let results: Vec<Option<ImageFrame>> = pool.install(|| {
            requests
                .par_iter()
                .map(|req| self.fetch_one(fetcher, req))
                .collect()
        });

        if self.cancel.is_cancelled() {
            tracing::warn!("fetch cancelled");
            return Err(SatError::Cancelled);
        }

        let requested = results.len();
        let frames: Vec<ImageFrame> = results.into_iter().flatten().collect();
        let failed = requested - frames.len();
        tracing::info!(real = frames.len(), failed, "fetch finished");

        Ok(FetchReport {
            frames,
            requested,
            failed,
        })
    }

    fn fetch_one(&self, fetcher: &dyn ImageFetcher, req: &FrameRequest) -> Option<ImageFrame> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tracing::debug!(timestamp = %req.timestamp, url = %req.url, "downloading frame");
        match fetcher.fetch(&req.url) {
            Ok(image) => Some(ImageFrame {
                timestamp: req.timestamp.clone(),
                image,
            }),
            Err(e) => {
                tracing::warn!(timestamp = %req.timestamp, error = %e, "frame download failed");
                None
            }
        }
    }
}

fn build_thread_pool(threads: usize) -> SatResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SatError::validation("fetch pool size must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("satmosaic-fetch-{i}"))
        .build()
        .map_err(|e| SatError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn reference_time_subtracts_three_hours() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        assert_eq!(
            reference_time(now),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn day_timestamps_cross_month_boundaries() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(
            day_timestamps(reference, 3),
            vec![
                "2024-03-01T00:00:00Z",
                "2024-02-29T00:00:00Z",
                "2024-02-28T00:00:00Z",
            ]
        );
        assert!(day_timestamps(reference, 0).is_empty());
    }

    #[test]
    fn day_timestamps_cross_year_boundary() {
        let reference = Utc.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap();
        assert_eq!(day_timestamps(reference, 1), vec!["2024-12-31T00:00:00Z"]);
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(build_thread_pool(0).is_err());
    }
}
