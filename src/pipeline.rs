use chrono::{DateTime, Utc};
use image::RgbImage;

use crate::{
    composite::composite,
    config::MosaicConfig,
    fetch::http::ImageFetcher,
    fetch::orchestrator::{
        CancelToken, FetchOrchestrator, FrameRequest, day_timestamps, reference_time,
    },
    foundation::error::SatResult,
};

/// Final image plus the frame counts that went into it.
#[derive(Clone, Debug)]
pub struct MosaicOutput {
    /// Composited, color-corrected image.
    pub image: RgbImage,
    /// Frames that downloaded and decoded successfully.
    pub frames_used: usize,
    /// Frames requested.
    pub frames_requested: usize,
}

/// One request per day for the configured view, newest day first.
///
/// Fails with [`crate::SatError::InvalidCoordinate`] before anything is fetched when the
/// center is incomplete.
pub fn frame_requests(cfg: &MosaicConfig, now: DateTime<Utc>) -> SatResult<Vec<FrameRequest>> {
    let view = cfg.view();
    day_timestamps(reference_time(now), cfg.days)
        .into_iter()
        .map(|timestamp| {
            let url = view.tile_url(&cfg.wms_endpoint, &cfg.layer, &timestamp)?;
            Ok(FrameRequest { timestamp, url })
        })
        .collect()
}

/// Fetch, composite and color-correct the last `cfg.days` daily frames.
pub fn compose_sentinel(
    cfg: &MosaicConfig,
    fetcher: &dyn ImageFetcher,
    cancel: CancelToken,
) -> SatResult<MosaicOutput> {
    compose_sentinel_at(cfg, fetcher, cancel, Utc::now())
}

/// [`compose_sentinel`] with an explicit "now".
#[tracing::instrument(skip(cfg, fetcher, cancel), fields(days = cfg.days, policy = ?cfg.policy))]
pub fn compose_sentinel_at(
    cfg: &MosaicConfig,
    fetcher: &dyn ImageFetcher,
    cancel: CancelToken,
    now: DateTime<Utc>,
) -> SatResult<MosaicOutput> {
    cfg.validate()?;
    let requests = frame_requests(cfg, now)?;
    for req in &requests {
        tracing::info!(timestamp = %req.timestamp, url = %req.url, "queued frame");
    }

    let mut orchestrator = FetchOrchestrator::new(cancel);
    orchestrator.threads = cfg.fetch_workers;
    let report = orchestrator.fetch_all(fetcher, &requests)?;
    if report.frames.is_empty() {
        tracing::warn!(
            requested = report.requested,
            "no frame downloaded; result is a blank canvas"
        );
    }

    let stacked = composite(&report.frames, cfg.canvas(), cfg.policy);
    let image = cfg.correction.apply(&stacked)?;

    Ok(MosaicOutput {
        image,
        frames_used: report.frames.len(),
        frames_requested: report.requested,
    })
}
