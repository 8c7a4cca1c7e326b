use std::time::Duration;

use image::DynamicImage;

use crate::foundation::error::{SatError, SatResult};

/// Downloads and decodes a single image.
///
/// Implementations are shared across worker threads, so they must be `Send + Sync`.
pub trait ImageFetcher: Send + Sync {
    /// Fetch `url` and decode the body into an image.
    fn fetch(&self, url: &str) -> SatResult<DynamicImage>;
}

impl<F> ImageFetcher for F
where
    F: Fn(&str) -> SatResult<DynamicImage> + Send + Sync,
{
    fn fetch(&self, url: &str) -> SatResult<DynamicImage> {
        self(url)
    }
}

/// Blocking HTTP fetcher backed by `reqwest`. No retries.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` applies per request; `None` keeps the transport default.
    pub fn new(timeout: Option<Duration>) -> SatResult<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| SatError::fetch(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> SatResult<DynamicImage> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| SatError::fetch(format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SatError::fetch(format!("HTTP {status} fetching {url}")));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| SatError::fetch(format!("read body of {url}: {e}")))?;
        decode_image(&bytes).map_err(|e| SatError::fetch(format!("{url}: {e}")))
    }
}

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> SatResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| SatError::fetch(format!("decode image from memory: {e}")))
}
