//! HTTP download layer shared by both pipelines.
//!
//! Callers go through the [`HttpClient`] trait so the pipelines stay
//! testable without a network; [`BasicClient`] is the real implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use tracing::{info, warn};

/// Per-request timeout applied to every upstream download.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between attempts when a download is retried.
const RETRY_DELAY: Duration = Duration::from_secs(2);

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

fn get_request(url: &str) -> Result<Request> {
    let parsed = url.parse().with_context(|| format!("invalid url: {url}"))?;
    let mut req = Request::new(Method::GET, parsed);
    *req.timeout_mut() = Some(REQUEST_TIMEOUT);
    Ok(req)
}

/// Downloads a URL and returns the raw response body.
///
/// # Errors
///
/// Returns an error on transport failure or a non-2xx status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let resp = client.execute(get_request(url)?).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads a URL and returns the response body as text.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let resp = client.execute(get_request(url)?).await?.error_for_status()?;
    Ok(resp.text().await?)
}

/// Downloads a page, retrying a fixed number of times before giving up.
///
/// Attempts run sequentially with a short pause in between; once the
/// attempt budget is spent the last error is returned.
pub async fn fetch_text_with_retry<C: HttpClient>(
    client: &C,
    url: &str,
    attempts: u32,
) -> Result<String> {
    let mut last_err = None;

    for attempt in 1..=attempts {
        match fetch_text(client, url).await {
            Ok(text) => {
                if attempt > 1 {
                    info!(attempt, "Download succeeded after retry");
                }
                return Ok(text);
            }
            Err(e) => {
                warn!(attempt, attempts, error = %e, "Download attempt failed");
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    match last_err {
        Some(e) => Err(e.context(format!("failed to download {url} after {attempts} attempts"))),
        None => bail!("download attempt budget was zero"),
    }
}
