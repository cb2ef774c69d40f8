//! HTTP transport, rate limiting, and retrying fetches.

mod basic;
mod client;
pub mod limiter;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use limiter::RateLimiter;
pub use retry::{Attempt, Fetcher, Payload};

use anyhow::Result;
use reqwest::StatusCode;

/// Status and decoded body of one GET.
#[derive(Debug)]
pub struct FetchedBody {
    pub status: StatusCode,
    pub text: String,
}

/// Issues a GET for `url` and reads the whole body as text.
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<FetchedBody> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    let text = resp.text().await?;
    Ok(FetchedBody { status, text })
}
