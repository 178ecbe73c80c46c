//! Locating and fetching robots.txt for a site

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use url::Url;

/// Build the robots.txt URL for the site `input` belongs to.
///
/// Only the origin (scheme + host + optional port) is kept. Inputs without a
/// scheme are treated as `https`.
pub fn robots_url(input: &str) -> Result<Url> {
    let input = input.trim();
    let parsed = match Url::parse(input) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("https://{}", input.trim_end_matches('/')))
            .with_context(|| format!("invalid site URL: {input}"))?,
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("unsupported URL scheme: {}", parsed.scheme()));
    }

    let origin = parsed.origin().ascii_serialization();
    Url::parse(&format!("{}/robots.txt", origin.trim_end_matches('/')))
        .context("failed to build robots.txt URL")
}

/// A robots.txt response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedRobots {
    pub url: String,

    /// Whether robots.txt was found
    pub found: bool,

    /// HTTP status code
    pub status_code: u16,

    /// Body, empty when not found
    pub content: String,
}

/// Fetch robots.txt from `url`.
///
/// A 4xx response means the site has no robots.txt and is returned with
/// `found = false`. Other non-success statuses are errors.
#[cfg(feature = "fetch")]
pub async fn fetch_robots_txt(url: &Url) -> Result<FetchedRobots> {
    let client = reqwest::Client::builder()
        .user_agent(format!(
            "Mozilla/5.0 (compatible; robotlens-core/{})",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;

    let response = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", url))?;

    let status = response.status();
    tracing::debug!(%url, status = status.as_u16(), "fetched robots.txt");

    if status.is_client_error() {
        return Ok(FetchedRobots {
            url: url.to_string(),
            found: false,
            status_code: status.as_u16(),
            content: String::new(),
        });
    }

    if !status.is_success() {
        return Err(anyhow!("unexpected status {} for {}", status, url));
    }

    let content = response
        .text()
        .await
        .context("Failed to read response body")?;

    Ok(FetchedRobots {
        url: url.to_string(),
        found: true,
        status_code: status.as_u16(),
        content,
    })
}
