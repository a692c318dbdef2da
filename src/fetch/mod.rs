//! Single-attempt HTTP fetch. No retry or backoff: each source gets one
//! try per run and failure is handled at the pipeline boundary.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::fs;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = "mrscraper";

fn http_timeout() -> Duration {
    let secs = env::var("HTTP_TIMEOUT_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn user_agent() -> String {
    env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string())
}

/// Build the shared client with the env-configured timeout and UA.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(http_timeout())
        .user_agent(user_agent())
        .build()
        .context("building HTTP client")
}

/// Fetch a page body, one attempt, failing on non-success status.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?
        .error_for_status()
        .with_context(|| format!("fetching {}", url))?;
    resp.text().await.context("reading response body")
}

/// Download a document and save it under `dest_dir` using the URL's
/// filename. Returns the saved path.
pub async fn download_document(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let url = Url::parse(url_str).with_context(|| format!("parsing URL {}", url_str))?;
    let filename = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("download.pdf");
    let dest_path = dest_dir.join(filename);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let resp = client
        .get(url.as_str())
        .send()
        .await?
        .error_for_status()
        .with_context(|| format!("downloading {}", url_str))?;
    let bytes = resp.bytes().await?;
    fs::write(&dest_path, &bytes).await?;

    Ok(dest_path)
}
