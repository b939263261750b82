//! HTTPS download into a session-relative destination.

use crate::config::DownloadConfig;
use crate::error::PolicyViolation;
use crate::exec::ExecutionResult;
use crate::security::{SecurityPolicy, validate_download_url};
use crate::session::ShellSession;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DownloadResult {
    #[serde(flatten)]
    pub result: ExecutionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl From<PolicyViolation> for DownloadResult {
    fn from(violation: PolicyViolation) -> Self {
        Self {
            result: violation.into(),
            path: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    max_bytes: u64,
}

impl Downloader {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(concat!("shellgate/", env!("CARGO_PKG_VERSION")))
            .https_only(true)
            .redirect(redirect_policy())
            .build()
            .context("Failed to build download client")?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    /// Fetch `url` into `destination` (resolved against the session).
    ///
    /// Only `https` URLs are accepted and the destination goes through the
    /// traversal guard. A partially written file is removed on failure.
    pub async fn download(
        &self,
        policy: &SecurityPolicy,
        session: &ShellSession,
        url: &str,
        destination: &str,
    ) -> DownloadResult {
        let url = match validate_download_url(url) {
            Ok(url) => url,
            Err(violation) => return violation.into(),
        };
        let target = match policy.resolve_mutation_target(session, destination) {
            Ok(target) => target,
            Err(violation) => return violation.into(),
        };

        match self.fetch(&url, &target).await {
            Ok(size) => {
                info!(%url, path = %target.display(), size, "download complete");
                DownloadResult {
                    result: ExecutionResult::success(format!(
                        "Downloaded: {url} to {} ({size} bytes)",
                        target.display()
                    )),
                    path: Some(target.display().to_string()),
                    size: Some(size),
                }
            }
            Err(e) => {
                warn!(%url, "download failed: {e:#}");
                DownloadResult {
                    result: ExecutionResult::failure(format!("Download failed: {e:#}")),
                    path: None,
                    size: None,
                }
            }
        }
    }

    async fn fetch(&self, url: &url::Url, target: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context("request failed")?
            .error_for_status()
            .context("server returned an error status")?;

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            bail!("content length {length} exceeds limit of {} bytes", self.max_bytes);
        }

        create_parent(target).await?;
        let mut file = tokio::fs::File::create(target)
            .await
            .with_context(|| format!("cannot create {}", target.display()))?;

        let streamed = self.stream_body(&mut response, &mut file).await;
        if streamed.is_err() {
            drop(file);
            if tokio::fs::remove_file(target).await.is_ok() {
                info!(path = %target.display(), "removed partial download");
            }
        }
        streamed
    }

    async fn stream_body(
        &self,
        response: &mut reqwest::Response,
        file: &mut tokio::fs::File,
    ) -> Result<u64> {
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.context("read failed")? {
            written += chunk.len() as u64;
            if written > self.max_bytes {
                bail!("body exceeds limit of {} bytes", self.max_bytes);
            }
            file.write_all(&chunk).await.context("write failed")?;
        }
        file.flush().await.context("write failed")?;
        Ok(written)
    }
}

/// Follows at most [`MAX_REDIRECTS`] hops, each of which must pass the same
/// URL check as the initial request.
fn redirect_policy() -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(|attempt| {
        match check_redirect(attempt.url(), attempt.previous().len()) {
            Ok(()) => attempt.follow(),
            Err(reason) => attempt.error(reason),
        }
    })
}

fn check_redirect(target: &url::Url, hops: usize) -> Result<(), String> {
    if hops > MAX_REDIRECTS {
        return Err(format!("more than {MAX_REDIRECTS} redirects"));
    }
    validate_download_url(target.as_str())
        .map(drop)
        .map_err(|violation| format!("redirect to {target} refused: {violation}"))
}

async fn create_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("cannot create {}", parent.display())),
        _ => Ok(()),
    }
}
