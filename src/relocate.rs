//! The image collaborator: turns a remote image URL into a local reference.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use log::debug;
use reqwest::Client;
use url::Url;

use crate::error::{BoxError, ExtractError};

#[async_trait]
pub trait ImageRelocator: Send + Sync {
    /// Store the image at `remote_url` and return the reference to use in
    /// its place.
    async fn relocate(&self, remote_url: &str) -> Result<String, BoxError>;
}

/// Keeps the remote URL as the image reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRelocator;

#[async_trait]
impl ImageRelocator for NoopRelocator {
    async fn relocate(&self, remote_url: &str) -> Result<String, BoxError> {
        Ok(remote_url.to_string())
    }
}

/// Downloads images into a directory and returns the local file path.
///
/// File names are derived from the URL, so relocating the same image twice
/// overwrites one file instead of accumulating copies.
#[derive(Debug, Clone)]
pub struct DirectoryRelocator {
    dir: PathBuf,
    client: Client,
    timeout: Duration,
}

impl DirectoryRelocator {
    pub fn new(dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, ExtractError> {
        let client = Client::builder().build().map_err(|e| {
            ExtractError::BuilderError(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self {
            dir: dir.into(),
            client,
            timeout,
        })
    }
}

#[async_trait]
impl ImageRelocator for DirectoryRelocator {
    async fn relocate(&self, remote_url: &str) -> Result<String, BoxError> {
        let url = Url::parse(remote_url)?;
        let bytes = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(local_file_name(&url));
        tokio::fs::write(&path, &bytes).await?;
        debug!(
            "DirectoryRelocator: {} -> {} ({} bytes)",
            remote_url,
            path.display(),
            bytes.len()
        );

        Ok(path.to_string_lossy().into_owned())
    }
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

fn local_file_name(url: &Url) -> String {
    let stem = URL_SAFE_NO_PAD.encode(fnv1a(url.as_str().as_bytes()).to_be_bytes());

    let extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| (1..=5).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "img".to_string());

    format!("{stem}.{extension}")
}
