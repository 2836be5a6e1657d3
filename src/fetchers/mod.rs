//! The HTTP collaborator the pipeline fetches pages through.

mod request;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;

pub use request::{RequestFetcher, DEFAULT_USER_AGENT};

/// A fetched page body with the response's `Content-Type`, if any.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedPage {
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        }
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url`, failing on transport errors, non-2xx statuses and when
    /// `timeout` elapses.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, BoxError>;
}
