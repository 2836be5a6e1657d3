//! Fetch → parse → dispatch → extract → normalize → relocate.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use url::Url;

use crate::cancel::CancelToken;
use crate::document::Document;
use crate::error::ExtractError;
use crate::extractors::ParsingContext;
use crate::fetchers::{FetchedPage, HttpClient};
use crate::hosts::Registry;
use crate::model::{Image, RecipeSchema};
use crate::relocate::ImageRelocator;

/// One extraction request at a time per call; a `Pipeline` can be shared
/// across tasks.
#[derive(Clone)]
pub struct Pipeline {
    client: Arc<dyn HttpClient>,
    relocator: Arc<dyn ImageRelocator>,
}

impl Pipeline {
    pub fn new(client: Arc<dyn HttpClient>, relocator: Arc<dyn ImageRelocator>) -> Self {
        Self { client, relocator }
    }

    /// Extract the recipe at `url`.
    ///
    /// The fetch must finish before `deadline`. `cancel` is honored while
    /// fetching and while relocating the image, the only points where the
    /// pipeline waits.
    pub async fn run(
        &self,
        url: &str,
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<RecipeSchema, ExtractError> {
        let url = Url::parse(url)?;
        if cancel.is_cancelled() {
            return Err(ExtractError::Cancelled);
        }
        // Blacklisted hosts are rejected before any network traffic
        Registry::global().lookup(&url)?;

        let page = self.fetch(&url, deadline, cancel).await?;
        let document = Document::from_bytes(&page.body, page.content_type.as_deref());
        let mut recipe = extract_document(document, url)?;

        self.relocate_image(&mut recipe, cancel).await?;
        info!("Extracted recipe {:?}", recipe.name);
        Ok(recipe)
    }

    async fn fetch(
        &self,
        url: &Url,
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<FetchedPage, ExtractError> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        let deadline = tokio::time::Instant::from_std(deadline);
        debug!("Pipeline: fetching {} with {:?} left", url, timeout);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExtractError::Cancelled),
            result = tokio::time::timeout_at(deadline, self.client.fetch(url.as_str(), timeout)) => {
                match result {
                    Ok(Ok(page)) => Ok(page),
                    Ok(Err(e)) => Err(ExtractError::Fetch(e)),
                    Err(elapsed) => Err(ExtractError::Fetch(Box::new(elapsed))),
                }
            }
        }
    }

    async fn relocate_image(
        &self,
        recipe: &mut RecipeSchema,
        cancel: &CancelToken,
    ) -> Result<(), ExtractError> {
        if recipe.image.is_empty() {
            debug!("Pipeline: no image to relocate");
            return Ok(());
        }

        let remote = recipe.image.value.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExtractError::Cancelled),
            result = self.relocator.relocate(&remote) => match result {
                Ok(local) => {
                    debug!("Pipeline: image {} relocated to {}", remote, local);
                    recipe.image = Image::new(local);
                }
                Err(e) => warn!("Image relocation failed for {}, keeping remote URL: {}", remote, e),
            }
        }
        Ok(())
    }
}

/// The synchronous middle of the pipeline: dispatch on the URL's host, run
/// the extractor and re-establish the output post-conditions.
pub(crate) fn extract_document(
    document: Document,
    url: Url,
) -> Result<RecipeSchema, ExtractError> {
    let context = ParsingContext::new(url, document);
    let mut recipe = Registry::global().dispatch(&context)?;

    if recipe.url.is_empty() {
        recipe.url = context.url.to_string();
    }
    recipe.normalize();
    recipe.validate()?;
    Ok(recipe)
}
