pub mod builder;
pub mod cancel;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod hosts;
pub mod model;
pub mod pipeline;
pub mod relocate;

use std::sync::Arc;
use std::time::Instant;

use url::Url;

pub use builder::{RecipeExtractor, RecipeExtractorBuilder};
pub use cancel::CancelToken;
pub use config::ExtractorConfig;
pub use document::Document;
pub use error::{BoxError, ExtractError};
pub use fetchers::{FetchedPage, HttpClient, RequestFetcher};
pub use model::RecipeSchema;
pub use pipeline::Pipeline;
pub use relocate::{DirectoryRelocator, ImageRelocator, NoopRelocator};

/// Fetch `url` and extract its recipe, keeping the remote image URL.
///
/// # Example
/// ```no_run
/// # use std::time::{Duration, Instant};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let deadline = Instant::now() + Duration::from_secs(30);
/// let recipe = recipe_extract::extract("https://www.lecker.de/rezept-79685.html", deadline).await?;
/// println!("{}", serde_json::to_string_pretty(&recipe)?);
/// # Ok(())
/// # }
/// ```
pub async fn extract(url: &str, deadline: Instant) -> Result<RecipeSchema, ExtractError> {
    let pipeline = Pipeline::new(Arc::new(RequestFetcher::new(None)?), Arc::new(NoopRelocator));
    pipeline.run(url, deadline, &CancelToken::new()).await
}

/// Extract the recipe from already fetched `html` served at `url`.
///
/// Runs the same dispatch and normalization as [`extract`], without any
/// network access or image relocation.
pub fn extract_html(html: &str, url: &str) -> Result<RecipeSchema, ExtractError> {
    let url = Url::parse(url)?;
    pipeline::extract_document(Document::parse(html), url)
}
