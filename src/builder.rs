use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::fetchers::{HttpClient, RequestFetcher};
use crate::model::RecipeSchema;
use crate::pipeline::Pipeline;
use crate::relocate::{DirectoryRelocator, ImageRelocator, NoopRelocator};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for configuring a [`RecipeExtractor`]
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    client: Option<Arc<dyn HttpClient>>,
    relocator: Option<Arc<dyn ImageRelocator>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    image_dir: Option<PathBuf>,
}

impl RecipeExtractorBuilder {
    /// Use a custom HTTP client instead of the reqwest-backed default
    pub fn client(mut self, client: impl HttpClient + 'static) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Use a custom image relocator
    ///
    /// Takes precedence over [`image_dir`](Self::image_dir).
    pub fn relocator(mut self, relocator: impl ImageRelocator + 'static) -> Self {
        self.relocator = Some(Arc::new(relocator));
        self
    }

    /// Set the fetch timeout used by [`RecipeExtractor::extract`]
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeExtractor::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the User-Agent header for the default HTTP client
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Download recipe images into `dir`
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Fill every setting not already given from `config`
    pub fn config(mut self, config: &ExtractorConfig) -> Self {
        self.timeout = self.timeout.or(Some(config.timeout()));
        self.user_agent = self.user_agent.or_else(|| Some(config.user_agent.clone()));
        self.image_dir = self.image_dir.or_else(|| config.image_dir.clone());
        self
    }

    /// Build the extractor
    ///
    /// # Errors
    /// Returns `ExtractError::BuilderError` if the HTTP client cannot be created
    /// or the timeout is zero.
    pub fn build(self) -> Result<RecipeExtractor, ExtractError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ExtractError::BuilderError(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        let client: Arc<dyn HttpClient> = match self.client {
            Some(client) => client,
            None => Arc::new(RequestFetcher::new(self.user_agent.as_deref())?),
        };
        let relocator: Arc<dyn ImageRelocator> = match (self.relocator, self.image_dir) {
            (Some(relocator), _) => relocator,
            (None, Some(dir)) => Arc::new(DirectoryRelocator::new(dir, timeout)?),
            (None, None) => Arc::new(NoopRelocator),
        };

        Ok(RecipeExtractor {
            pipeline: Pipeline::new(client, relocator),
            timeout,
        })
    }
}

/// Main entry point for the builder API
#[derive(Clone)]
pub struct RecipeExtractor {
    pipeline: Pipeline,
    timeout: Duration,
}

impl RecipeExtractor {
    /// Creates a new builder
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_extract::RecipeExtractor;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let extractor = RecipeExtractor::builder().build()?;
    /// let recipe = extractor
    ///     .extract("https://livelytable.com/bbq-ribs-on-the-charcoal-grill/")
    ///     .await?;
    /// println!("{}", recipe.name);
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    /// Extract with the configured timeout as deadline and no cancellation
    pub async fn extract(&self, url: &str) -> Result<RecipeSchema, ExtractError> {
        let deadline = Instant::now() + self.timeout;
        self.extract_with(url, deadline, &CancelToken::new()).await
    }

    pub async fn extract_with(
        &self,
        url: &str,
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<RecipeSchema, ExtractError> {
        self.pipeline.run(url, deadline, cancel).await
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
