use thiserror::Error;

/// Boxed error type returned by the HTTP and image collaborators
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during recipe extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The URL host is explicitly blacklisted
    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    /// Every extraction strategy came back without a recipe node
    #[error("No recipe found on this webpage")]
    NoRecipeFound,

    /// A recipe node was found but carries neither ingredients nor instructions
    #[error("Malformed recipe: {0}")]
    MalformedRecipe(String),

    /// The caller cancelled the extraction
    #[error("Extraction cancelled")]
    Cancelled,

    /// The HTTP collaborator failed
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[source] BoxError),

    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ExtractError {
    /// Whether another strategy is worth trying after this failure
    pub(crate) fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExtractError::NoRecipeFound | ExtractError::MalformedRecipe(_)
        )
    }
}
