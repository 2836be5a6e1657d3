use log::debug;
use url::Url;

use crate::document::Document;
use crate::error::ExtractError;
use crate::model::RecipeSchema;

mod json_ld;
mod microdata;

pub use json_ld::{parse_graph, parse_ld_json};
pub use microdata::parse_website;

/// Everything an extractor sees: the page URL and its parsed DOM.
pub struct ParsingContext {
    pub url: Url,
    pub document: Document,
}

impl ParsingContext {
    pub fn new(url: Url, document: Document) -> Self {
        Self { url, document }
    }
}

/// Produces a recipe from a parsed page. Implementations are pure: no I/O,
/// and the same context always yields the same recipe.
pub trait Extractor: Send + Sync {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeSchema, ExtractError>;
}

/// A structured-data helper usable as a base strategy.
pub type StrategyFn = fn(&Document) -> Result<RecipeSchema, ExtractError>;

/// Run `strategies` in order and return the first recipe.
///
/// A `MalformedRecipe` from any strategy is reported in preference to
/// `NoRecipeFound`, since it means a recipe node did exist.
pub(crate) fn first_success(
    document: &Document,
    strategies: &[(&str, StrategyFn)],
) -> Result<RecipeSchema, ExtractError> {
    let mut last_error = ExtractError::NoRecipeFound;
    for (name, strategy) in strategies {
        match strategy(document) {
            Ok(recipe) => {
                debug!("Strategy {} found recipe {:?}", name, recipe.name);
                return Ok(recipe);
            }
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(e) => {
                debug!("Strategy {} failed: {}", name, e);
                if matches!(e, ExtractError::MalformedRecipe(_)) {
                    last_error = e;
                }
            }
        }
    }
    Err(last_error)
}

/// Fallback for hosts without a registry entry: plain JSON-LD, then
/// `@graph` JSON-LD, then microdata.
pub struct DefaultExtractor;

impl DefaultExtractor {
    pub(crate) const STRATEGIES: [(&'static str, StrategyFn); 3] = [
        ("ld+json", parse_ld_json),
        ("graph", parse_graph),
        ("microdata", parse_website),
    ];
}

impl Extractor for DefaultExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
        debug!("DefaultExtractor: parsing {}", context.url);
        first_success(&context.document, &Self::STRATEGIES)
    }
}
