use log::error;
use std::env;

use recipe_extract::{ExtractorConfig, RecipeExtractor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the URL from command-line arguments
    let args: Vec<String> = env::args().collect();
    let url = args.get(1).ok_or("Usage: recipe-extract <url>")?;

    let config = ExtractorConfig::load()?;
    let extractor = RecipeExtractor::builder().config(&config).build()?;

    match extractor.extract(url).await {
        Ok(recipe) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        Err(e) => {
            error!("Unable to extract a recipe from {}: {}", url, e);
            Err(e.into())
        }
    }
}
