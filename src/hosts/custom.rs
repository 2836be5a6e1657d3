//! Sites whose recipe is (partly) built from the DOM.

use log::debug;
use serde_json::Value;

use crate::document::{element_text, selector, Document};
use crate::error::ExtractError;
use crate::extractors::{parse_ld_json, ParsingContext};
use crate::model::duration::parse_human_duration;
use crate::model::{
    date_of, leading_integer, Description, HowToItem, Image, Ingredients, Instructions,
    RecipeSchema, Yield,
};

/// latelierderoxane.com publishes no structured data; everything comes
/// from the article markup.
pub(super) fn latelierderoxane(context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
    let document = &context.document;
    let name = document.text("h1").ok_or(ExtractError::NoRecipeFound)?;

    let duration = |css: &str| {
        document
            .text(css)
            .map(|text| parse_human_duration(&text))
            .unwrap_or_default()
    };
    let steps = document
        .texts(".recipe_steps .step p")
        .into_iter()
        .map(HowToItem::step)
        .collect();

    let mut recipe = RecipeSchema {
        name,
        description: Description::new(
            document
                .attr("meta[name='description']", "content")
                .unwrap_or_default(),
        ),
        url: context.url.to_string(),
        image: Image::new(
            document
                .attr("meta[property='og:image']", "content")
                .unwrap_or_default(),
        ),
        date_published: document
            .attr("meta[property='article:published_time']", "content")
            .and_then(|date| date_of(&Value::String(date))),
        recipe_yield: Yield::new(
            document
                .text(".recipe_infos .portions")
                .and_then(|text| leading_integer(&text))
                .unwrap_or_default(),
        ),
        prep_time: duration(".recipe_infos .preparation"),
        cook_time: duration(".recipe_infos .cuisson"),
        total_time: duration(".recipe_infos .total"),
        ingredients: Ingredients::new(document.texts(".recipe_ingredients li")),
        instructions: Instructions::new(steps),
        ..RecipeSchema::default()
    };
    recipe.normalize();
    recipe.validate()?;
    Ok(recipe)
}

/// ricardocuisine.com flattens its sectioned method in JSON-LD; the page
/// keeps the sections, so instructions are rebuilt from the DOM.
pub(super) fn ricardocuisine(context: &ParsingContext) -> Result<RecipeSchema, ExtractError> {
    let mut recipe = parse_ld_json(&context.document)?;
    let sectioned = sectioned_instructions(&context.document);
    if sectioned.step_count() > 0 {
        debug!(
            "ricardocuisine: {} steps rebuilt from page sections",
            sectioned.step_count()
        );
        recipe.instructions = sectioned;
    }
    Ok(recipe)
}

fn sectioned_instructions(document: &Document) -> Instructions {
    let (Some(heading), Some(item)) = (selector("h3"), selector("li")) else {
        return Instructions::default();
    };

    let mut values = Vec::new();
    for block in document.select_all(".preparation-steps section") {
        if let Some(title) = block
            .select(&heading)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
        {
            values.push(HowToItem::section(title));
        }
        values.extend(
            block
                .select(&item)
                .map(|el| element_text(&el))
                .filter(|t| !t.is_empty())
                .map(HowToItem::step),
        );
    }
    Instructions::new(values)
}
