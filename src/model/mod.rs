//! The canonical recipe record.

mod decode;
pub mod duration;
mod fields;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExtractError;

pub(crate) use decode::{clean_text, date_of, has_type, leading_integer};
pub use fields::{
    Category, CookingMethod, Cuisine, Description, HowToItem, HowToTool, Image, Ingredients,
    Instructions, Keywords, NutritionSchema, SchemaType, ThumbnailUrl, Tools, VideoObject, Videos,
    Yield,
};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const RECIPE_TYPE: &str = "Recipe";
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// A normalized schema.org `Recipe`.
///
/// Serializes with schema.org property names. Deserializing goes through the
/// tolerant decoder, so any producer's JSON-LD recipe node can be read
/// directly with `serde_json::from_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecipe")]
pub struct RecipeSchema {
    #[serde(rename = "@context")]
    pub at_context: String,
    #[serde(rename = "@type")]
    pub at_type: SchemaType,
    pub name: String,
    pub description: Description,
    pub url: String,
    pub image: Image,
    #[serde(rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<ThumbnailUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "dateCreated", skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(rename = "datePublished", skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(rename = "dateModified", skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(rename = "recipeCategory")]
    pub category: Category,
    #[serde(rename = "recipeCuisine")]
    pub cuisine: Cuisine,
    #[serde(rename = "cookingMethod")]
    pub cooking_method: CookingMethod,
    pub keywords: Keywords,
    #[serde(rename = "recipeYield")]
    pub recipe_yield: Yield,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    #[serde(rename = "totalTime")]
    pub total_time: String,
    #[serde(rename = "recipeIngredient")]
    pub ingredients: Ingredients,
    #[serde(rename = "recipeInstructions")]
    pub instructions: Instructions,
    #[serde(rename = "tool")]
    pub tools: Tools,
    #[serde(rename = "nutrition")]
    pub nutrition_schema: NutritionSchema,
    pub video: Videos,
}

impl Default for RecipeSchema {
    fn default() -> Self {
        Self {
            at_context: SCHEMA_CONTEXT.to_string(),
            at_type: SchemaType::new(RECIPE_TYPE),
            name: String::new(),
            description: Description::default(),
            url: String::new(),
            image: Image::default(),
            thumbnail_url: None,
            author: None,
            date_created: None,
            date_published: None,
            date_modified: None,
            category: Category::new(DEFAULT_CATEGORY),
            cuisine: Cuisine::default(),
            cooking_method: CookingMethod::default(),
            keywords: Keywords::default(),
            recipe_yield: Yield::default(),
            prep_time: String::new(),
            cook_time: String::new(),
            total_time: String::new(),
            ingredients: Ingredients::default(),
            instructions: Instructions::default(),
            tools: Tools::default(),
            nutrition_schema: NutritionSchema::default(),
            video: Videos::default(),
        }
    }
}

impl RecipeSchema {
    /// Decode a JSON-LD recipe node.
    pub fn from_json(node: &Value) -> Result<Self, ExtractError> {
        if !node.is_object() {
            return Err(ExtractError::MalformedRecipe(
                "recipe node is not a JSON object".to_string(),
            ));
        }
        serde_json::from_value(node.clone())
            .map_err(|e| ExtractError::MalformedRecipe(e.to_string()))
    }

    /// Re-establish the post-conditions every returned recipe satisfies.
    ///
    /// Idempotent; extractors call it after overlaying DOM values and the
    /// pipeline calls it once more before returning.
    pub fn normalize(&mut self) {
        self.at_context = SCHEMA_CONTEXT.to_string();
        self.at_type = SchemaType::new(RECIPE_TYPE);
        self.url = self.url.trim().to_string();

        // DOM overlays store raw text; bring it to the form decoding produces
        for text in [
            &mut self.name,
            &mut self.description.value,
            &mut self.category.value,
            &mut self.cuisine.value,
            &mut self.cooking_method.value,
            &mut self.image.value,
        ] {
            *text = clean_text(text);
        }
        if let Some(thumbnail) = &mut self.thumbnail_url {
            thumbnail.value = clean_text(&thumbnail.value);
        }
        self.thumbnail_url = self.thumbnail_url.take().filter(|t| !t.is_empty());
        self.keywords = Keywords::from_value(&Value::String(self.keywords.value.clone()));
        self.ingredients.clean();
        self.instructions.clean();
        self.tools.clean();

        if self.category.is_empty() {
            self.category.value = DEFAULT_CATEGORY.to_string();
        }

        for duration in [&mut self.prep_time, &mut self.cook_time, &mut self.total_time] {
            *duration = duration::normalize_duration_str(duration);
        }
    }

    /// A recipe must carry at least ingredients or instructions.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.ingredients.is_empty() && self.instructions.is_empty() {
            return Err(ExtractError::MalformedRecipe(format!(
                "\"{}\" has neither ingredients nor instructions",
                self.name
            )));
        }
        Ok(())
    }
}

/// Wire shape accepted from producers; every property optional and loose.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecipe {
    #[serde(rename = "@type")]
    at_type: Option<SchemaType>,
    name: Option<Value>,
    description: Option<Description>,
    url: Option<Value>,
    image: Option<Image>,
    #[serde(rename = "thumbnailUrl")]
    thumbnail_url: Option<ThumbnailUrl>,
    author: Option<Value>,
    #[serde(rename = "dateCreated")]
    date_created: Option<Value>,
    #[serde(rename = "datePublished")]
    date_published: Option<Value>,
    #[serde(rename = "dateModified")]
    date_modified: Option<Value>,
    #[serde(rename = "recipeCategory")]
    category: Option<Category>,
    #[serde(rename = "recipeCuisine")]
    cuisine: Option<Cuisine>,
    #[serde(rename = "cookingMethod")]
    cooking_method: Option<CookingMethod>,
    keywords: Option<Keywords>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<Yield>,
    #[serde(rename = "prepTime")]
    prep_time: Option<Value>,
    #[serde(rename = "cookTime")]
    cook_time: Option<Value>,
    #[serde(rename = "totalTime")]
    total_time: Option<Value>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<Ingredients>,
    ingredients: Option<Ingredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<Instructions>,
    tool: Option<Tools>,
    nutrition: Option<NutritionSchema>,
    video: Option<Videos>,
}

impl From<RawRecipe> for RecipeSchema {
    fn from(raw: RawRecipe) -> Self {
        let mut ingredients = raw.recipe_ingredient.unwrap_or_default();
        if let Some(legacy) = raw.ingredients {
            ingredients.values.extend(legacy.values);
        }

        let text = |value: Option<Value>, keys: &[&str]| {
            value
                .as_ref()
                .and_then(|v| decode::text_of(v, keys))
                .map(|t| clean_text(&t))
                .unwrap_or_default()
        };
        let duration = |value: Option<Value>| {
            value
                .as_ref()
                .map(duration::normalize_duration)
                .unwrap_or_default()
        };

        let mut recipe = RecipeSchema {
            at_type: raw.at_type.unwrap_or_default(),
            name: text(raw.name, &["value", "name"]),
            description: raw.description.unwrap_or_default(),
            url: raw
                .url
                .as_ref()
                .and_then(|v| decode::text_of(v, &["value", "@id"]))
                .unwrap_or_default(),
            image: raw.image.unwrap_or_default(),
            thumbnail_url: raw.thumbnail_url.filter(|t| !t.is_empty()),
            author: raw.author.as_ref().and_then(decode::author_of),
            date_created: raw.date_created.as_ref().and_then(decode::date_of),
            date_published: raw.date_published.as_ref().and_then(decode::date_of),
            date_modified: raw.date_modified.as_ref().and_then(decode::date_of),
            category: raw.category.unwrap_or_default(),
            cuisine: raw.cuisine.unwrap_or_default(),
            cooking_method: raw.cooking_method.unwrap_or_default(),
            keywords: raw.keywords.unwrap_or_default(),
            recipe_yield: raw.recipe_yield.unwrap_or_default(),
            prep_time: duration(raw.prep_time),
            cook_time: duration(raw.cook_time),
            total_time: duration(raw.total_time),
            ingredients,
            instructions: raw.recipe_instructions.unwrap_or_default(),
            tools: raw.tool.unwrap_or_default(),
            nutrition_schema: raw.nutrition.unwrap_or_default(),
            video: raw.video.unwrap_or_default(),
            ..RecipeSchema::default()
        };
        recipe.normalize();
        recipe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_materializes_wrappers() {
        let recipe = RecipeSchema::default();
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["@context"], "https://schema.org");
        assert_eq!(json["@type"], "Recipe");
        assert_eq!(json["recipeCategory"], "uncategorized");
        assert_eq!(json["recipeCuisine"], "");
        assert_eq!(json["cookingMethod"], "");
        assert_eq!(json["keywords"], "");
        assert_eq!(json["image"], "");
        assert_eq!(json["tool"], json!([]));
        assert_eq!(json["nutrition"], json!({}));
        assert_eq!(json["video"], json!([]));
        assert!(json.get("thumbnailUrl").is_none());
    }

    #[test]
    fn test_context_and_type_are_forced() {
        let recipe = RecipeSchema::from_json(&json!({
            "@context": "http://schema.org/",
            "@type": ["recipe", "NewsArticle"],
            "name": "Soup",
            "recipeIngredient": ["water"]
        }))
        .unwrap();
        assert_eq!(recipe.at_context, SCHEMA_CONTEXT);
        assert_eq!(recipe.at_type.value, RECIPE_TYPE);
    }

    #[test]
    fn test_legacy_ingredients_are_merged() {
        let recipe = RecipeSchema::from_json(&json!({
            "@type": "Recipe",
            "recipeIngredient": ["flour", "sugar"],
            "ingredients": ["sugar", "eggs"]
        }))
        .unwrap();
        assert_eq!(recipe.ingredients.values, vec!["flour", "sugar", "sugar", "eggs"]);
    }

    #[test]
    fn test_validate_requires_content() {
        let recipe = RecipeSchema::from_json(&json!({"@type": "Recipe", "name": "Empty"})).unwrap();
        assert!(matches!(
            recipe.validate(),
            Err(ExtractError::MalformedRecipe(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(RecipeSchema::from_json(&json!(["Recipe"])).is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut recipe = RecipeSchema::from_json(&json!({
            "@type": "Recipe",
            "name": "  Ribs ",
            "recipeCategory": " Fish &amp;amp; Chips ",
            "cookTime": "150",
            "recipeIngredient": ["ribs"]
        }))
        .unwrap();
        let once = recipe.clone();
        recipe.normalize();
        assert_eq!(recipe, once);
        assert_eq!(recipe.category.value, "Fish & Chips");
        assert_eq!(recipe.cook_time, "PT150M");
    }
}
