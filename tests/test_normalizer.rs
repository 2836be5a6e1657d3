use recipe_extract::extract_html;
use recipe_extract::model::{HowToItem, RecipeSchema};
use serde_json::{json, Value};

fn full_recipe_json() -> Value {
    json!({
        "@context": "http://schema.org",
        "@type": "Recipe",
        "name": "Chick-fil-A Peppermint Milkshake",
        "description": "A copycat holiday milkshake &amp; treat.",
        "url": "https://lifestyleofafoodie.com/chick-fil-a-peppermint-milkshake/",
        "image": [
            {"@type": "ImageObject", "url": "https://lifestyleofafoodie.com/img/shake.jpg"},
            "https://lifestyleofafoodie.com/img/shake-2.jpg"
        ],
        "thumbnailUrl": "https://lifestyleofafoodie.com/img/shake-150.jpg",
        "author": {"@type": "Person", "name": "Aline Shaw"},
        "datePublished": "2021-12-01",
        "dateModified": "not a date",
        "recipeCategory": {"@type": "Thing", "name": "Drinks"},
        "recipeCuisine": ["American", "Copycat"],
        "cookingMethod": "Blended",
        "keywords": ["milkshake", "peppermint"],
        "recipeYield": {"@type": "QuantitativeValue", "value": 2},
        "prepTime": "pt5m",
        "cookTime": 0,
        "totalTime": "5",
        "recipeIngredient": [
            "4 cups vanilla ice cream",
            {"@type": "PropertyValue", "amount": "1/2 cup", "name": "milk"}
        ],
        "recipeInstructions": [
            {
                "@type": "HowToSection",
                "name": "Shake",
                "itemListElement": [
                    {"@type": "HowToStep", "text": "Blend ice cream and milk."},
                    {"@type": "HowToStep", "name": "Add peppermint candies."}
                ]
            },
            "Top with whipped cream."
        ],
        "tool": ["Blender", {"@type": "HowToTool", "name": "Glasses", "requiredQuantity": 2}],
        "nutrition": {"@type": "NutritionInformation", "calories": "520 kcal", "sugarContent": "60 g"},
        "video": {
            "@type": "VideoObject",
            "name": "How to make it",
            "contentUrl": "https://lifestyleofafoodie.com/video.mp4"
        }
    })
}

#[test]
fn test_every_shape_is_decoded() {
    let recipe = RecipeSchema::from_json(&full_recipe_json()).unwrap();

    assert_eq!(recipe.at_context, "https://schema.org");
    assert_eq!(recipe.description.value, "A copycat holiday milkshake & treat.");
    assert_eq!(recipe.image.value, "https://lifestyleofafoodie.com/img/shake.jpg");
    assert_eq!(
        recipe.thumbnail_url.as_ref().map(|t| t.value.as_str()),
        Some("https://lifestyleofafoodie.com/img/shake-150.jpg")
    );
    assert_eq!(recipe.author.as_deref(), Some("Aline Shaw"));
    assert_eq!(recipe.date_published.as_deref(), Some("2021-12-01"));
    assert!(recipe.date_modified.is_none());
    assert_eq!(recipe.category.value, "Drinks");
    assert_eq!(recipe.cuisine.value, "American");
    assert_eq!(recipe.keywords.value, "milkshake, peppermint");
    assert_eq!(recipe.recipe_yield.value, 2);
    assert_eq!(recipe.prep_time, "PT5M");
    assert_eq!(recipe.cook_time, "PT0M");
    assert_eq!(recipe.total_time, "PT5M");
    assert_eq!(
        recipe.ingredients.values,
        vec!["4 cups vanilla ice cream", "1/2 cup milk"]
    );
    assert_eq!(
        recipe.instructions.values,
        vec![
            HowToItem::section("Shake"),
            HowToItem::step("Blend ice cream and milk."),
            HowToItem::step("Add peppermint candies."),
            HowToItem::step("Top with whipped cream."),
        ]
    );
    assert_eq!(recipe.tools.values.len(), 2);
    assert_eq!(recipe.tools.values[1].quantity, 2);
    assert_eq!(recipe.nutrition_schema.calories, "520 kcal");
    assert_eq!(recipe.nutrition_schema.sugar, "60 g");
    assert_eq!(
        recipe.video.values[0].content_url.as_deref(),
        Some("https://lifestyleofafoodie.com/video.mp4")
    );
}

#[test]
fn test_serialized_shape() {
    let recipe = RecipeSchema::from_json(&full_recipe_json()).unwrap();
    let json = serde_json::to_value(&recipe).unwrap();

    assert_eq!(json["@context"], "https://schema.org");
    assert_eq!(json["@type"], "Recipe");
    assert_eq!(json["recipeCategory"], "Drinks");
    assert_eq!(json["recipeYield"], 2);
    assert_eq!(json["recipeIngredient"][1], "1/2 cup milk");
    assert_eq!(
        json["recipeInstructions"][0],
        json!({"@type": "HowToSection", "name": "Shake"})
    );
    assert_eq!(
        json["recipeInstructions"][1],
        json!({"@type": "HowToStep", "text": "Blend ice cream and milk."})
    );
    assert_eq!(
        json["tool"][1],
        json!({"@type": "HowToTool", "name": "Glasses", "requiredQuantity": 2})
    );
    assert_eq!(json["nutrition"]["@type"], "NutritionInformation");
    assert_eq!(json["nutrition"]["calories"], "520 kcal");
    assert!(json["nutrition"].get("fatContent").is_none());
    assert_eq!(json["video"][0]["@type"], "VideoObject");
}

#[test]
fn test_round_trip() {
    let recipe = RecipeSchema::from_json(&full_recipe_json()).unwrap();
    let encoded = serde_json::to_string(&recipe).unwrap();
    let decoded: RecipeSchema = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, recipe);
}

#[test]
fn test_decode_is_idempotent() {
    let blobs = [
        full_recipe_json(),
        json!({"@type": "Recipe", "name": "Bare", "recipeInstructions": "One.\nTwo."}),
        json!({
            "@type": "Recipe",
            "name": "Fish &amp;amp; Chips",
            "recipeCategory": "",
            "recipeYield": "serves four",
            "totalTime": "about an hour",
            "recipeIngredient": "fish\nchips"
        }),
        json!({
            "@type": "Recipe",
            "name": "Tom &amp;amp;amp; Jerry",
            "recipeIngredient": {"@type": "ItemList", "itemListElement": ["cheese &amp;amp;amp; crackers"]},
            "recipeInstructions": [{"@type": "HowToStep", "text": "Chase &amp;amp;amp;amp; catch."}]
        }),
    ];
    for blob in blobs {
        let once = RecipeSchema::from_json(&blob).unwrap();
        let again = RecipeSchema::from_json(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(again, once);
    }
}

#[test]
fn test_defaults_for_missing_fields() {
    let recipe = RecipeSchema::from_json(&json!({"@type": "Recipe", "recipeIngredient": ["x"]})).unwrap();
    let json = serde_json::to_value(&recipe).unwrap();

    assert_eq!(json["recipeCategory"], "uncategorized");
    assert_eq!(json["recipeCuisine"], "");
    assert_eq!(json["cookingMethod"], "");
    assert_eq!(json["keywords"], "");
    assert_eq!(json["image"], "");
    assert_eq!(json["recipeYield"], 0);
    assert_eq!(json["tool"], json!([]));
    assert_eq!(json["nutrition"], json!({}));
    assert_eq!(json["totalTime"], "");
    assert!(json.get("author").is_none());
}

#[test]
fn test_page_extraction_round_trips() {
    let html = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta name="description" content="R&amp;amp;D cake">
        </head>
        <body>
            <h1>Cake &amp;amp; cr&amp;egrave;me</h1>
            <div class="recipe_ingredients"><ul><li>200 g de farine &amp;amp; sucre</li></ul></div>
            <div class="recipe_steps"><div class="step"><p>M&amp;eacute;langer.</p></div></div>
        </body>
        </html>
    "#;
    let once = extract_html(html, "https://www.latelierderoxane.com/blog/recette-cake").unwrap();
    assert_eq!(once.description.value, "R&D cake");
    assert_eq!(once.name, "Cake & crème");
    assert_eq!(once.ingredients.values, vec!["200 g de farine & sucre"]);

    let again = RecipeSchema::from_json(&serde_json::to_value(&once).unwrap()).unwrap();
    assert_eq!(again, once);
}
