use recipe_extract::hosts::Registry;
use recipe_extract::{extract_html, ExtractError};
use url::Url;

fn create_html_document(json_ld: &str, body: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            {body}
        </body>
        </html>
        "#
    )
}

#[test]
fn test_leanandgreenrecipes_keeps_producer_markup() {
    let json_ld = r##"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Spaghetti Squash Lasagna",
        "recipeCategory": "<a href=\"/recipes/category/main-course\" hreflang=\"en\">Main course</a>",
        "recipeYield": "4",
        "prepTime": "P0Y0M0DT0H20M0S",
        "totalTime": "P0Y0M0DT0H74M0S",
        "image": {"@type": "ImageObject", "url": "https://leanandgreenrecipes.net/sites/default/files/lasagna.jpg"},
        "recipeIngredient": ["1 spaghetti squash", "1 cup ricotta", "2 cups marinara"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Roast the squash."},
            {"@type": "HowToStep", "text": "Layer and bake."}
        ]
    }
    "##;
    let recipe = extract_html(
        &create_html_document(json_ld, ""),
        "https://leanandgreenrecipes.net/recipes/italian/spaghetti-squash-lasagna/",
    )
    .unwrap();

    assert_eq!(
        recipe.category.value,
        r#"<a href="/recipes/category/main-course" hreflang="en">Main course</a>"#
    );
    assert_eq!(recipe.recipe_yield.value, 4);
    assert_eq!(recipe.total_time, "P0Y0M0DT0H74M0S");
    assert_eq!(recipe.prep_time, "P0Y0M0DT0H20M0S");
    assert_eq!(
        recipe.image.value,
        "https://leanandgreenrecipes.net/sites/default/files/lasagna.jpg"
    );
}

#[test]
fn test_lecker_single_category_token() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebSite", "name": "lecker"},
            {
                "@type": "Recipe",
                "name": "Hähnchen-Curry mit Reis",
                "recipeCategory": "Hauptgericht, Abendessen, Schnelle Küche",
                "recipeCuisine": "Asiatisch",
                "recipeYield": "4 Portionen",
                "nutrition": {
                    "@type": "NutritionInformation",
                    "calories": "260",
                    "proteinContent": "21 g"
                },
                "recipeIngredient": ["400 g Hähnchenbrust", "200 g Reis"],
                "recipeInstructions": "Reis kochen.\nHähnchen anbraten.\nMit Curry ablöschen."
            }
        ]
    }
    "#;
    let recipe = extract_html(
        &create_html_document(json_ld, ""),
        "https://www.lecker.de/haehnchen-curry-mit-reis-79685.html",
    )
    .unwrap();

    assert_eq!(recipe.category.value, "Hauptgericht");
    assert_eq!(recipe.nutrition_schema.calories, "260");
    assert_eq!(recipe.nutrition_schema.protein, "21 g");
    assert_eq!(recipe.recipe_yield.value, 4);
    assert_eq!(recipe.instructions.step_count(), 3);
}

fn latelierderoxane_page() -> String {
    let steps: String = (1..=14)
        .map(|i| format!(r#"<div class="step"><span>{i}</span><p>Étape numéro {i} du cake.</p></div>"#))
        .collect();
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recette cake marbré</title>
            <meta name="description" content="Un cake marbré moelleux au chocolat.">
            <meta property="og:image" content="https://www.latelierderoxane.com/wp-content/uploads/cake-marbre.jpg">
            <meta property="article:published_time" content="2021-03-14T08:00:00+00:00">
        </head>
        <body>
            <h1>Cake marbré</h1>
            <div class="recipe_infos">
                <span class="portions">6 personnes</span>
                <span class="preparation">20 min</span>
                <span class="cuisson">1 h 05 min</span>
            </div>
            <div class="recipe_ingredients">
                <ul>
                    <li>200 g de farine</li>
                    <li>150 g de sucre</li>
                    <li>3 oeufs</li>
                    <li>125 g de beurre</li>
                    <li>2 c. à soupe de cacao</li>
                    <li>1 sachet de levure</li>
                </ul>
            </div>
            <div class="recipe_steps">{steps}</div>
        </body>
        </html>
        "#
    )
}

#[test]
fn test_latelierderoxane_dom_recipe() {
    let recipe = extract_html(
        &latelierderoxane_page(),
        "https://www.latelierderoxane.com/blog/recette-cake-marbre",
    )
    .unwrap();

    assert_eq!(recipe.name, "Cake marbré");
    assert_eq!(recipe.category.value, "uncategorized");
    assert_eq!(recipe.recipe_yield.value, 6);
    assert_eq!(recipe.instructions.step_count(), 14);
    assert_eq!(recipe.instructions.values[0].text(), "Étape numéro 1 du cake.");
    assert_eq!(recipe.ingredients.values.len(), 6);
    assert_eq!(recipe.prep_time, "PT20M");
    assert_eq!(recipe.cook_time, "PT1H5M");
    assert_eq!(recipe.description.value, "Un cake marbré moelleux au chocolat.");
    assert_eq!(
        recipe.image.value,
        "https://www.latelierderoxane.com/wp-content/uploads/cake-marbre.jpg"
    );
    assert_eq!(recipe.date_published.as_deref(), Some("2021-03-14T08:00:00+00:00"));
    assert_eq!(
        recipe.url,
        "https://www.latelierderoxane.com/blog/recette-cake-marbre"
    );
}

#[test]
fn test_forksoverknives_description_and_category() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebPage", "name": "Oatmeal"},
            {
                "@type": "Recipe",
                "name": "Apple Pie Oatmeal",
                "description": "Short teaser.",
                "recipeCategory": "<a href=\"https://www.forksoverknives.com/recipes/vegan-breakfast/\" rel=\"tag\">Vegan Breakfast</a>",
                "recipeIngredient": ["1 cup oats", "1 apple"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Simmer everything."}]
            }
        ]
    }
    "#;
    let body = r#"<div class="entry"><p class="core-paragraph">Warm, cozy and ready in 10 minutes.</p></div>"#;
    let recipe = extract_html(
        &create_html_document(json_ld, body),
        "https://www.forksoverknives.com/recipes/vegan-breakfast/apple-pie-oatmeal/",
    )
    .unwrap();

    assert_eq!(recipe.description.value, "Warm, cozy and ready in 10 minutes.");
    assert_eq!(recipe.category.value, "Breakfast");
}

#[test]
fn test_livelytable_graph_recipe() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "Article", "headline": "BBQ Ribs"},
            {
                "@type": "Recipe",
                "name": "BBQ Ribs on the Charcoal Grill",
                "cookingMethod": "grilled",
                "prepTime": "PT15M",
                "cookTime": "PT2H30M",
                "totalTime": "PT2H45M",
                "recipeYield": ["1", "1 rack"],
                "recipeCategory": ["Main Course"],
                "recipeCuisine": ["American"],
                "tool": [{"@type": "HowToTool", "name": "Charcoal grill"}],
                "recipeIngredient": ["1 rack baby back ribs", "1/2 cup BBQ sauce"],
                "recipeInstructions": [
                    {"@type": "HowToStep", "text": "Light the charcoal."},
                    {"@type": "HowToStep", "text": "Grill the ribs over indirect heat."}
                ]
            }
        ]
    }
    "#;
    let recipe = extract_html(
        &create_html_document(json_ld, ""),
        "https://livelytable.com/bbq-ribs-on-the-charcoal-grill/",
    )
    .unwrap();

    assert_eq!(recipe.cooking_method.value, "grilled");
    assert_eq!(recipe.cook_time, "PT2H30M");
    assert_eq!(recipe.recipe_yield.value, 1);
    assert_eq!(recipe.tools.values[0].text, "Charcoal grill");
    assert_eq!(recipe.tools.values[0].quantity, 1);
}

#[test]
fn test_nytimes_topnote_keeps_markup() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "name": "Crispy Gnocchi",
        "description": "Short.",
        "recipeIngredient": ["1 pound gnocchi"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Toast in <a href=\"/guides/skillet\">a skillet</a>."}
        ]
    }
    "#;
    let body = r#"<div class="topnote"><p>Adapted from <em>Ali Slagle</em>.</p></div>"#;
    let recipe = extract_html(
        &create_html_document(json_ld, body),
        "https://cooking.nytimes.com/recipes/1020000-crispy-gnocchi",
    )
    .unwrap();

    assert_eq!(recipe.description.value, "Adapted from <em>Ali Slagle</em>.");
    assert_eq!(recipe.instructions.values[0].text(), "Toast in a skillet.");
}

#[test]
fn test_site_extractors_are_deterministic() {
    let url = "https://www.latelierderoxane.com/blog/recette-cake-marbre";
    let first = extract_html(&latelierderoxane_page(), url).unwrap();
    let second = extract_html(&latelierderoxane_page(), url).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_blacklisted_host() {
    let err = extract_html("<html></html>", "https://www.pinterest.com/pin/123/").unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedHost(host) if host == "pinterest.com"));
}

#[test]
fn test_registry_lookup() {
    let registry = Registry::global();
    assert!(!registry.is_empty());
    assert!(registry.hosts().any(|host| host == "livelytable.com"));
    assert!(registry
        .lookup(&Url::parse("https://www.allrecipes.co.uk/recipe/1").unwrap())
        .is_ok());
    assert!(registry.site("WWW.LECKER.DE").is_some());
    assert!(registry.site("example.com").is_none());
}
