use crate::document::{element_text, selector, Document};
use crate::error::ExtractError;
use crate::model::RecipeSchema;
use log::debug;
use scraper::ElementRef;
use serde_json::{Map, Value};

/// Properties whose value is a list when the element wraps `<li>` items.
const LIST_PROPERTIES: [&str; 4] = ["recipeIngredient", "ingredients", "recipeInstructions", "tool"];

/// Recipe from microdata (`itemscope itemtype=".../Recipe"`).
///
/// The item is converted to the equivalent JSON-LD object and fed through
/// the same tolerant decoder as the JSON-LD helpers.
pub fn parse_website(document: &Document) -> Result<RecipeSchema, ExtractError> {
    debug!("parse_website: Attempting to extract recipe from microdata");

    let container = find_recipe_container(document).ok_or(ExtractError::NoRecipeFound)?;
    let node = item_to_json(container);
    debug!("parse_website: Microdata item {}", node);

    let recipe = RecipeSchema::from_json(&node)?;
    recipe.validate()?;
    Ok(recipe)
}

fn find_recipe_container(document: &Document) -> Option<ElementRef<'_>> {
    document
        .select_all("[itemscope][itemtype]")
        .into_iter()
        .find(|element| {
            element
                .value()
                .attr("itemtype")
                .is_some_and(is_recipe_itemtype)
        })
}

fn is_recipe_itemtype(itemtype: &str) -> bool {
    itemtype.split_whitespace().any(|t| {
        let t = t.trim_end_matches('/').to_ascii_lowercase();
        t.ends_with("schema.org/recipe") || t.ends_with("data-vocabulary.org/recipe")
    })
}

/// The nearest ancestor item of `element`, excluding `element` itself.
fn owning_item<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
}

fn item_to_json(item: ElementRef) -> Value {
    let mut map = Map::new();
    if let Some(item_type) = item
        .value()
        .attr("itemtype")
        .and_then(|t| t.split_whitespace().next())
        .and_then(|t| t.trim_end_matches('/').rsplit('/').next())
    {
        map.insert("@type".to_string(), Value::String(item_type.to_string()));
    }

    let Some(props) = selector("[itemprop]") else {
        return Value::Object(map);
    };

    for element in item.select(&props) {
        let owned = owning_item(&element).is_some_and(|owner| owner.id() == item.id());
        if !owned {
            continue;
        }
        let Some(names) = element.value().attr("itemprop") else {
            continue;
        };
        for name in names.split_whitespace() {
            let value = property_value(&element, name);
            if value.is_null() {
                continue;
            }
            insert_property(&mut map, name, value);
        }
    }

    Value::Object(map)
}

fn insert_property(map: &mut Map<String, Value>, name: &str, value: Value) {
    let Some(existing) = map.get_mut(name) else {
        map.insert(name.to_string(), value);
        return;
    };
    // Repeated properties accumulate into an array
    let mut items = match existing.take() {
        Value::Array(items) => items,
        other => vec![other],
    };
    match value {
        Value::Array(more) => items.extend(more),
        other => items.push(other),
    }
    *existing = Value::Array(items);
}

/// Value of one property element, following the microdata rules for which
/// attribute carries the value.
fn property_value(element: &ElementRef, name: &str) -> Value {
    if element.value().attr("itemscope").is_some() {
        return item_to_json(*element);
    }

    let attr = |key: &str| element.value().attr(key).map(str::trim).filter(|v| !v.is_empty());
    let from_attr = match element.value().name() {
        "meta" => attr("content"),
        "img" | "audio" | "video" | "source" | "embed" | "iframe" | "track" => attr("src"),
        "a" | "area" | "link" => attr("href"),
        "object" => attr("data"),
        "time" => attr("datetime"),
        "data" | "meter" => attr("value"),
        _ => attr("content"),
    };
    if let Some(value) = from_attr {
        return Value::String(value.to_string());
    }

    if LIST_PROPERTIES.contains(&name) {
        if let Some(items) = selector("li") {
            let texts: Vec<Value> = element
                .select(&items)
                .map(|li| element_text(&li))
                .filter(|text| !text.is_empty())
                .map(Value::String)
                .collect();
            if !texts.is_empty() {
                return Value::Array(texts);
            }
        }
    }

    let text = element_text(element);
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text)
    }
}
