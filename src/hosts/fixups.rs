//! Declarative per-site corrections applied after the base strategy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::element_text;
use crate::extractors::ParsingContext;
use crate::model::duration::parse_human_duration;
use crate::model::{
    leading_integer, Category, CookingMethod, Cuisine, Description, HowToItem, Image, Ingredients,
    Instructions, Keywords, RecipeSchema, DEFAULT_CATEGORY,
};

static ANCHOR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a\b[^>]*>|</a\s*>").unwrap());

/// A recipe field a fix-up reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Image,
    Category,
    Cuisine,
    CookingMethod,
    Keywords,
    Yield,
    PrepTime,
    CookTime,
    TotalTime,
    Ingredients,
    Instructions,
}

impl Field {
    fn is_list(self) -> bool {
        matches!(self, Field::Ingredients | Field::Instructions)
    }
}

/// Where an overlay reads its value from.
#[derive(Debug, Clone, Copy)]
pub enum Source {
    Text,
    Attr(&'static str),
    Html,
}

#[derive(Debug, Clone, Copy)]
pub enum Fixup {
    /// Overwrite `field` with the value found at `selector`. Nothing happens
    /// when the selector matches nothing.
    Overlay {
        selector: &'static str,
        source: Source,
        field: Field,
    },
    /// Remove `<a ...>` and `</a>` tags left in the field by the producer.
    StripAnchors(Field),
    /// Keep only the last whitespace-separated token.
    LastToken(Field),
    /// Keep only the first comma-separated item.
    FirstItem(Field),
    /// Fill the field when the producer left it empty.
    Default(Field, &'static str),
}

impl Fixup {
    pub const fn text(selector: &'static str, field: Field) -> Self {
        Fixup::Overlay {
            selector,
            source: Source::Text,
            field,
        }
    }

    pub const fn attr(selector: &'static str, attr: &'static str, field: Field) -> Self {
        Fixup::Overlay {
            selector,
            source: Source::Attr(attr),
            field,
        }
    }

    /// Overlay keeping the inner markup, for fields allowed to carry HTML.
    pub const fn html(selector: &'static str, field: Field) -> Self {
        Fixup::Overlay {
            selector,
            source: Source::Html,
            field,
        }
    }

    pub fn selector(&self) -> Option<&'static str> {
        match self {
            Fixup::Overlay { selector, .. } => Some(selector),
            _ => None,
        }
    }

    pub fn apply(&self, recipe: &mut RecipeSchema, context: &ParsingContext) {
        match *self {
            Fixup::Overlay {
                selector,
                source,
                field,
            } => overlay(recipe, context, selector, source, field),
            Fixup::StripAnchors(field) => map_text(recipe, field, strip_anchors),
            Fixup::LastToken(field) => map_text(recipe, field, |s| {
                s.split_whitespace().last().unwrap_or_default().to_string()
            }),
            Fixup::FirstItem(field) => map_text(recipe, field, |s| {
                s.split(',').next().unwrap_or_default().trim().to_string()
            }),
            Fixup::Default(field, value) => {
                if is_unset(recipe, field) {
                    set_value(recipe, context, field, value.to_string());
                }
            }
        }
    }
}

pub fn strip_anchors(s: &str) -> String {
    ANCHOR_TAG.replace_all(s, "").trim().to_string()
}

fn overlay(
    recipe: &mut RecipeSchema,
    context: &ParsingContext,
    selector: &str,
    source: Source,
    field: Field,
) {
    let document = &context.document;
    let read = |el: &scraper::ElementRef| -> Option<String> {
        let value = match source {
            Source::Text => element_text(el),
            Source::Attr(name) => el.value().attr(name).unwrap_or_default().trim().to_string(),
            Source::Html => el.inner_html().trim().to_string(),
        };
        Some(value).filter(|v| !v.is_empty())
    };

    if field.is_list() {
        let values: Vec<String> = document
            .select_all(selector)
            .iter()
            .filter_map(read)
            .collect();
        if !values.is_empty() {
            set_list(recipe, field, values);
        }
    } else if let Some(value) = document.select_first(selector).as_ref().and_then(read) {
        set_value(recipe, context, field, value);
    }
}

fn set_list(recipe: &mut RecipeSchema, field: Field, values: Vec<String>) {
    match field {
        Field::Ingredients => recipe.ingredients = Ingredients::new(values),
        Field::Instructions => {
            recipe.instructions = Instructions::new(values.into_iter().map(HowToItem::step).collect())
        }
        _ => {}
    }
}

fn set_value(recipe: &mut RecipeSchema, context: &ParsingContext, field: Field, value: String) {
    match field {
        Field::Name => recipe.name = value,
        Field::Description => recipe.description = Description::new(value),
        Field::Image => {
            // Page-relative image paths are resolved against the page URL
            let absolute = context
                .url
                .join(&value)
                .map(|url| url.to_string())
                .unwrap_or(value);
            recipe.image = Image::new(absolute);
        }
        Field::Category => recipe.category = Category::new(value),
        Field::Cuisine => recipe.cuisine = Cuisine::new(value),
        Field::CookingMethod => recipe.cooking_method = CookingMethod::new(value),
        Field::Keywords => recipe.keywords = Keywords::new(value),
        Field::Yield => {
            if let Some(count) = leading_integer(&value) {
                recipe.recipe_yield.value = count;
            }
        }
        Field::PrepTime => recipe.prep_time = parse_human_duration(&value),
        Field::CookTime => recipe.cook_time = parse_human_duration(&value),
        Field::TotalTime => recipe.total_time = parse_human_duration(&value),
        Field::Ingredients | Field::Instructions => set_list(recipe, field, vec![value]),
    }
}

fn text_mut(recipe: &mut RecipeSchema, field: Field) -> Option<&mut String> {
    match field {
        Field::Name => Some(&mut recipe.name),
        Field::Description => Some(&mut recipe.description.value),
        Field::Image => Some(&mut recipe.image.value),
        Field::Category => Some(&mut recipe.category.value),
        Field::Cuisine => Some(&mut recipe.cuisine.value),
        Field::CookingMethod => Some(&mut recipe.cooking_method.value),
        Field::Keywords => Some(&mut recipe.keywords.value),
        Field::PrepTime => Some(&mut recipe.prep_time),
        Field::CookTime => Some(&mut recipe.cook_time),
        Field::TotalTime => Some(&mut recipe.total_time),
        Field::Yield | Field::Ingredients | Field::Instructions => None,
    }
}

fn map_text(recipe: &mut RecipeSchema, field: Field, f: impl Fn(&str) -> String) {
    match field {
        Field::Ingredients => {
            for line in &mut recipe.ingredients.values {
                *line = f(line);
            }
            recipe.ingredients.values.retain(|line| !line.is_empty());
        }
        Field::Instructions => {
            for item in &mut recipe.instructions.values {
                match item {
                    HowToItem::HowToStep { text } => *text = f(text),
                    HowToItem::HowToSection { name } => *name = f(name),
                }
            }
            recipe.instructions.values.retain(|item| !item.text().is_empty());
        }
        _ => {
            if let Some(text) = text_mut(recipe, field) {
                *text = f(text);
            }
        }
    }
}

fn is_unset(recipe: &mut RecipeSchema, field: Field) -> bool {
    match field {
        Field::Yield => recipe.recipe_yield.value == 0,
        Field::Ingredients => recipe.ingredients.is_empty(),
        Field::Instructions => recipe.instructions.is_empty(),
        Field::Category => {
            recipe.category.is_empty() || recipe.category.value == DEFAULT_CATEGORY
        }
        _ => text_mut(recipe, field).is_some_and(|text| text.is_empty()),
    }
}
