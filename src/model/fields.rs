//! Wrapper types for polymorphic schema.org properties.
//!
//! Each wrapper decodes from any of the shapes producers use for the
//! property and always serializes to one canonical shape.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::decode::{clean_text, has_type, integer_of, text_of, texts_of};

macro_rules! text_wrapper {
    ($(#[$meta:meta])* $name:ident, keys = [$($key:literal),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub value: String,
        }

        impl $name {
            const KEYS: &'static [&'static str] = &[$($key),+];

            pub fn new(value: impl Into<String>) -> Self {
                Self { value: value.into() }
            }

            pub fn from_value(value: &Value) -> Self {
                Self {
                    value: text_of(value, Self::KEYS)
                        .map(|text| clean_text(&text))
                        .unwrap_or_default(),
                }
            }

            pub fn is_empty(&self) -> bool {
                self.value.is_empty()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Ok(Self::from_value(&value))
            }
        }
    };
}

text_wrapper!(
    /// The `@type` discriminator.
    SchemaType,
    keys = ["value", "@value"]
);
text_wrapper!(
    /// Free text that may carry HTML fragments.
    Description,
    keys = ["value", "text", "description"]
);
text_wrapper!(Category, keys = ["value", "name", "text"]);
text_wrapper!(Cuisine, keys = ["value", "name", "text"]);
text_wrapper!(CookingMethod, keys = ["value", "name", "text"]);
text_wrapper!(
    /// One image URL, or after relocation a local reference.
    Image,
    keys = ["value", "url", "contentUrl", "@id"]
);
text_wrapper!(ThumbnailUrl, keys = ["value", "url", "contentUrl", "@id"]);

/// Comma-joined keywords. Unlike the single-value wrappers, every element of
/// an array is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    pub value: String,
}

impl Keywords {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let words: Vec<String> = texts_of(value, &["value", "name"])
            .iter()
            .map(|word| clean_text(word))
            .filter(|word| !word.is_empty())
            .collect();
        Self {
            value: words.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Serialize for Keywords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Keywords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Number of servings; zero when the producer gave nothing usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Yield {
    pub value: u16,
}

impl Yield {
    pub fn new(value: u16) -> Self {
        Self { value }
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            value: integer_of(value).unwrap_or_default(),
        }
    }
}

impl Serialize for Yield {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.value)
    }
}

impl<'de> Deserialize<'de> for Yield {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Ordered ingredient lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingredients {
    pub values: Vec<String>,
}

impl Ingredients {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn from_value(value: &Value) -> Self {
        let mut values = Vec::new();
        collect_ingredients(value, &mut values);
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Re-read each line the way the decoder would.
    pub fn clean(&mut self) {
        self.values = self.values.iter().flat_map(|line| clean_lines(line)).collect();
    }
}

/// Entity-decoded, non-empty lines of `text`.
fn clean_lines(text: &str) -> Vec<String> {
    clean_text(text)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_ingredients(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.extend(clean_lines(s)),
        Value::Array(items) => {
            for item in items {
                collect_ingredients(item, out);
            }
        }
        Value::Object(map) => {
            let name = text_of(value, &["name", "text", "value"]).map(|n| clean_text(&n));
            let amount = map
                .get("amount")
                .and_then(|a| text_of(a, &["value"]))
                .map(|a| clean_text(&a))
                .filter(|a| !a.is_empty());
            match (amount, name) {
                (Some(amount), Some(name)) if !name.is_empty() => {
                    out.push(format!("{amount} {name}"))
                }
                (None, Some(name)) if !name.is_empty() => out.push(name),
                _ => {
                    if let Some(children) = map.get("itemListElement") {
                        collect_ingredients(children, out);
                    }
                }
            }
        }
        Value::Number(n) => out.push(n.to_string()),
        _ => {}
    }
}

impl Serialize for Ingredients {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ingredients {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// One instruction item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub enum HowToItem {
    HowToStep { text: String },
    /// A named group heading; the steps it groups follow it.
    HowToSection { name: String },
}

impl HowToItem {
    pub fn step(text: impl Into<String>) -> Self {
        HowToItem::HowToStep { text: text.into() }
    }

    pub fn section(name: impl Into<String>) -> Self {
        HowToItem::HowToSection { name: name.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            HowToItem::HowToStep { text } => text,
            HowToItem::HowToSection { name } => name,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, HowToItem::HowToSection { .. })
    }
}

/// Ordered instruction items, sections flattened in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instructions {
    pub values: Vec<HowToItem>,
}

impl Instructions {
    pub fn new(values: Vec<HowToItem>) -> Self {
        Self { values }
    }

    pub fn from_value(value: &Value) -> Self {
        let mut values = Vec::new();
        match value {
            // A bare string is one step per line
            Value::String(s) => values.extend(clean_lines(s).into_iter().map(HowToItem::step)),
            other => collect_steps(other, &mut values),
        }
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clean(&mut self) {
        for item in &mut self.values {
            match item {
                HowToItem::HowToStep { text } => *text = clean_text(text),
                HowToItem::HowToSection { name } => *name = clean_text(name),
            }
        }
        self.values.retain(|item| !item.text().is_empty());
    }

    /// Number of `HowToStep` items, ignoring section headings.
    pub fn step_count(&self) -> usize {
        self.values.iter().filter(|item| !item.is_section()).count()
    }
}

fn collect_steps(value: &Value, out: &mut Vec<HowToItem>) {
    match value {
        Value::String(s) => {
            let text = clean_text(s);
            if !text.is_empty() {
                out.push(HowToItem::step(text));
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_steps(item, out);
            }
        }
        Value::Object(map) => {
            let children = map.get("itemListElement");
            let is_step = has_type(value, "HowToStep");

            if has_type(value, "HowToSection") || (children.is_some() && !is_step) {
                if let Some(name) = text_of(value, &["name", "text"]).map(|n| clean_text(&n)) {
                    if !name.is_empty() && has_type(value, "HowToSection") {
                        out.push(HowToItem::section(name));
                    }
                }
                if let Some(children) = children {
                    collect_steps(children, out);
                }
                return;
            }

            match text_of(value, &["text", "name", "description"]).map(|t| clean_text(&t)) {
                Some(text) if !text.is_empty() => out.push(HowToItem::step(text)),
                _ => {
                    if let Some(children) = children {
                        collect_steps(children, out);
                    }
                }
            }
        }
        _ => {}
    }
}

impl Serialize for Instructions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Instructions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// A tool with the quantity the recipe calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename = "HowToTool")]
pub struct HowToTool {
    #[serde(rename = "name")]
    pub text: String,
    #[serde(rename = "requiredQuantity")]
    pub quantity: u16,
}

impl HowToTool {
    pub fn new(text: impl Into<String>, quantity: u16) -> Self {
        Self {
            text: text.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tools {
    pub values: Vec<HowToTool>,
}

impl Tools {
    pub fn from_value(value: &Value) -> Self {
        let mut values = Vec::new();
        collect_tools(value, &mut values);
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clean(&mut self) {
        for tool in &mut self.values {
            tool.text = clean_text(&tool.text);
        }
        self.values.retain(|tool| !tool.text.is_empty());
    }
}

fn collect_tools(value: &Value, out: &mut Vec<HowToTool>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_tools(item, out);
            }
        }
        Value::Object(map) => {
            let Some(text) = text_of(value, &["name", "text", "value"]).map(|t| clean_text(&t))
            else {
                return;
            };
            let quantity = map
                .get("requiredQuantity")
                .and_then(integer_of)
                .unwrap_or(1);
            if !text.is_empty() {
                out.push(HowToTool::new(text, quantity));
            }
        }
        Value::String(s) => {
            let text = clean_text(s);
            if !text.is_empty() {
                out.push(HowToTool::new(text, 1));
            }
        }
        _ => {}
    }
}

impl Serialize for Tools {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tools {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Nutrition facts, stored verbatim (`"260 kcal"` stays `"260 kcal"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionSchema {
    pub calories: String,
    pub carbohydrates: String,
    pub fat: String,
    pub protein: String,
    pub fiber: String,
    pub sodium: String,
    pub sugar: String,
    pub saturated_fat: String,
    pub unsaturated_fat: String,
    pub trans_fat: String,
    pub cholesterol: String,
    pub servings: String,
}

impl NutritionSchema {
    fn fields(&self) -> [(&'static str, &String); 12] {
        [
            ("calories", &self.calories),
            ("carbohydrateContent", &self.carbohydrates),
            ("fatContent", &self.fat),
            ("proteinContent", &self.protein),
            ("fiberContent", &self.fiber),
            ("sodiumContent", &self.sodium),
            ("sugarContent", &self.sugar),
            ("saturatedFatContent", &self.saturated_fat),
            ("unsaturatedFatContent", &self.unsaturated_fat),
            ("transFatContent", &self.trans_fat),
            ("cholesterolContent", &self.cholesterol),
            ("servingSize", &self.servings),
        ]
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut String); 12] {
        [
            ("calories", &mut self.calories),
            ("carbohydrateContent", &mut self.carbohydrates),
            ("fatContent", &mut self.fat),
            ("proteinContent", &mut self.protein),
            ("fiberContent", &mut self.fiber),
            ("sodiumContent", &mut self.sodium),
            ("sugarContent", &mut self.sugar),
            ("saturatedFatContent", &mut self.saturated_fat),
            ("unsaturatedFatContent", &mut self.unsaturated_fat),
            ("transFatContent", &mut self.trans_fat),
            ("cholesterolContent", &mut self.cholesterol),
            ("servingSize", &mut self.servings),
        ]
    }

    pub fn from_value(value: &Value) -> Self {
        let mut nutrition = Self::default();
        let node = match value {
            Value::Array(items) => items.iter().find(|item| item.is_object()),
            Value::Object(_) => Some(value),
            _ => None,
        };
        if let Some(Value::Object(map)) = node {
            for (key, slot) in nutrition.fields_mut() {
                if let Some(text) = map.get(key).and_then(|v| text_of(v, &["value"])) {
                    *slot = text;
                }
            }
        }
        nutrition
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_empty())
    }
}

impl Serialize for NutritionSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self
            .fields()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        if present.is_empty() {
            return serializer.serialize_map(Some(0))?.end();
        }
        let mut map = serializer.serialize_map(Some(present.len() + 1))?;
        map.serialize_entry("@type", "NutritionInformation")?;
        for (key, value) in present {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutritionSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "@type", rename = "VideoObject", rename_all = "camelCase")]
pub struct VideoObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl VideoObject {
    fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| {
            map.get(key)
                .and_then(|v| text_of(v, &["value", "url"]))
                .map(|t| clean_text(&t))
        };
        Self {
            name: field("name"),
            description: field("description"),
            thumbnail_url: field("thumbnailUrl"),
            content_url: field("contentUrl"),
            embed_url: field("embedUrl"),
            upload_date: field("uploadDate"),
            duration: field("duration"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Videos {
    pub values: Vec<VideoObject>,
}

impl Videos {
    pub fn from_value(value: &Value) -> Self {
        let values = match value {
            Value::Object(map) => vec![VideoObject::from_map(map)],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(VideoObject::from_map(map)),
                    Value::String(url) if !url.trim().is_empty() => Some(VideoObject {
                        content_url: Some(url.trim().to_string()),
                        ..Default::default()
                    }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Videos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Videos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
