use crate::document::Document;
use crate::error::ExtractError;
use crate::model::{has_type, RecipeSchema};
use log::debug;
use serde_json::Value;

const LD_JSON_SCRIPTS: &str = "script[type^='application/ld+json']";

/// Recipe from a standalone JSON-LD block (`@type: Recipe` at the top level,
/// in a top-level array, or as a page's `mainEntity`).
pub fn parse_ld_json(document: &Document) -> Result<RecipeSchema, ExtractError> {
    find_recipe(document, "parse_ld_json", standalone_recipe)
}

/// Recipe from a JSON-LD block whose top-level object holds an `@graph`.
pub fn parse_graph(document: &Document) -> Result<RecipeSchema, ExtractError> {
    find_recipe(document, "parse_graph", graph_recipe)
}

fn find_recipe(
    document: &Document,
    label: &str,
    locate: fn(&Value) -> Option<&Value>,
) -> Result<RecipeSchema, ExtractError> {
    let scripts = document.select_all(LD_JSON_SCRIPTS);
    debug!("{}: Found {} JSON-LD script tags", label, scripts.len());

    let mut malformed = None;

    // Try each script element until we find a valid recipe
    for (index, script) in scripts.iter().enumerate() {
        let raw_json: String = script.text().collect();
        let Some(json_ld) = parse_json(&raw_json) else {
            debug!("{}: Script {} is not valid JSON", label, index);
            continue;
        };

        let Some(node) = locate(&json_ld) else {
            debug!("{}: No recipe node in script {}", label, index);
            continue;
        };

        match RecipeSchema::from_json(node).and_then(|recipe| {
            recipe.validate()?;
            Ok(recipe)
        }) {
            Ok(recipe) => {
                debug!("{}: Found recipe {:?} in script {}", label, recipe.name, index);
                return Ok(recipe);
            }
            Err(e) => {
                debug!("{}: Recipe node in script {} rejected: {}", label, index, e);
                malformed = Some(e);
            }
        }
    }

    Err(malformed.unwrap_or(ExtractError::NoRecipeFound))
}

fn is_recipe(value: &Value) -> bool {
    has_type(value, "Recipe")
}

fn standalone_recipe(json_ld: &Value) -> Option<&Value> {
    match json_ld {
        Value::Array(items) => items.iter().find_map(node_recipe),
        Value::Object(_) => node_recipe(json_ld),
        _ => None,
    }
}

fn node_recipe(node: &Value) -> Option<&Value> {
    if is_recipe(node) {
        return Some(node);
    }
    match node.get("mainEntity") {
        Some(entity) if is_recipe(entity) => Some(entity),
        Some(Value::Array(entities)) => entities.iter().find(|e| is_recipe(e)),
        _ => None,
    }
}

fn graph_recipe(json_ld: &Value) -> Option<&Value> {
    match json_ld {
        Value::Array(items) => items.iter().find_map(graph_recipe),
        Value::Object(_) => json_ld
            .get("@graph")?
            .as_array()?
            .iter()
            .find_map(node_recipe),
        _ => None,
    }
}

/// Parse a script body, repairing common producer mistakes on failure.
fn parse_json(raw: &str) -> Option<Value> {
    let trimmed = strip_wrappers(raw);
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("JSON-LD strict parse failed ({}), sanitizing", e);
            serde_json::from_str(&sanitize_json(&strip_comments(trimmed))).ok()
        }
    }
}

fn strip_wrappers(raw: &str) -> &str {
    let mut s = raw.trim();
    for (open, close) in [("<!--", "-->"), ("<![CDATA[", "]]>"), ("/*<![CDATA[*/", "/*]]>*/")] {
        if let Some(inner) = s.strip_prefix(open) {
            s = inner.strip_suffix(close).unwrap_or(inner).trim();
        }
    }
    s
}

/// Drop `/* ... */` and `// ...` comments that sit outside string literals.
fn strip_comments(json_str: &str) -> String {
    let mut out = String::with_capacity(json_str.len());
    let mut chars = json_str.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '"' && !escaped {
                in_string = false;
            }
            escaped = c == '\\' && !escaped;
            continue;
        }
        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                escaped = false;
                out.push(c);
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = None;
                for c in chars.by_ref() {
                    if prev == Some('*') && c == '/' {
                        break;
                    }
                    prev = Some(c);
                }
                out.push(' ');
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn sanitize_json(json_str: &str) -> String {
    let mut minified = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut prev_char = None;
    let mut depth = 0i32;
    let chars: Vec<char> = json_str.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            // Raw control characters are invalid inside JSON strings
            match c {
                '\n' | '\r' | '\t' => minified.push(' '),
                '"' if !escaped => {
                    in_string = false;
                    minified.push(c);
                    // We're ending a string - check if we need a comma
                    let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                    if matches!(next_char, Some('"' | '[' | '{')) && depth > 0 {
                        let closes_key = matches!(prev_non_ws_before_string(&minified), Some(':'));
                        if closes_key || !is_key_position(&minified) {
                            debug!("Adding missing comma after string");
                            minified.push(',');
                            prev_char = Some(',');
                            continue;
                        }
                    }
                }
                _ => minified.push(c),
            }
            escaped = c == '\\' && !escaped;
            prev_char = Some(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                escaped = false;
                minified.push(c);
            }
            '[' | '{' => {
                depth += 1;
                minified.push(c);
            }
            ']' | '}' => {
                depth -= 1;
                if minified.ends_with(',') {
                    minified.pop();
                }
                minified.push(c);
                // Check if we need a comma after array/object closing
                let next_char = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if depth > 0 && matches!(next_char, Some('"' | '{' | '[')) {
                    debug!("Adding missing comma after array/object closing");
                    minified.push(',');
                    prev_char = Some(',');
                    continue;
                }
            }
            ',' => {
                // Avoid duplicate commas
                if prev_char != Some(',') {
                    minified.push(c);
                }
            }
            ':' => {
                // Handle malformed key-value pairs
                if minified.ends_with(',') {
                    minified.pop();
                }
                minified.push(c);
            }
            _ if c.is_whitespace() => continue,
            _ => minified.push(c),
        }
        prev_char = Some(c);
    }

    minified
}

/// The last non-whitespace character before the string that just closed.
fn prev_non_ws_before_string(minified: &str) -> Option<char> {
    let body = minified.strip_suffix('"')?;
    let open = body.rfind('"')?;
    body[..open].chars().next_back()
}

/// Whether the string that just closed sits where an object key belongs.
fn is_key_position(minified: &str) -> bool {
    matches!(prev_non_ws_before_string(minified), Some('{') | Some(','))
        && innermost_open(minified) == Some('{')
}

fn innermost_open(minified: &str) -> Option<char> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in minified.chars() {
        if in_string {
            if c == '"' && !escaped {
                in_string = false;
            }
            escaped = c == '\\' && !escaped;
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }
    stack.last().copied()
}
