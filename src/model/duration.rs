use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:\d+(?:\.\d+)?Y)?(?:\d+(?:\.\d+)?M)?(?:\d+(?:\.\d+)?W)?(?:\d+(?:\.\d+)?D)?(?:T(?:\d+(?:\.\d+)?H)?(?:\d+(?:\.\d+)?M)?(?:\d+(?:\.\d+)?S)?)?$",
    )
    .unwrap()
});

static HUMAN_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(h|hr|hrs|hour|hours|heure|heures|std|stunde|stunden|m|min|mins|minute|minutes|minuten)\b").unwrap()
});

/// Whether `s` is a well-formed ISO-8601 duration such as `PT1H30M` or
/// `P0Y0M0DT0H74M0S`.
pub fn is_iso_duration(s: &str) -> bool {
    // "P" and "PT" alone match the pattern but carry no component
    s.len() > 1 && !s.ends_with('T') && ISO_DURATION.is_match(s)
}

/// Coerce a decoded duration field.
///
/// Valid ISO-8601 strings are kept as written, bare minute counts become
/// `PT<n>M`, and everything else collapses to the empty string.
pub fn normalize_duration(value: &Value) -> String {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .map(minutes)
            .unwrap_or_default(),
        Value::String(s) => normalize_duration_str(s),
        Value::Array(items) => items.first().map(normalize_duration).unwrap_or_default(),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("@value"))
            .map(normalize_duration)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn normalize_duration_str(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Ok(count) = trimmed.parse::<u64>() {
        return minutes(count);
    }
    let upper = trimmed.to_ascii_uppercase();
    if is_iso_duration(&upper) {
        upper
    } else {
        String::new()
    }
}

/// Convert visible page text such as `"1 h 20 min"` or `"45 minutes"` to
/// an ISO-8601 duration. Returns the empty string when nothing matches.
pub fn parse_human_duration(text: &str) -> String {
    let iso = normalize_duration_str(text);
    if !iso.is_empty() {
        return iso;
    }

    let mut hours = 0u64;
    let mut mins = 0u64;
    let mut matched = false;

    for caps in HUMAN_PART.captures_iter(text) {
        let Ok(amount) = caps[1].parse::<u64>() else {
            continue;
        };
        matched = true;
        if caps[2].to_ascii_lowercase().starts_with('m') {
            mins += amount;
        } else {
            hours += amount;
        }
    }

    if !matched {
        return String::new();
    }

    hours += mins / 60;
    mins %= 60;
    match (hours, mins) {
        (0, m) => format!("PT{m}M"),
        (h, 0) => format!("PT{h}H"),
        (h, m) => format!("PT{h}H{m}M"),
    }
}

fn minutes(count: u64) -> String {
    format!("PT{count}M")
}
