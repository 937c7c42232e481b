use serde::Serialize;
use serde_json::{json, Value};

use crate::schema::ResponseShape;

pub const RESOLVED_SIZE_LIST: &str = "resolvedSizeList";

pub const TITLE_CHARS: (usize, usize) = (150, 200);
pub const BULLET_COUNT: usize = 5;
pub const BULLET_CHARS: (usize, usize) = (160, 199);
pub const BACKEND_KEYWORDS_MAX: usize = 199;
pub const DESCRIPTION_MAX: usize = 1500;

/// Non-fatal notice that a returned field misses its target length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    pub field: String,
    pub actual: usize,
    pub message: String,
}

impl ValidationWarning {
    fn new(field: impl Into<String>, actual: usize, message: impl Into<String>) -> Self {
        Self { field: field.into(), actual, message: message.into() }
    }
}

/// Parses a reply and checks it against `shape`. Errors carry a human-readable reason.
pub fn parse_reply(raw: &str, shape: &ResponseShape) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Err(format!("{}: empty reply", shape.name));
    }
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("{}: invalid JSON: {}", shape.name, e))?;
    shape.validate(&value)?;
    Ok(value)
}

/// Parses a listing reply and records the resolved size list on it.
pub fn normalize_listing(raw: &str, shape: &ResponseShape, sizes: &[String]) -> Result<Value, String> {
    let mut value = parse_reply(raw, shape)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert(RESOLVED_SIZE_LIST.to_string(), json!(sizes));
    }
    Ok(value)
}

fn chars(s: &str) -> usize { s.chars().count() }

/// Length checks for display. Values are never altered.
pub fn listing_warnings(result: &Value) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Some(title) = result.get("title").and_then(Value::as_str) {
        let n = chars(title);
        let (lo, hi) = TITLE_CHARS;
        if n < lo || n > hi {
            warnings.push(ValidationWarning::new("title", n, format!("title should be {lo}-{hi} characters")));
        }
    }

    if let Some(bullets) = result.get("bullets").and_then(Value::as_array) {
        if bullets.len() != BULLET_COUNT {
            warnings.push(ValidationWarning::new(
                "bullets",
                bullets.len(),
                format!("expected exactly {BULLET_COUNT} bullet points"),
            ));
        }
        let (lo, hi) = BULLET_CHARS;
        for (i, bullet) in bullets.iter().filter_map(Value::as_str).enumerate() {
            let n = chars(bullet);
            if n < lo || n > hi {
                warnings.push(ValidationWarning::new(
                    format!("bullets[{i}]"),
                    n,
                    format!("bullet should be {lo}-{hi} characters"),
                ));
            }
        }
    }

    if let Some(backend) = result.get("backendKeywords").and_then(Value::as_str) {
        let n = chars(backend);
        if n > BACKEND_KEYWORDS_MAX {
            warnings.push(ValidationWarning::new("backendKeywords", n, "backend keywords must stay under 200 characters"));
        }
    }

    if let Some(description) = result.get("description").and_then(Value::as_str) {
        let n = chars(description);
        if n > DESCRIPTION_MAX {
            warnings.push(ValidationWarning::new(
                "description",
                n,
                format!("description should be at most {DESCRIPTION_MAX} characters"),
            ));
        }
    }

    warnings
}
