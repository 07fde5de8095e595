//! Response normalization for upstream model listings.
//!
//! The upstreams disagree on response shape. Extraction is an ordered list of
//! pure shape-matchers tried in priority order; the first matcher that
//! recognizes the payload wins. Supporting a new upstream shape means adding
//! one matcher, not editing a conditional chain.

use serde_json::Value;

type ShapeMatcher = fn(&Value) -> Option<Vec<String>>;

/// Known listing shapes, highest priority first.
const SHAPES: &[ShapeMatcher] = &[
    worker_result_shape,
    bare_array_shape,
    data_array_shape,
    models_array_shape,
];

/// Extract raw model ids from an arbitrary listing payload.
///
/// Unknown shapes degrade to an empty list; items without a usable id are
/// dropped, never an error.
pub fn extract_model_ids(value: &Value) -> Vec<String> {
    SHAPES
        .iter()
        .find_map(|matcher| matcher(value))
        .unwrap_or_default()
}

/// `{ "success": true, "result": [ { "name": … }, … ] }`
fn worker_result_shape(value: &Value) -> Option<Vec<String>> {
    if value.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    let result = value.get("result")?.as_array()?;
    Some(collect_ids(result, |item| {
        item.get("name").and_then(Value::as_str)
    }))
}

/// `[ { "id": … | "name": … }, … ]` or `[ "id", … ]`
fn bare_array_shape(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(collect_ids(items, |item| {
        item.get("id")
            .and_then(Value::as_str)
            .or_else(|| item.get("name").and_then(Value::as_str))
            .or_else(|| item.as_str())
    }))
}

/// `{ "data": [ { "id": … }, … ] }`
fn data_array_shape(value: &Value) -> Option<Vec<String>> {
    let items = value.get("data")?.as_array()?;
    Some(collect_ids(items, |item| {
        item.get("id").and_then(Value::as_str)
    }))
}

/// `{ "models": [ { "name": … }, … ] }`
fn models_array_shape(value: &Value) -> Option<Vec<String>> {
    let items = value.get("models")?.as_array()?;
    Some(collect_ids(items, |item| {
        item.get("name").and_then(Value::as_str)
    }))
}

fn collect_ids<'a>(
    items: &'a [Value],
    extract: impl Fn(&'a Value) -> Option<&'a str>,
) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| extract(item))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
