//! JSON key-path extraction from request bodies.
//!
//! # Responsibilities
//! - Parse configured colon-delimited key paths
//! - Walk a generic JSON value tree along each path
//! - Render resolved values as plain text for the scoring payload
//!
//! # Design Decisions
//! - Intermediate segments must land on objects; anything else ends that path
//! - Terminal values of any JSON kind are accepted
//! - Strings render unquoted; everything else renders as compact JSON

use serde_json::Value;

/// A compiled content path: the ordered key segments of one configured
/// expression, e.g. `"user:profile:email"` → `["user", "profile", "email"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Compile a configured path string by splitting on `:`.
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw.split(':').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Extract the values addressed by `paths` from a raw JSON body.
///
/// Output order follows the configured path order. Paths that do not resolve
/// contribute nothing, so the result may be shorter than `paths`. An empty
/// or unparseable body yields an empty result.
pub fn extract(paths: &[KeyPath], body: &[u8]) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }

    let data: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "Request body is not valid JSON, skipping content extraction");
            return Vec::new();
        }
    };

    paths
        .iter()
        .filter_map(|path| resolve(&data, path.segments()).map(render))
        .collect()
}

/// Walk `value` along `segments`. Every intermediate step must be an object
/// containing the segment key; the terminal value may be of any kind.
fn resolve<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    match segments.split_first() {
        None => Some(value),
        Some((key, rest)) => value.as_object()?.get(key).and_then(|v| resolve(v, rest)),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(raw: &[&str]) -> Vec<KeyPath> {
        raw.iter().map(|r| KeyPath::parse(r)).collect()
    }

    #[test]
    fn test_parse_splits_on_colon() {
        let path = KeyPath::parse("user:profile:email");
        assert_eq!(path.segments(), ["user", "profile", "email"]);

        let single = KeyPath::parse("user");
        assert_eq!(single.segments(), ["user"]);
    }

    #[test]
    fn test_nested_lookup() {
        let body = json!({"user": {"profile": {"email": "a@b.com"}}}).to_string();
        let out = extract(&paths(&["user:profile:email"]), body.as_bytes());
        assert_eq!(out, vec!["a@b.com"]);
    }

    #[test]
    fn test_missing_key_contributes_nothing() {
        let body = json!({"user": {}}).to_string();
        let out = extract(&paths(&["user:missing"]), body.as_bytes());
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_object_intermediate_ends_path() {
        let body = json!({"user": "not-an-object"}).to_string();
        let out = extract(&paths(&["user:profile"]), body.as_bytes());
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_body() {
        assert!(extract(&paths(&["user"]), b"").is_empty());
    }

    #[test]
    fn test_malformed_body() {
        assert!(extract(&paths(&["user"]), b"{not json").is_empty());
    }

    #[test]
    fn test_value_rendering() {
        let body = json!({
            "count": 42,
            "ratio": 0.5,
            "flag": true,
            "tags": ["a", "b"],
            "nested": {"k": 1}
        })
        .to_string();

        let out = extract(
            &paths(&["count", "ratio", "flag", "tags", "nested"]),
            body.as_bytes(),
        );
        assert_eq!(out, vec!["42", "0.5", "true", r#"["a","b"]"#, r#"{"k":1}"#]);
    }

    #[test]
    fn test_output_preserves_configured_order() {
        let body = json!({"b": "second", "a": "first"}).to_string();
        let out = extract(&paths(&["a", "missing", "b"]), body.as_bytes());
        assert_eq!(out, vec!["first", "second"]);
    }
}
