use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx from the backend, decoded into structured entries. All
    /// entries for one call travel together so callers can inspect the
    /// full set.
    #[error("API error ({status}): {}", format_entries(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorEntry>,
    },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One structured entry from an error response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorEntry {
    pub http_code: u16,
    pub kind: String,
    /// Path into the offending request field; empty when the backend gave
    /// none.
    pub location: Vec<String>,
    pub message: String,
}

impl std::fmt::Display for ApiErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "Unknown: {}", self.message)
        } else {
            write!(f, "{}: {}", self.location.join("."), self.message)
        }
    }
}

fn format_entries(entries: &[ApiErrorEntry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A payload shape the mappers refuse to interpret. Decoding fails rather
/// than substituting a default that would corrupt downstream decisions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized order status code {0}")]
    UnknownOrderStatus(i64),
}

/// Translate a non-2xx response body into structured entries.
///
/// A JSON body with a `detail` array yields one entry per element; a
/// `detail` scalar yields a single entry; anything else (including a body
/// that is not JSON at all) yields a single "Unknown" entry carrying the
/// raw text.
pub(crate) fn decode_error_body(status: u16, body: &str) -> Vec<ApiErrorEntry> {
    let unknown = |message: String| ApiErrorEntry {
        http_code: status,
        kind: "Unknown".to_string(),
        location: Vec::new(),
        message,
    };

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return vec![unknown(body.to_string())];
    };

    match json.get("detail") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| entry_from_detail(status, entry))
            .collect(),
        Some(Value::String(message)) => vec![unknown(message.clone())],
        Some(other) => vec![unknown(other.to_string())],
        None => vec![unknown(body.to_string())],
    }
}

fn entry_from_detail(status: u16, detail: &Value) -> ApiErrorEntry {
    let kind = detail
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let location = detail
        .get("loc")
        .and_then(Value::as_array)
        .map(|segments| segments.iter().map(loc_segment).collect())
        .unwrap_or_default();
    let message = detail
        .get("msg")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());

    ApiErrorEntry {
        http_code: status,
        kind,
        location,
        message,
    }
}

fn loc_segment(segment: &Value) -> String {
    match segment {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_array_yields_one_entry_per_element() {
        let body = r#"{"detail":[{"type":"value_error","loc":["body","qty"],"msg":"must be positive"}]}"#;
        let entries = decode_error_body(400, body);
        assert_eq!(
            entries,
            vec![ApiErrorEntry {
                http_code: 400,
                kind: "value_error".to_string(),
                location: vec!["body".to_string(), "qty".to_string()],
                message: "must be positive".to_string(),
            }]
        );
    }

    #[test]
    fn non_json_body_becomes_a_single_unknown_entry() {
        let entries = decode_error_body(500, "internal error");
        assert_eq!(
            entries,
            vec![ApiErrorEntry {
                http_code: 500,
                kind: "Unknown".to_string(),
                location: Vec::new(),
                message: "internal error".to_string(),
            }]
        );
    }

    #[test]
    fn scalar_detail_becomes_a_single_unknown_entry() {
        let entries = decode_error_body(404, r#"{"detail":"order not found"}"#);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, "Unknown");
        assert_eq!(entries[0].message, "order not found");
    }

    #[test]
    fn every_detail_entry_is_kept() {
        let body = r#"{"detail":[
            {"type":"value_error","loc":["body","qty"],"msg":"must be positive"},
            {"loc":["body","plu"]},
            {"type":"missing"}
        ]}"#;
        let entries = decode_error_body(422, body);
        assert_eq!(entries.len(), 3);

        // Missing sub-fields fall back instead of dropping the entry
        assert_eq!(entries[1].kind, "Unknown");
        assert_eq!(entries[1].message, "422");
        assert_eq!(entries[2].location, Vec::<String>::new());
    }

    #[test]
    fn integer_loc_segments_are_stringified() {
        let body = r#"{"detail":[{"type":"value_error","loc":["items",0,"qty"],"msg":"bad"}]}"#;
        let entries = decode_error_body(400, body);
        assert_eq!(entries[0].location, vec!["items", "0", "qty"]);
    }

    #[test]
    fn entry_display_mirrors_location_and_message() {
        let entries = decode_error_body(500, "boom");
        assert_eq!(entries[0].to_string(), "Unknown: boom");

        let body = r#"{"detail":[{"type":"value_error","loc":["body","qty"],"msg":"must be positive"}]}"#;
        let entries = decode_error_body(400, body);
        assert_eq!(entries[0].to_string(), "body.qty: must be positive");
    }
}
