use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload returned by the backend.
///
/// `detail` is a plain string for handled errors (`"Invalid credentials"`)
/// and a list of `{loc, msg, type}` objects for request validation failures.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ErrorBody {
    /// The raw `detail` value.
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Parses a raw response body, yielding `None` when it is not a JSON error.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Human-readable message extracted from `detail`, if any.
    ///
    /// Validation lists are flattened by joining each entry's `msg`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("unknown error"),
        }
    }
}
