//! Chat message checks for relayed requests
//!
//! Messages are forwarded exactly as the caller sent them, so they stay
//! untyped JSON values; only their shape is checked here.

use serde_json::Value;

/// Whether a value is an object with non-empty string `role` and `content`
pub fn is_valid_message(message: &Value) -> bool {
    let non_empty = |field: &str| {
        message
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };

    message.is_object() && non_empty("role") && non_empty("content")
}

/// Drop malformed entries, keeping the valid ones untouched and in order
pub fn prune_messages(messages: &[Value]) -> Vec<Value> {
    messages
        .iter()
        .filter(|m| is_valid_message(m))
        .cloned()
        .collect()
}
