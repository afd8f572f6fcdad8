use std::borrow::Cow;

use serde_json::Value;

use logpane_types::{LogMessage, MessageContent};

/// Object keys checked, in order, for the text of a structured payload
const MESSAGE_KEYS: [&str; 4] = ["message", "msg", "text", "body"];

/// Produces the canonical text of a log message for searching.
///
/// Implementations must be deterministic and free of side effects.
pub trait MessageNormalizer {
    fn normalize<'a>(&self, message: &'a LogMessage) -> Cow<'a, str>;
}

impl<N: MessageNormalizer + ?Sized> MessageNormalizer for &N {
    fn normalize<'a>(&self, message: &'a LogMessage) -> Cow<'a, str> {
        (**self).normalize(message)
    }
}

/// Normalizer for the payload shapes in [`MessageContent`]
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNormalizer;

impl MessageNormalizer for DefaultNormalizer {
    fn normalize<'a>(&self, message: &'a LogMessage) -> Cow<'a, str> {
        match &message.msg {
            MessageContent::Text(text) => Cow::Borrowed(text),
            MessageContent::Lines(lines) => Cow::Owned(lines.join("\n")),
            MessageContent::Structured(value) => normalize_value(value),
        }
    }
}

fn normalize_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Object(fields) => {
            for key in MESSAGE_KEYS {
                if let Some(Value::String(s)) = fields.get(key) {
                    return Cow::Borrowed(s);
                }
            }
            Cow::Owned(value.to_string())
        }
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(msg: MessageContent) -> LogMessage {
        LogMessage {
            msg,
            ..LogMessage::default()
        }
    }

    #[test]
    fn test_text_is_borrowed() {
        let msg = message(MessageContent::from("plain"));
        let normalized = DefaultNormalizer.normalize(&msg);
        assert!(matches!(normalized, Cow::Borrowed("plain")));
    }

    #[test]
    fn test_lines_are_joined() {
        let msg = message(MessageContent::Lines(vec![
            "first".to_string(),
            "second".to_string(),
        ]));
        assert_eq!(DefaultNormalizer.normalize(&msg), "first\nsecond");
    }

    #[test]
    fn test_structured_message_field() {
        let msg = message(MessageContent::Structured(
            json!({"level": "warn", "msg": "disk almost full"}),
        ));
        assert_eq!(DefaultNormalizer.normalize(&msg), "disk almost full");
    }

    #[test]
    fn test_structured_fallback_is_json() {
        let msg = message(MessageContent::Structured(json!({"code": 7})));
        assert_eq!(DefaultNormalizer.normalize(&msg), r#"{"code":7}"#);

        let msg = message(MessageContent::Structured(json!(42)));
        assert_eq!(DefaultNormalizer.normalize(&msg), "42");
    }
}
