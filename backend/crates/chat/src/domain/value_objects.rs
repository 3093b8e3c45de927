//! Domain Value Objects

use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// Conversation identifier, opaque to this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatId(String);

impl ChatId {
    /// Accepts a string or a number; blank means absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Newest-first window of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagePage {
    /// Rows to skip
    pub from: usize,
    pub limit: usize,
}

impl Default for MessagePage {
    fn default() -> Self {
        Self {
            from: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MessagePage {
    /// Lenient: unparsable values fall back to defaults, negative `from`
    /// becomes 0 and `limit` is clamped to `1..=100`.
    pub fn from_params(from: Option<&str>, limit: Option<&str>) -> Self {
        let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self {
            from: number(from).unwrap_or(0).max(0) as usize,
            limit: number(limit)
                .unwrap_or(DEFAULT_PAGE_SIZE as i64)
                .clamp(1, MAX_PAGE_SIZE as i64) as usize,
        }
    }

    /// Inclusive last row index
    pub fn to(&self) -> usize {
        self.from + self.limit - 1
    }
}

/// `"Echo: "` followed by at most `max_chars` characters of the message.
pub fn echo_reply(message: &str, max_chars: usize) -> String {
    let head: String = message.chars().take(max_chars).collect();
    format!("Echo: {head}")
}

/// Loose JSON truthiness: `null`, `false`, `0` and `""` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_id() {
        assert_eq!(ChatId::from_json(&json!(12)).unwrap().as_str(), "12");
        assert_eq!(ChatId::from_json(&json!(" abc ")).unwrap().as_str(), "abc");
        assert!(ChatId::from_json(&json!("  ")).is_none());
        assert!(ChatId::from_json(&Value::Null).is_none());
        assert!(ChatId::from_json(&json!(["x"])).is_none());
    }

    #[test]
    fn test_message_page() {
        assert_eq!(MessagePage::from_params(None, None), MessagePage::default());

        let page = MessagePage::from_params(Some("-5"), Some("500"));
        assert_eq!(page, MessagePage { from: 0, limit: 100 });

        let page = MessagePage::from_params(Some("20"), Some("0"));
        assert_eq!(page, MessagePage { from: 20, limit: 1 });
        assert_eq!(page.to(), 20);

        let page = MessagePage::from_params(Some("x"), Some("10"));
        assert_eq!(page.to(), 9);
    }

    #[test]
    fn test_echo_reply_truncates_by_chars() {
        assert_eq!(echo_reply("salut", 500), "Echo: salut");
        let long = "ă".repeat(600);
        let reply = echo_reply(&long, 500);
        assert_eq!(reply.chars().count(), 6 + 500);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }
}
