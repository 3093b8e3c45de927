//! Domain Value Objects

use serde_json::Value;
use std::fmt;

/// How the verification code is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Sms,
    Call,
}

impl Channel {
    /// Absent or blank means SMS; anything but `sms`/`call` is rejected.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("sms") => Some(Self::Sms),
            Some("call") => Some(Self::Call),
            Some(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status reported by the verification provider (`pending`, `approved`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationStatus(pub String);

impl VerificationStatus {
    pub fn is_approved(&self) -> bool {
        self.0 == "approved"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Numeric id from a JSON number or a digit-only string.
pub fn json_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id >= 0),
        Value::String(s) => kernel::validation::parse_numeric_id(s.trim()),
        _ => None,
    }
}

/// Subcategory ids to link to a new provider, in first-seen order.
///
/// `subcat` and `subsub` are single ids; `subsubs` is an array of ids or a
/// comma-separated string. Anything non-numeric is dropped.
pub fn subcategory_ids(subcat: &Value, subsub: &Value, subsubs: &Value) -> Vec<i64> {
    let mut ids = Vec::new();
    let mut push = |id: Option<i64>| {
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    };

    push(json_id(subcat));
    push(json_id(subsub));
    match subsubs {
        Value::Array(items) => items.iter().for_each(|v| push(json_id(v))),
        Value::String(s) => s
            .split(',')
            .for_each(|part| push(kernel::validation::parse_numeric_id(part.trim()))),
        _ => {}
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_parse() {
        assert_eq!(Channel::parse(None), Some(Channel::Sms));
        assert_eq!(Channel::parse(Some("")), Some(Channel::Sms));
        assert_eq!(Channel::parse(Some("SMS")), Some(Channel::Sms));
        assert_eq!(Channel::parse(Some(" call ")), Some(Channel::Call));
        assert_eq!(Channel::parse(Some("whatsapp")), None);
        assert_eq!(Channel::Call.to_string(), "call");
    }

    #[test]
    fn test_status() {
        assert!(VerificationStatus("approved".to_string()).is_approved());
        assert!(!VerificationStatus("pending".to_string()).is_approved());
        assert!(!VerificationStatus("Approved".to_string()).is_approved());
    }

    #[test]
    fn test_json_id() {
        assert_eq!(json_id(&json!(12)), Some(12));
        assert_eq!(json_id(&json!("12")), Some(12));
        assert_eq!(json_id(&json!(" 7 ")), Some(7));
        assert_eq!(json_id(&json!(-3)), None);
        assert_eq!(json_id(&json!(1.5)), None);
        assert_eq!(json_id(&json!("12a")), None);
        assert_eq!(json_id(&Value::Null), None);
    }

    #[test]
    fn test_subcategory_ids_from_all_sources() {
        let ids = subcategory_ids(&json!(4), &json!("17"), &json!([17, "18", "x", 19]));
        assert_eq!(ids, vec![4, 17, 18, 19]);

        let ids = subcategory_ids(&Value::Null, &Value::Null, &json!("5, 6,abc,5"));
        assert_eq!(ids, vec![5, 6]);

        assert!(subcategory_ids(&json!(""), &json!(null), &json!({})).is_empty());
    }
}
