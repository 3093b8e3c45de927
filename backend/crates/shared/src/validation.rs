//! Input Validation Value Objects
//!
//! Pure parsers shared by every handler that accepts user input. Each
//! constructor trims its input and fails with a 400 [`AppError`] carrying a
//! message fit for display.

use crate::error::app_error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Longest email accepted by the offer form.
pub const EMAIL_MAX_LENGTH: usize = 320;

/// Longest phone input looked at before normalization.
pub const PHONE_MAX_LENGTH: usize = 32;

// ============================================================================
// Phone number
// ============================================================================

/// E.164 phone number, always stored with a leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize then validate.
    ///
    /// Normalization removes spaces and dashes, turns an international `00`
    /// prefix into `+`, turns a national Romanian number (`07xx xxx xxx`)
    /// into `+407xxxxxxxx`, and prefixes bare digits with `+`. The result must
    /// then be 8 to 15 digits without a leading zero.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let truncated: String = raw.trim().chars().take(PHONE_MAX_LENGTH).collect();
        let normalized = normalize_phone(&truncated);

        if normalized.is_empty() {
            return Err(AppError::bad_request("Phone number is required"));
        }
        if !is_e164(&normalized) {
            return Err(AppError::bad_request("Invalid phone number (E.164)"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `+40722123456` -> `+40*******56`, for logs.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 5 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 5))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_phone(raw: &str) -> String {
    let mut s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if let Some(rest) = s.strip_prefix("00") {
        s = format!("+{rest}");
    }
    let all_digits = !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if all_digits && s.len() >= 10 && s.starts_with('0') {
        s = format!("+4{s}");
    } else if all_digits {
        s = format!("+{s}");
    }
    s
}

/// `^\+?[1-9]\d{7,14}$`
fn is_e164(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    let len = digits.len();
    (8..=15).contains(&len)
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

// ============================================================================
// Email
// ============================================================================

/// `local@domain.tld` with no whitespace and exactly one `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let email: String = raw.trim().chars().take(EMAIL_MAX_LENGTH).collect();

        if email.is_empty() {
            return Err(AppError::bad_request("Email is required"));
        }
        if !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Invalid email"));
        }
        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        if email.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        // A dot with at least one character on each side.
        domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// OTP code
// ============================================================================

/// Verification code as typed by the user: 4 to 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(AppError::bad_request("Code is required"));
        }
        if !(4..=8).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request("Invalid code"));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Plain helpers
// ============================================================================

/// Digits only, no sign. `"12"` -> `Some(12)`, `"12a"`, `"-1"` -> `None`.
pub fn parse_numeric_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Trim, then keep at most `max_chars` characters.
pub fn clamp_text(raw: &str, max_chars: usize) -> String {
    raw.trim().chars().take(max_chars).collect()
}

/// Drop angle brackets so stored chat text can never be read back as markup.
pub fn sanitize_message(raw: &str) -> String {
    raw.chars().filter(|c| *c != '<' && *c != '>').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_normalization() {
        let cases = [
            ("+40 722-123-456", "+40722123456"),
            ("0040722123456", "+40722123456"),
            ("0722 123 456", "+40722123456"),
            ("40722123456", "+40722123456"),
            ("+14155552671", "+14155552671"),
        ];
        for (raw, expected) in cases {
            assert_eq!(PhoneNumber::parse(raw).unwrap().as_str(), expected, "{raw}");
        }
    }

    #[test]
    fn test_phone_rejects_malformed() {
        assert!(PhoneNumber::parse("1234567").is_err());
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("+0722123456").is_err());
        assert!(PhoneNumber::parse("+40 72a 123 456").is_err());
        assert!(PhoneNumber::parse("+1234567890123456").is_err());
    }

    #[test]
    fn test_phone_empty_message() {
        let err = PhoneNumber::parse("   ").unwrap_err();
        assert_eq!(err.message(), "Phone number is required");
    }

    #[test]
    fn test_phone_masked() {
        let phone = PhoneNumber::parse("+40722123456").unwrap();
        assert_eq!(phone.masked(), "+40*******56");
    }

    #[test]
    fn test_email_accepts_documented_format() {
        assert!(Email::parse("ana@example.ro").is_ok());
        assert_eq!(
            Email::parse("  ana.pop@mail.example.com ").unwrap().as_str(),
            "ana.pop@mail.example.com"
        );
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(Email::parse("user@").is_err());
        assert!(Email::parse("@example.com").is_err());
        assert!(Email::parse("user@example").is_err());
        assert!(Email::parse("user@.com").is_err());
        assert!(Email::parse("user@example.").is_err());
        assert!(Email::parse("us er@example.com").is_err());
        assert!(Email::parse("a@b@example.com").is_err());
        assert!(Email::parse("").is_err());
    }

    #[test]
    fn test_otp_code() {
        assert!(OtpCode::parse("1234").is_ok());
        assert!(OtpCode::parse("12345678").is_ok());
        assert!(OtpCode::parse(" 654321 ").is_ok());
        assert!(OtpCode::parse("123").is_err());
        assert!(OtpCode::parse("123456789").is_err());
        assert!(OtpCode::parse("12a4").is_err());
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_numeric_id("42"), Some(42));
        assert_eq!(parse_numeric_id(" 7 "), Some(7));
        assert_eq!(parse_numeric_id("-1"), None);
        assert_eq!(parse_numeric_id("4a"), None);
        assert_eq!(parse_numeric_id(""), None);
    }

    #[test]
    fn test_clamp_and_sanitize() {
        assert_eq!(clamp_text("  țară  ", 3), "țar");
        assert_eq!(sanitize_message("<b>salut</b>"), "bsalut/b");
    }
}
