//! OTP Session Token
//!
//! Short-lived proof that a phone number passed SMS verification, carried
//! by the browser from `otp_verify` to `create-offer`.
//!
//! Format: `b64url(header).b64url(claims).b64url(hmac_sha256(secret, header.claims))`
//! with header `{"alg":"HS256","typ":"OTP"}`. The signature is checked before
//! anything is decoded.

use platform::crypto::{constant_time_eq, from_base64url, hmac_sha256, random_bytes, to_base64url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const TOKEN_KIND: &str = "otp";
pub const TOKEN_VERSION: u32 = 1;
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

const ALG: &str = "HS256";
const TYP: &str = "OTP";
const JTI_BYTES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Signed claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpClaims {
    /// Verified phone in normalized E.164 form
    pub phone: String,
    pub kind: String,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expires at, unix seconds
    pub exp: i64,
    pub v: u32,
    /// Random nonce
    pub jti: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub claims: OtpClaims,
    /// Seconds until expiry
    pub ttl_left: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Missing token")]
    Missing,
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid signature")]
    BadSignature,
    #[error("Invalid token payload")]
    BadPayload,
    #[error("Invalid header")]
    BadHeader,
    #[error("Expired token")]
    Expired,
    /// No signing secret configured
    #[error("OTP session secret not configured")]
    NoSecret,
}

/// Issues and verifies OTP session tokens with one HMAC secret.
#[derive(Clone, Default)]
pub struct OtpTokenSigner {
    secret: Vec<u8>,
}

impl fmt::Debug for OtpTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpTokenSigner")
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

impl OtpTokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }

    pub fn issue(&self, phone: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(phone, ttl, chrono::Utc::now().timestamp())
    }

    /// `exp` is `now + ttl`, with the ttl floored at one second.
    pub fn issue_at(&self, phone: &str, ttl: Duration, now: i64) -> Result<String, TokenError> {
        if !self.is_configured() {
            return Err(TokenError::NoSecret);
        }

        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1);
        let claims = OtpClaims {
            phone: phone.to_string(),
            kind: TOKEN_KIND.to_string(),
            iat: now,
            exp: now.saturating_add(ttl_secs),
            v: TOKEN_VERSION,
            jti: to_base64url(&random_bytes(JTI_BYTES)),
        };
        let header = Header {
            alg: ALG.to_string(),
            typ: TYP.to_string(),
        };

        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let signature = to_base64url(&hmac_sha256(&self.secret, signing_input.as_bytes()));
        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Valid while `now <= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedToken, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        if !self.is_configured() {
            return Err(TokenError::NoSecret);
        }

        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, claims_b64, signature_b64] = parts.as_slice() else {
            return Err(TokenError::Malformed);
        };

        let signature = from_base64url(signature_b64).map_err(|_| TokenError::BadSignature)?;
        let expected = hmac_sha256(
            &self.secret,
            format!("{header_b64}.{claims_b64}").as_bytes(),
        );
        if !constant_time_eq(&expected, &signature) {
            return Err(TokenError::BadSignature);
        }

        let header: Header = decode_json(header_b64)?;
        let claims: OtpClaims = decode_json(claims_b64)?;

        if header.alg != ALG || header.typ != TYP {
            return Err(TokenError::BadHeader);
        }
        if claims.kind != TOKEN_KIND {
            return Err(TokenError::BadPayload);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        let ttl_left = u64::try_from(claims.exp - now).unwrap_or(0);
        Ok(VerifiedToken { claims, ttl_left })
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, TokenError> {
    serde_json::to_vec(value)
        .map(|bytes| to_base64url(&bytes))
        .map_err(|_| TokenError::BadPayload)
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = from_base64url(segment).map_err(|_| TokenError::BadPayload)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::BadPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;

    fn signer() -> OtpTokenSigner {
        OtpTokenSigner::new(b"test-secret".to_vec())
    }

    #[test]
    fn test_issue_then_verify() {
        let token = signer()
            .issue_at("+40722123456", DEFAULT_TTL, NOW)
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verified = signer().verify_at(&token, NOW + 60).unwrap();
        assert_eq!(verified.claims.phone, "+40722123456");
        assert_eq!(verified.claims.kind, "otp");
        assert_eq!(verified.claims.iat, NOW);
        assert_eq!(verified.claims.exp, NOW + 900);
        assert_eq!(verified.claims.v, 1);
        assert_eq!(verified.ttl_left, 840);
    }

    #[test]
    fn test_header_is_fixed() {
        let token = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        let header = from_base64url(token.split('.').next().unwrap()).unwrap();
        assert_eq!(header, br#"{"alg":"HS256","typ":"OTP"}"#);
    }

    #[test]
    fn test_expiry_boundary() {
        let token = signer()
            .issue_at("+40722123456", Duration::from_secs(30), NOW)
            .unwrap();
        assert!(signer().verify_at(&token, NOW + 30).is_ok());
        assert_eq!(
            signer().verify_at(&token, NOW + 31),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_zero_ttl_lasts_one_second() {
        let token = signer().issue_at("+40722123456", Duration::ZERO, NOW).unwrap();
        let verified = signer().verify_at(&token, NOW).unwrap();
        assert_eq!(verified.claims.exp, NOW + 1);
    }

    #[test]
    fn test_jti_is_unique() {
        let a = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        let b = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = OtpClaims {
            phone: "+40799999999".to_string(),
            kind: "otp".to_string(),
            iat: NOW,
            exp: NOW + 900,
            v: 1,
            jti: "x".to_string(),
        };
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            encode_json(&forged_claims).unwrap(),
            parts[2]
        );
        assert_eq!(signer().verify_at(&forged, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut sig_bytes = from_base64url(sig).unwrap();
        sig_bytes[0] ^= 0x01;
        let forged = format!("{head}.{}", to_base64url(&sig_bytes));
        assert_eq!(signer().verify_at(&forged, NOW), Err(TokenError::BadSignature));

        let truncated = format!("{head}.{}", &sig[..10]);
        assert_eq!(signer().verify_at(&truncated, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        let other = OtpTokenSigner::new(b"another-secret".to_vec());
        assert_eq!(other.verify_at(&token, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(signer().verify_at("", NOW), Err(TokenError::Missing));
        assert_eq!(signer().verify_at("   ", NOW), Err(TokenError::Missing));
        assert_eq!(signer().verify_at("a.b", NOW), Err(TokenError::Malformed));
        assert_eq!(signer().verify_at("a.b.c.d", NOW), Err(TokenError::Malformed));
    }

    /// Correctly signed segments that do not hold the expected JSON
    fn sign_raw(header: &str, claims: &str) -> String {
        let input = format!("{}.{}", to_base64url(header.as_bytes()), to_base64url(claims.as_bytes()));
        let sig = to_base64url(&hmac_sha256(b"test-secret", input.as_bytes()));
        format!("{input}.{sig}")
    }

    #[test]
    fn test_signed_but_invalid_contents() {
        let claims = format!(
            r#"{{"phone":"+40722123456","kind":"otp","iat":{NOW},"exp":{},"v":1,"jti":"n"}}"#,
            NOW + 60
        );

        let bad_header = sign_raw(r#"{"alg":"none","typ":"OTP"}"#, &claims);
        assert_eq!(signer().verify_at(&bad_header, NOW), Err(TokenError::BadHeader));

        let not_json = sign_raw(r#"{"alg":"HS256","typ":"OTP"}"#, "not json");
        assert_eq!(signer().verify_at(&not_json, NOW), Err(TokenError::BadPayload));

        let wrong_kind = sign_raw(
            r#"{"alg":"HS256","typ":"OTP"}"#,
            &claims.replace(r#""kind":"otp""#, r#""kind":"login""#),
        );
        assert_eq!(signer().verify_at(&wrong_kind, NOW), Err(TokenError::BadPayload));

        let good = sign_raw(r#"{"alg":"HS256","typ":"OTP"}"#, &claims);
        assert!(signer().verify_at(&good, NOW).is_ok());
    }

    #[test]
    fn test_empty_secret_cannot_issue_or_verify() {
        let unset = OtpTokenSigner::default();
        assert!(!unset.is_configured());
        assert_eq!(
            unset.issue_at("+40722123456", DEFAULT_TTL, NOW),
            Err(TokenError::NoSecret)
        );
        let token = signer().issue_at("+40722123456", DEFAULT_TTL, NOW).unwrap();
        assert_eq!(unset.verify_at(&token, NOW), Err(TokenError::NoSecret));
    }
}
