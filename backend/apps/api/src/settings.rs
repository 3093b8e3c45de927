//! Process Settings
//!
//! Everything the binary reads from the environment, loaded once at startup.

use anyhow::{Context, bail};
use enrollment::TwilioConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";

/// Hosted database credentials as exposed to the browser and the server
#[derive(Debug, Clone, Default)]
pub struct SupabaseSettings {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub service_role_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub supabase: SupabaseSettings,
    /// `None` leaves the OTP routes answering 500
    pub twilio: Option<TwilioConfig>,
    /// `None` only in debug builds, where a per-process secret is generated
    pub otp_session_secret: Option<String>,
    pub cors_origins: CorsOrigins,
    pub static_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), !cfg!(debug_assertions))
    }

    /// `release` makes `OTP_SESSION_SECRET` mandatory.
    pub fn from_lookup<F>(lookup: F, release: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let bind_addr = pick(&["BIND_ADDR"])
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        let supabase = SupabaseSettings {
            url: pick(&["SUPABASE_URL", "VITE_SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"]),
            anon_key: pick(&[
                "SUPABASE_ANON_KEY",
                "VITE_SUPABASE_ANON_KEY",
                "NEXT_PUBLIC_SUPABASE_ANON_KEY",
            ]),
            service_role_key: pick(&["SUPABASE_SERVICE_ROLE_KEY"]),
        };

        let twilio = TwilioConfig::new(
            &pick(&["TWILIO_ACCOUNT_SID"]).unwrap_or_default(),
            &pick(&["TWILIO_AUTH_TOKEN"]).unwrap_or_default(),
            &pick(&["TWILIO_VERIFY_SID"]).unwrap_or_default(),
        );

        let otp_session_secret = pick(&["OTP_SESSION_SECRET"]);
        if release && otp_session_secret.is_none() {
            bail!("OTP_SESSION_SECRET must be set in production");
        }

        let cors_origins = parse_origins(pick(&["CORS_ORIGINS"]).as_deref().unwrap_or("*"));
        let static_dir = pick(&["STATIC_DIR"]).map(PathBuf::from);

        Ok(Self {
            bind_addr,
            supabase,
            twilio,
            otp_session_secret,
            cors_origins,
            static_dir,
        })
    }

    /// Logs what is missing without failing startup.
    pub fn warn_missing(&self) {
        if self.supabase.url.is_none() {
            tracing::warn!("SUPABASE_URL is not set, database reads will fail");
        }
        if self.supabase.anon_key.is_none() {
            tracing::warn!("SUPABASE_ANON_KEY is not set");
        }
        if self.supabase.service_role_key.is_none() {
            tracing::warn!("SUPABASE_SERVICE_ROLE_KEY is not set, offers and registrations are disabled");
        }
        if self.twilio.is_none() {
            tracing::warn!("Twilio Verify is not configured, OTP routes will answer 500");
        }
        if self.otp_session_secret.is_none() {
            tracing::warn!("OTP_SESSION_SECRET is not set, using a random per-process secret");
        }
    }
}

fn parse_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}
