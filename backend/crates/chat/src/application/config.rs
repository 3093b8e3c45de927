//! Application Configuration

use platform::rate_limit::RateLimitConfig;

/// Chat application configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// `POST messages`: 8 calls per 10 seconds per IP
    pub messages_limit: RateLimitConfig,
    /// `POST chat`: 6 calls per 15 seconds per IP
    pub chat_limit: RateLimitConfig,
    /// Characters of the user's message repeated in the echo reply
    pub echo_max_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            messages_limit: RateLimitConfig::new(8, 10),
            chat_limit: RateLimitConfig::new(6, 15),
            echo_max_chars: 500,
        }
    }
}
