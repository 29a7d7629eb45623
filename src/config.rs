//! Authentication Configuration
//!
//! Values are loaded once from environment variables at startup and handed
//! to [`AuthService`](crate::AuthService) explicitly. The signing secret is
//! never printed: the `Debug` impl redacts it.

use crate::error::AuthError;
use std::env;
use std::fmt;

/// Token lifetime used when `JWT_EXPIRATION` is unset (24 hours)
pub const DEFAULT_TOKEN_EXPIRATION: i64 = 86_400;

/// Longest accepted token lifetime (10 years)
pub const MAX_TOKEN_EXPIRATION: i64 = 10 * 365 * 86_400;

/// Shortest accepted signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Token lifetime in seconds (from JWT_EXPIRATION env var)
    pub token_expiration: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,

    /// Minimum password length (from MIN_PASSWORD_LENGTH env var)
    pub min_password_length: usize,
}

impl AuthConfig {
    /// Build a configuration around `secret` with every other value defaulted
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_expiration: DEFAULT_TOKEN_EXPIRATION,
            argon2_memory_cost: 65536, // 64 MiB
            argon2_time_cost: 3,
            argon2_parallelism: 4,
            min_password_length: 1,
        }
    }

    /// Load configuration from environment variables
    ///
    /// `JWT_SECRET` is required; everything else falls back to the defaults
    /// of [`AuthConfig::new`]. Unparseable numbers are treated as unset.
    pub fn from_env() -> Result<Self, AuthError> {
        let secret = env::var("JWT_SECRET").map_err(|_| {
            AuthError::Config("JWT_SECRET environment variable must be set".to_string())
        })?;

        let defaults = Self::new(secret);

        Ok(Self {
            token_expiration: parse_env("JWT_EXPIRATION").unwrap_or(defaults.token_expiration),
            argon2_memory_cost: parse_env("ARGON2_MEMORY_COST")
                .unwrap_or(defaults.argon2_memory_cost),
            argon2_time_cost: parse_env("ARGON2_TIME_COST").unwrap_or(defaults.argon2_time_cost),
            argon2_parallelism: parse_env("ARGON2_PARALLELISM")
                .unwrap_or(defaults.argon2_parallelism),
            min_password_length: parse_env("MIN_PASSWORD_LENGTH")
                .unwrap_or(defaults.min_password_length),
            ..defaults
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Config(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_SECRET_LENGTH
            )));
        }

        if self.token_expiration <= 0 || self.token_expiration > MAX_TOKEN_EXPIRATION {
            return Err(AuthError::Config(format!(
                "JWT_EXPIRATION must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRATION
            )));
        }

        if self.argon2_time_cost == 0 || self.argon2_parallelism == 0 {
            return Err(AuthError::Config(
                "ARGON2_TIME_COST and ARGON2_PARALLELISM must be positive".to_string(),
            ));
        }

        // argon2 requires at least 8 KiB per lane
        if u64::from(self.argon2_memory_cost) < 8 * u64::from(self.argon2_parallelism) {
            return Err(AuthError::Config(
                "ARGON2_MEMORY_COST must be at least 8 * ARGON2_PARALLELISM".to_string(),
            ));
        }

        if self.min_password_length == 0 {
            return Err(AuthError::Config(
                "MIN_PASSWORD_LENGTH must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_expiration", &self.token_expiration)
            .field("argon2_memory_cost", &self.argon2_memory_cost)
            .field("argon2_time_cost", &self.argon2_time_cost)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

#[cfg(test)]
impl AuthConfig {
    /// Cheap Argon2 parameters so tests don't spend seconds hashing
    pub(crate) fn for_tests() -> Self {
        Self {
            argon2_memory_cost: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..Self::new("test-secret-key-that-is-long-enough-1234")
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
