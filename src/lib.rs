//! Credential Authentication
//!
//! Registration and login kernel for an auth service:
//! - Credential store trait with an in-memory implementation
//! - Argon2id password hashing with per-record salts
//! - HS256 JWT issuance and validation (24 hour default lifetime)
//! - Optional axum routes for register, login and current user
//!
//! # Configuration
//!
//! Configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing tokens (required, min 32 chars)
//! - `JWT_EXPIRATION` - Token lifetime in seconds (default: 86400)
//! - `ARGON2_MEMORY_COST` - Argon2 memory cost in KiB (default: 65536)
//! - `ARGON2_TIME_COST` - Argon2 iterations (default: 3)
//! - `ARGON2_PARALLELISM` - Argon2 lanes (default: 4)
//! - `MIN_PASSWORD_LENGTH` - Minimum password length (default: 1)
//!
//! # Usage
//!
//! ```rust,ignore
//! use credential_auth::{AuthConfig, AuthService, InMemoryCredentialStore, RegisterRequest};
//! use std::sync::Arc;
//!
//! let config = AuthConfig::from_env()?;
//! let auth = Arc::new(AuthService::new(config, Arc::new(InMemoryCredentialStore::new()))?);
//!
//! auth.register(RegisterRequest::new("a@x.com", "Pw1!", "A", "B")).await?;
//! let router = credential_auth::create_routes(auth);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthUser, ClientInfo};
pub use handlers::{create_routes, AuthState};
pub use models::*;
pub use service::AuthService;
pub use store::{CredentialStore, InMemoryCredentialStore, StoreError};
pub use token::TokenSigner;
