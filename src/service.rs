//! Authentication Service
//!
//! Registration and login over a [`CredentialStore`]: request validation,
//! Argon2id hashing on the blocking pool, and token issuance.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::*;
use crate::password::PasswordHashing;
use crate::store::{CredentialStore, StoreError};
use crate::token::TokenSigner;

use std::sync::Arc;
use validator::Validate;

/// Authentication service
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    config: AuthConfig,
    hashing: PasswordHashing,
    signer: TokenSigner,
    dummy_hash: String,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// Validates `config` and precomputes the dummy hash used on the
    /// unknown-email login path.
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Result<Self, AuthError> {
        config.validate()?;

        let hashing = PasswordHashing::new(&config)?;
        let dummy_hash = hashing.dummy_hash()?;
        let signer = TokenSigner::new(config.jwt_secret.as_bytes(), config.token_expiration)?;

        tracing::info!(
            token_lifetime_secs = signer.lifetime().num_seconds(),
            "Authentication service initialized"
        );

        Ok(Self {
            store,
            config,
            hashing,
            signer,
            dummy_hash,
        })
    }

    /// Get reference to config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get reference to the token signer
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    // ============================================
    // Password Hashing
    // ============================================

    /// Hash a password on the blocking pool
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hashing = self.hashing.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {:?}", e);
                AuthError::Internal
            })?
    }

    /// Verify a password on the blocking pool
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hashing = self.hashing.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hashing.verify(&password, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {:?}", e);
                AuthError::Internal
            })?
    }

    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        Ok(())
    }

    // ============================================
    // Registration
    // ============================================

    /// Register a new user
    ///
    /// The password is hashed before the store is touched; the store's `put`
    /// is the only uniqueness check.
    pub async fn register(&self, req: RegisterRequest) -> Result<(), AuthError> {
        req.validate()?;
        let email = canonical_email(&req.email)?;
        let first_name = display_name(&req.first_name, "First name")?;
        let last_name = display_name(&req.last_name, "Last name")?;
        self.validate_password(&req.password)?;

        let password_hash = self.hash_password(&req.password).await?;
        let record = UserRecord::new(email, password_hash, first_name, last_name);
        let user_id = record.id;

        match self.store.put(record).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "User registered");
                Ok(())
            }
            Err(StoreError::AlreadyExists) => {
                tracing::debug!("Registration rejected: email already registered");
                Err(AuthError::DuplicateAccount)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ============================================
    // Login
    // ============================================

    /// Attempt to login a user
    ///
    /// An unknown email and a wrong password both yield
    /// `InvalidCredentials`, and both run one Argon2 verification.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        req.validate()?;
        let email = canonical_email(&req.email)?;

        let record = match self.store.get(&email).await {
            Ok(record) => Some(record),
            Err(StoreError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let hash = record
            .as_ref()
            .map(|r| r.password_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let password_ok = self.verify_password(&req.password, hash).await?;

        let record = match record {
            Some(record) if password_ok => record,
            _ => {
                tracing::warn!("Failed login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let (token, _) = self.signer.issue(&record.email)?;

        tracing::info!(user_id = %record.id, "User logged in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: UserResponse::from(record),
        })
    }

    // ============================================
    // Token Validation
    // ============================================

    /// Validate a token issued by this service
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.signer.validate(token)
    }

    /// Look up the user a validated token belongs to
    pub async fn current_user(&self, claims: &TokenClaims) -> Result<UserResponse, AuthError> {
        let record = self.store.get(&claims.email).await?;
        Ok(UserResponse::from(record))
    }
}

/// Canonical form of an email used as the store key: trimmed, lowercased
pub fn canonical_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();

    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }

    Ok(email)
}

/// Trimmed display name; blank names are rejected like missing ones
fn display_name(raw: &str, field: &str) -> Result<String, AuthError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }

    Ok(name.to_string())
}
