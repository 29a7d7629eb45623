//! Token Signing
//!
//! HS256 JWTs carrying `{email, iat, exp}`. Expiry is checked here against
//! an explicit `now` rather than inside `jsonwebtoken`, so there is no
//! leeway and a token is valid up to and including its `exp` second.

use crate::error::AuthError;
use crate::models::TokenClaims;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Signs and validates tokens with a shared secret
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenSigner {
    /// Create a signer for `secret`; tokens live for `lifetime_secs`
    pub fn new(secret: &[u8], lifetime_secs: i64) -> Result<Self, AuthError> {
        let lifetime = Duration::try_seconds(lifetime_secs)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| {
                AuthError::Config(format!("token lifetime out of range: {}s", lifetime_secs))
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        })
    }

    /// Token lifetime
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `email` at the current time
    pub fn issue(&self, email: &str) -> Result<(String, TokenClaims), AuthError> {
        self.issue_at(email, Utc::now())
    }

    /// Issue a token for `email` as of `now`
    pub fn issue_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, TokenClaims), AuthError> {
        let exp = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            tracing::error!("Token expiry overflows the calendar");
            AuthError::Internal
        })?;

        let claims = TokenClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign token: {:?}", e);
                AuthError::Internal
            })?;

        Ok((token, claims))
    }

    /// Validate a token against the current time
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// A bad signature or malformed token is `InvalidToken`; a good signature
    /// past its `exp` is `TokenExpired`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        if now.timestamp() > claims.exp {
            tracing::debug!(email = %claims.email, exp = claims.exp, "Token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough-1234";
    const DAY: i64 = 86_400;

    fn signer() -> TokenSigner {
        TokenSigner::new(SECRET, DAY).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_round_trip_recovers_claims() {
        let signer = signer();
        let (token, issued) = signer.issue_at("a@x.com", fixed_now()).unwrap();

        let claims = signer.validate_at(&token, fixed_now()).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_expiry_is_one_day_after_issue() {
        let signer = signer();
        let (_, claims) = signer.issue_at("a@x.com", fixed_now()).unwrap();

        assert_eq!(claims.iat, fixed_now().timestamp());
        assert_eq!(claims.exp - claims.iat, DAY);
    }

    #[test]
    fn test_expiry_boundary() {
        let signer = signer();
        let (token, claims) = signer.issue_at("a@x.com", fixed_now()).unwrap();
        let exp = Utc.timestamp_opt(claims.exp, 0).unwrap();

        assert!(signer.validate_at(&token, exp - Duration::seconds(1)).is_ok());
        assert!(signer.validate_at(&token, exp).is_ok());
        assert_eq!(
            signer.validate_at(&token, exp + Duration::seconds(1)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = signer();
        let other = TokenSigner::new(b"another-secret-key-that-is-long-enough", DAY).unwrap();
        let (token, _) = signer.issue_at("a@x.com", fixed_now()).unwrap();

        assert_eq!(
            other.validate_at(&token, fixed_now()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_altered_signature_rejected() {
        let signer = signer();
        let (token, _) = signer.issue_at("a@x.com", fixed_now()).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            signer.validate_at(&tampered, fixed_now()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_altered_payload_rejected() {
        let signer = signer();
        let (token, _) = signer.issue_at("a@x.com", fixed_now()).unwrap();
        let (forged, _) = signer.issue_at("admin@x.com", fixed_now()).unwrap();

        // Splice the forged payload onto the original signature
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(
            signer.validate_at(&spliced, fixed_now()),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = signer();

        assert_eq!(signer.validate("not.a.jwt"), Err(AuthError::InvalidToken));
        assert_eq!(signer.validate(""), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_unrepresentable_lifetime_rejected() {
        assert!(matches!(
            TokenSigner::new(SECRET, i64::MAX),
            Err(AuthError::Config(_))
        ));
        assert!(matches!(
            TokenSigner::new(SECRET, 0),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_expiry_overflow_is_error() {
        let signer = TokenSigner::new(SECRET, 1_000_000_000_000_000).unwrap();

        assert_eq!(
            signer.issue_at("a@x.com", fixed_now()),
            Err(AuthError::Internal)
        );
    }

    #[test]
    fn test_lifetime_reported() {
        assert_eq!(signer().lifetime(), Duration::days(1));
    }
}
