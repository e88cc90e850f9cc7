use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    error::{AppError, AppResult},
    models::Role,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
}

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// HS256 signing and verification with issuer/audience checks.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::minutes(config.expires_minutes),
        }
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn verify(&self, token: &str) -> AppResult<VerifiedClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        let decoded = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
        let role = decoded
            .claims
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Unauthorized("Invalid role in token".into()))?;

        Ok(VerifiedClaims {
            user_id,
            email: decoded.claims.email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str, audience: &str) -> TokenKeys {
        TokenKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "storefront-api".into(),
            audience: audience.into(),
            expires_minutes: 60,
        })
    }

    #[test]
    fn issued_token_verifies_to_the_same_identity() {
        let keys = keys("test-secret", "storefront-client");
        let user_id = Uuid::new_v4();
        let token = keys
            .issue(user_id, "a@example.com", Role::Admin, Utc::now())
            .unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = keys("one", "storefront-client")
            .issue(Uuid::new_v4(), "a@example.com", Role::User, Utc::now())
            .unwrap();
        let err = keys("two", "storefront-client").verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn token_for_another_audience_is_rejected() {
        let token = keys("secret", "someone-else")
            .issue(Uuid::new_v4(), "a@example.com", Role::User, Utc::now())
            .unwrap();
        assert!(keys("secret", "storefront-client").verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys("secret", "storefront-client");
        let issued_at = Utc::now() - Duration::hours(3);
        let token = keys
            .issue(Uuid::new_v4(), "a@example.com", Role::User, issued_at)
            .unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
