use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub is_superuser: bool,
    pub exp: i64,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_jwt(&self, user: &user::Model, expires_in: i64) -> anyhow::Result<String> {
        let claims = TokenClaims {
            sub: user.user_id,
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            exp: Utc::now().timestamp() + expires_in,
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to encode token")
    }

    pub fn decode_jwt(&self, token: &str) -> anyhow::Result<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> user::Model {
        let now = Utc::now().naive_utc();
        user::Model {
            user_id: Uuid::new_v4(),
            username: "nadia".to_string(),
            email: "nadia@example.com".to_string(),
            first_name: "Nadia".to_string(),
            last_name: "Rahman".to_string(),
            password: String::new(),
            is_superuser: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_carries_user_identity() {
        let manager = JwtManager::new("test-secret");
        let user = sample_user();

        let token = manager.create_jwt(&user, 3600).unwrap();
        let claims = manager.decode_jwt(&token).unwrap();

        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.username, "nadia");
        assert!(claims.is_superuser);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtManager::new("secret-a")
            .create_jwt(&sample_user(), 3600)
            .unwrap();
        assert!(JwtManager::new("secret-b").decode_jwt(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = JwtManager::new("test-secret");
        let token = manager.create_jwt(&sample_user(), -3600).unwrap();
        assert!(manager.decode_jwt(&token).is_err());
    }
}
