// Access tokens (HS256).

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use conforma_core::errors::Error;

pub const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session access tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl SessionTokens {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn sign(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|e| anyhow::anyhow!(e))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| Error::not_authenticated(e.to_string()).into_anyhow())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conforma_core::errors::ErrorKind;

    #[test]
    fn sign_then_verify() {
        let tokens = SessionTokens::new("dev-secret");
        let user_id = Uuid::new_v4();
        let token = tokens.sign(user_id).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = SessionTokens::new("secret-a").sign(Uuid::new_v4()).unwrap();
        let err = SessionTokens::new("secret-b").verify(&token).unwrap_err();
        assert_eq!(Error::normalize(err).kind, ErrorKind::NotAuthenticated);
    }

    #[test]
    fn expired_token_fails() {
        let tokens = SessionTokens::new("dev-secret").with_ttl_secs(-120);
        let token = tokens.sign(Uuid::new_v4()).unwrap();
        assert!(tokens.verify(&token).is_err());
    }
}
