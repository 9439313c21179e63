//! services/api/src/web/tokens.rs
//!
//! Stateless session issuer: signs and verifies the paired access/refresh
//! JWTs. The two token kinds use independent secrets so a compromise of one
//! cannot be used to forge the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The claims carried by both token kinds. Identity is the email alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies access and refresh tokens (HS256).
#[derive(Clone)]
pub struct TokenIssuer {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.refresh_secret,
            config.jwt_expire_secs,
            config.refresh_expire_secs,
        )
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    pub fn issue_access(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        sign(email, &self.access_encoding, self.access_ttl_secs)
    }

    pub fn issue_refresh(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        sign(email, &self.refresh_encoding, self.refresh_ttl_secs)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify(token, &self.access_decoding)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify(token, &self.refresh_decoding)
    }
}

fn sign(
    email: &str,
    key: &EncodingKey,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };
    encode(&Header::default(), &claims, key)
}

fn verify(token: &str, key: &DecodingKey) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact; the default 60s leeway would stretch token lifetimes.
    validation.leeway = 0;
    let data: TokenData<Claims> = decode::<Claims>(token, key, &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("access-secret", "refresh-secret", 900, 604800)
    }

    #[test]
    fn access_token_round_trips_email_claim() {
        let issuer = issuer();
        let token = issuer.issue_access("a@x.com").unwrap();
        let claims = issuer.verify_access(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("access-secret", "refresh-secret", -60, 604800);
        let token = issuer.issue_access("a@x.com").unwrap();
        let err = issuer.verify_access(&token).unwrap_err();
        assert_eq!(
            err.kind(),
            &jsonwebtoken::errors::ErrorKind::ExpiredSignature
        );
    }

    #[test]
    fn access_token_is_not_a_valid_refresh_token() {
        let issuer = issuer();
        let token = issuer.issue_access("a@x.com").unwrap();
        assert!(issuer.verify_refresh(&token).is_err());
    }

    #[test]
    fn refresh_token_is_not_a_valid_access_token() {
        let issuer = issuer();
        let token = issuer.issue_refresh("a@x.com").unwrap();
        assert!(issuer.verify_access(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(issuer().verify_access("not.a.jwt").is_err());
    }
}
