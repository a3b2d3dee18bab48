use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::ServiceError;
use crate::config::JwtConfig;

/// Claims carried by an admin access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    pub admin_id: String,
    pub email: String,
    pub organization_name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Signed-token capability used by login and the auth middleware.
pub trait TokenCodec: Send + Sync {
    fn encode(
        &self,
        admin_id: &str,
        email: &str,
        organization_name: &str,
    ) -> Result<String, ServiceError>;

    fn decode(&self, token: &str) -> Result<AuthClaims, ServiceError>;

    fn expires_in_seconds(&self) -> i64;
}

/// HMAC JWT codec.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiry: Duration,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        let algorithm = Algorithm::from_str(&config.algorithm)
            .map_err(|e| anyhow::anyhow!("Unsupported JWT algorithm {}: {}", config.algorithm, e))?;
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            anyhow::bail!("JWT algorithm {} is not an HMAC scheme", config.algorithm);
        }
        if config.expire_hours <= 0 {
            anyhow::bail!("Token lifetime must be positive");
        }

        let secret = config.secret.expose_secret().as_bytes();
        if secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        tracing::info!(algorithm = ?algorithm, "JWT service initialized");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            expiry: Duration::hours(config.expire_hours),
        })
    }

    /// Sign arbitrary claims. Lets callers mint tokens with custom timestamps.
    pub fn encode_claims(&self, claims: &AuthClaims) -> Result<String, ServiceError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(|e| {
            ServiceError::Internal(anyhow::anyhow!("Failed to encode access token: {}", e))
        })
    }
}

impl TokenCodec for JwtService {
    fn encode(
        &self,
        admin_id: &str,
        email: &str,
        organization_name: &str,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = AuthClaims {
            admin_id: admin_id.to_string(),
            email: email.to_string(),
            organization_name: organization_name.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        self.encode_claims(&claims)
    }

    fn decode(&self, token: &str) -> Result<AuthClaims, ServiceError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<AuthClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            let message = match e.kind() {
                JwtErrorKind::ExpiredSignature => "Token has expired",
                _ => "Invalid token",
            };
            ServiceError::Unauthorized(message.to_string())
        })?;

        let claims = data.claims;
        if claims.admin_id.is_empty() || claims.organization_name.is_empty() {
            return Err(ServiceError::Unauthorized(
                "Invalid token payload".to_string(),
            ));
        }
        Ok(claims)
    }

    fn expires_in_seconds(&self) -> i64 {
        self.expiry.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config(algorithm: &str) -> JwtConfig {
        JwtConfig {
            secret: Secret::new("unit-test-secret".to_string()),
            algorithm: algorithm.to_string(),
            expire_hours: 24,
        }
    }

    #[test]
    fn test_encode_decode() {
        let jwt = JwtService::new(&config("HS256")).unwrap();
        let token = jwt.encode("admin-1", "a@example.com", "alpha").unwrap();

        let claims = jwt.decode(&token).unwrap();
        assert_eq!(claims.admin_id, "admin-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.organization_name, "alpha");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(jwt.expires_in_seconds(), 86400);
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new(&config("HS384")).unwrap();
        let now = Utc::now().timestamp();
        let token = jwt
            .encode_claims(&AuthClaims {
                admin_id: "admin-1".to_string(),
                email: "a@example.com".to_string(),
                organization_name: "alpha".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        let err = jwt.decode(&token).unwrap_err();
        assert_eq!(err.to_string(), "Token has expired");
    }

    #[test]
    fn test_wrong_secret_and_garbage() {
        let jwt = JwtService::new(&config("HS256")).unwrap();
        let mut other = config("HS256");
        other.secret = Secret::new("another-secret".to_string());
        let other = JwtService::new(&other).unwrap();

        let token = other.encode("admin-1", "a@example.com", "alpha").unwrap();
        assert_eq!(jwt.decode(&token).unwrap_err().to_string(), "Invalid token");
        assert_eq!(
            jwt.decode("garbage").unwrap_err().to_string(),
            "Invalid token"
        );
    }

    #[test]
    fn test_empty_claims_rejected() {
        let jwt = JwtService::new(&config("HS256")).unwrap();
        let token = jwt.encode("", "a@example.com", "alpha").unwrap();
        assert_eq!(
            jwt.decode(&token).unwrap_err().to_string(),
            "Invalid token payload"
        );
    }

    #[test]
    fn test_rejects_non_hmac_algorithm() {
        assert!(JwtService::new(&config("RS256")).is_err());
        assert!(JwtService::new(&config("none")).is_err());
    }
}
