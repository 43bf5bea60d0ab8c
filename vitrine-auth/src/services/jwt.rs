use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::config::{JwtConfig, JwtSigning};
use crate::models::{PermissionSet, TokenClaims, User};

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Issues and validates the bearer tokens presented on protected requests.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Issue a token for `user`. `None` means no explicit restriction: the
    /// manager embeds its own default permission set.
    async fn create_token(
        &self,
        user: &User,
        permissions: Option<&[String]>,
    ) -> Result<String, anyhow::Error>;

    async fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Wire claims of a signed token.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    user_id: i64,
    permissions: PermissionSet,
    /// Issued at (Unix timestamp)
    iat: i64,
    /// Expiration time (Unix timestamp)
    exp: i64,
}

/// JWT-backed token manager, HS256 with a shared secret or RS256 with PEM keys.
#[derive(Clone)]
pub struct JwtTokenManager {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_minutes: i64,
    default_permissions: Vec<String>,
}

impl JwtTokenManager {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        let (algorithm, encoding_key, decoding_key) = match &config.signing {
            JwtSigning::Secret(secret) => {
                if secret.is_empty() {
                    anyhow::bail!("JWT secret must not be empty");
                }
                (
                    Algorithm::HS256,
                    EncodingKey::from_secret(secret.as_bytes()),
                    DecodingKey::from_secret(secret.as_bytes()),
                )
            }
            JwtSigning::RsaKeyFiles {
                private_key_path,
                public_key_path,
            } => {
                let private_key_pem = fs::read_to_string(private_key_path).map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to read private key from {}: {}",
                        private_key_path,
                        e
                    )
                })?;
                let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
                    .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

                let public_key_pem = fs::read_to_string(public_key_path).map_err(|e| {
                    anyhow::anyhow!("Failed to read public key from {}: {}", public_key_path, e)
                })?;
                let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
                    .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

                (Algorithm::RS256, encoding_key, decoding_key)
            }
        };

        tracing::info!(algorithm = ?algorithm, "JWT token manager initialized");

        Ok(Self {
            algorithm,
            encoding_key,
            decoding_key,
            token_expiry_minutes: config.token_expiry_minutes,
            default_permissions: config.default_permissions.clone(),
        })
    }

    fn sign(&self, user_id: i64, permissions: PermissionSet) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = Duration::try_minutes(self.token_expiry_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Token expiry of {} minutes is out of range",
                    self.token_expiry_minutes
                )
            })?;

        let claims = JwtClaims {
            user_id,
            permissions,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;

        let data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Ok(TokenClaims {
            user_id: data.claims.user_id,
            permissions: data.claims.permissions,
        })
    }
}

#[async_trait]
impl TokenManager for JwtTokenManager {
    async fn create_token(
        &self,
        user: &User,
        permissions: Option<&[String]>,
    ) -> Result<String, anyhow::Error> {
        let permissions: PermissionSet = match permissions {
            Some(labels) => labels.iter().cloned().collect(),
            None => self.default_permissions.iter().cloned().collect(),
        };
        self.sign(user.id, permissions)
    }

    async fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(token)
    }
}
