//! Operator claims for the authentication boundary
//!
//! Session management lives in a separate identity service; this server only
//! verifies the bearer token it issues and enforces catalog roles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Operator role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Editor,
    Admin,
}

/// Claims decoded from the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    pub fn require_read_catalog(&self) -> Result<(), AppError> {
        // All roles can read
        Ok(())
    }

    pub fn require_write_catalog(&self) -> Result<(), AppError> {
        match self.role {
            Role::Editor | Role::Admin => Ok(()),
            Role::Viewer => Err(AppError::Authorization(
                "Insufficient rights to modify the catalog".to_string(),
            )),
        }
    }
}
