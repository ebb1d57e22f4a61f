use chrono::{Duration, Utc};
use jsonwebtoken::errors::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller role carried in the token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Admin,
}

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // Farmer or admin ID
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub exp: usize, // Expiration timestamp
}

/// Sign a token the way the identity provider does. Tokens are issued
/// elsewhere; this exists for tooling and tests.
pub fn sign(
    user_id: Uuid,
    role: Role,
    name: &str,
    email: &str,
    secret: &str,
    valid_for: Duration,
) -> Result<String> {
    let expiration = (Utc::now() + valid_for).timestamp().max(0);

    let claims = Claims {
        sub: user_id,
        role,
        name: name.to_owned(),
        email: email.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify and decode an HS256 token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
