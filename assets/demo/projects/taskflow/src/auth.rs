use anyhow::{bail, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const PASSWORD_MIN_LENGTH: usize = 12;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // user id
    pub role: String,
    pub exp: u64,
    pub iat: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < PASSWORD_MIN_LENGTH {
        bail!("password must be at least {PASSWORD_MIN_LENGTH} characters");
    }
    Ok(hash(password, DEFAULT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(verify(password, hash)?)
}

pub fn issue_tokens(user_id: &str, role: &str, secret: &str, expiry_secs: u64) -> Result<TokenPair> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: now + expiry_secs,
        iat: now,
    };
    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    // Refresh token: longer-lived, same structure
    let refresh_claims = Claims { exp: now + expiry_secs * 24, ..claims };
    let refresh_token = encode(
        &Header::default(),
        &refresh_claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(TokenPair { access_token, refresh_token, expires_in: expiry_secs })
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn require_role(claims: &Claims, required: &str) -> Result<()> {
    if claims.role != required && claims.role != "admin" {
        bail!("insufficient permissions: need '{required}', have '{}'", claims.role);
    }
    Ok(())
}
