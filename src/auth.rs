use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Json},
    http::{request::Parts, StatusCode},
};
use serde_json::json;

use crate::config::Config;

pub const TOKEN_KIND_ACCESS: &str = "access";
pub const TOKEN_KIND_REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub kind: String, // "access" or "refresh"
    pub exp: usize,
}

/// Token signing/verification keys plus validity windows, built once from
/// the process configuration and shared through the application state.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthKeys {
    pub fn from_config(config: &Config) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::hours(config.access_token_hours),
            refresh_ttl: Duration::days(config.refresh_token_days),
        }
    }

    pub fn create_access_token(&self, user_id: i32, username: &str) -> Result<String, String> {
        self.create_token(user_id, username, TOKEN_KIND_ACCESS, self.access_ttl)
    }

    pub fn create_refresh_token(&self, user_id: i32, username: &str) -> Result<String, String> {
        self.create_token(user_id, username, TOKEN_KIND_REFRESH, self.refresh_ttl)
    }

    fn create_token(
        &self,
        user_id: i32,
        username: &str,
        kind: &str,
        ttl: Duration,
    ) -> Result<String, String> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .expect("valid timestamp")
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_owned(),
            kind: kind.to_owned(),
            exp: expiration as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| e.to_string())
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| e.to_string())
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// Only access tokens pass; refresh tokens are rejected here.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = AuthKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing Authorization header" })),
            ))?;

        if !auth_header.starts_with("Bearer ") {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid Authorization header format" })),
            ));
        }

        let token = &auth_header[7..];
        let claims = keys.decode_token(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or expired token" })),
            )
        })?;

        if claims.kind != TOKEN_KIND_ACCESS {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or expired token" })),
            ));
        }

        let id = claims.sub.parse::<i32>().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or expired token" })),
            )
        })?;

        Ok(AuthUser {
            id,
            username: claims.username,
        })
    }
}
