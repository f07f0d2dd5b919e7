// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Callables accept anonymous requests; each handler decides what it
//! requires. A request that does present a bearer token must present a
//! valid one.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Elevated privilege claim
    #[serde(default)]
    pub admin: bool,
}

/// Authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub admin: bool,
}

/// The caller of a request, if it authenticated.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<AuthUser>);

impl Caller {
    /// The authenticated user, or `UNAUTHENTICATED`.
    pub fn require(self) -> Result<AuthUser, AppError> {
        self.0.ok_or(AppError::Unauthenticated)
    }

    /// The authenticated user if it carries the admin claim.
    pub fn require_admin(self, message: &str) -> Result<AuthUser, AppError> {
        match self.0 {
            Some(user) if user.admin => Ok(user),
            _ => Err(AppError::PermissionDenied(message.to_string())),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(parts.extensions.get::<AuthUser>().cloned()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Verify a bearer token and return the user it names.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Result<AuthUser, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::Unauthenticated)?;

    if token_data.claims.sub.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    Ok(AuthUser {
        user_id: token_data.claims.sub,
        admin: token_data.claims.admin,
    })
}

/// Middleware that attaches the caller's identity when a bearer token is
/// present. An invalid token is rejected outright.
pub async fn identify_caller(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(request.headers()) {
        let auth_user = verify_jwt(token, &state.config.jwt_signing_key)?;
        request.extensions_mut().insert(auth_user);
    }

    Ok(next.run(request).await)
}

/// Create a JWT for a user.
pub fn create_jwt(user_id: &str, admin: bool, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + 60 * 60, // 1 hour
        admin,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
