// src/extractors.rs

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    config::Config,
    utils::jwt::{Claims, bearer_token, verify_jwt},
};

/// Identity for routes that also serve anonymous callers.
///
/// A missing, malformed or expired token yields `MaybeUser(None)` instead of a
/// rejection; the handler decides what anonymity means.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Claims>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().and_then(|claims| claims.user_id().ok())
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        let claims = bearer_token(&parts.headers)
            .and_then(|token| verify_jwt(token, &config.jwt_secret).ok());
        Ok(MaybeUser(claims))
    }
}
