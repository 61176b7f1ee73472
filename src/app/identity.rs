//! External identity reference extraction.
//!
//! The upstream identity provider authenticates requests and stamps them with
//! an opaque reference carried as a bearer token. This extractor only lifts
//! the reference off the request; resolution against the store happens in the
//! route guard, once per request.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Optional external identity reference from the Authorization header.
/// Absence is not a rejection here; the guard turns it into Unauthenticated.
#[derive(Debug, Clone)]
pub struct IdentityRef(pub Option<String>);

impl IdentityRef {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for IdentityRef
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self(bearer))
    }
}
