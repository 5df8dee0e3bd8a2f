//! Bearer-token authorization.
//!
//! Every configured token maps to a [`Role`]. [`authenticate`] resolves the
//! `Authorization` header to a [`Principal`] and [`authorize`] checks that
//! principal against the role a route requires.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::{Principal, Role};
use crate::state::AppState;

/// Authorization failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No credentials, or credentials that match no configured token.
    #[error("missing or invalid bearer token")]
    Unauthorized,

    /// Valid credentials with too little privilege.
    #[error("requires the {required} role")]
    Forbidden { required: Role },
}

/// Resolve the bearer token in `headers` to a principal.
///
/// Every configured token is compared, in constant time, so the response
/// time does not reveal which token matched.
///
/// # Errors
///
/// Returns `AuthError::Unauthorized` if the header is missing, is not a
/// bearer token, or matches no configured token.
pub fn authenticate(auth: &AuthConfig, headers: &HeaderMap) -> Result<Principal, AuthError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Unauthorized)?;

    let mut matched = None;
    for candidate in &auth.tokens {
        let equal: bool = candidate
            .token
            .expose_secret()
            .as_bytes()
            .ct_eq(presented.as_bytes())
            .into();
        if equal && matched.is_none() {
            matched = Some(candidate.role);
        }
    }

    matched.map(Principal::new).ok_or(AuthError::Unauthorized)
}

/// Check that `principal` holds at least `required`.
///
/// # Errors
///
/// Returns `AuthError::Unauthorized` for an anonymous caller and
/// `AuthError::Forbidden` for one whose role is too low.
pub fn authorize(principal: Option<Principal>, required: Role) -> Result<Principal, AuthError> {
    let principal = principal.ok_or(AuthError::Unauthorized)?;
    if principal.has_role(required) {
        Ok(principal)
    } else {
        Err(AuthError::Forbidden { required })
    }
}

/// Extractor that requires an admin token.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(RequireAdmin(actor): RequireAdmin) -> impl IntoResponse {
///     format!("acting as {}", actor.role)
/// }
/// ```
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = authenticate(state.auth(), &parts.headers).ok();
        let principal = authorize(principal, Role::Admin)?;

        tracing::Span::current().record("role", tracing::field::display(principal.role));
        Ok(Self(principal))
    }
}
