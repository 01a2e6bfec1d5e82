//! Authentication and store selection extractors.
//!
//! Callers authenticate with an HS256 bearer token whose `sub` claim is the
//! user ID. Identity is established upstream; this service only verifies the
//! signature and expiry.

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use freshcart_core::{CustomerId, UserId};

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Header carrying the store the shopper selected.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// Bearer token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID of the caller.
    pub sub: String,
    /// Expiry as a Unix timestamp.
    pub exp: usize,
}

/// Extractor that requires an authenticated user.
///
/// Rejects with `401 Unauthorized` when the token is missing, malformed,
/// expired, or signed with another key.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user_id): RequireUser) -> String {
///     user_id.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserId);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let user_id = verify_token(token, state.jwt_key())?;

        // Add user to current span for structured logging
        tracing::Span::current().record("user_id", tracing::field::display(&user_id));
        set_sentry_user(&user_id);

        Ok(Self(user_id))
    }
}

/// Extractor for the store the shopper selected, if any.
///
/// Read from the `customerId` query parameter, then the `X-Customer-Id`
/// header. Blank values count as absent; anything else that is not an
/// integer is rejected with `400 Bad Request`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectedStore(pub Option<CustomerId>);

#[derive(Debug, Default, Deserialize)]
struct StoreQuery {
    #[serde(rename = "customerId")]
    customer_id: Option<String>,
}

impl<S> FromRequestParts<S> for SelectedStore
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<StoreQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let header = parts
            .headers
            .get(CUSTOMER_ID_HEADER)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AppError::BadRequest("X-Customer-Id is not valid text".to_string()))
            })
            .transpose()?;

        let selected = match non_blank(query.customer_id.as_deref()) {
            Some(raw) => Some(parse_customer_id(raw, "customerId")?),
            None => non_blank(header)
                .map(|raw| parse_customer_id(raw, "X-Customer-Id"))
                .transpose()?,
        };

        Ok(Self(selected))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify a bearer token and return the user it was issued to.
fn verify_token(token: &str, key: &DecodingKey) -> Result<UserId, AppError> {
    let data = decode::<Claims>(token, key, &Validation::new(Algorithm::HS256)).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AppError::Unauthorized("invalid or expired token".to_string())
    })?;

    UserId::parse(&data.claims.sub)
        .map_err(|e| AppError::Unauthorized(format!("invalid subject: {e}")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_customer_id(raw: &str, source: &str) -> Result<CustomerId, AppError> {
    raw.parse::<CustomerId>()
        .map_err(|_| AppError::BadRequest(format!("{source} must be an integer")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, Request};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    const SECRET: &[u8] = b"k3y-For-Unit-Tests-0nly-9a8b7c6d5e4f";

    fn token(sub: &str, exp_offset: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset;
        let claims = Claims {
            sub: sub.to_string(),
            exp: usize::try_from(exp).unwrap(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    async fn selected(uri: &str, header: Option<&str>) -> Result<SelectedStore, AppError> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = header {
            builder = builder.header(CUSTOMER_ID_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        SelectedStore::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_verify_token_accepts_valid_token() {
        let key = DecodingKey::from_secret(SECRET);
        let user = verify_token(&token("user-42", 600), &key).unwrap();
        assert_eq!(user.as_str(), "user-42");
    }

    #[test]
    fn test_verify_token_rejects_expired_token() {
        let key = DecodingKey::from_secret(SECRET);
        let result = verify_token(&token("user-42", -3600), &key);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_token_rejects_wrong_key() {
        let key = DecodingKey::from_secret(b"a-different-signing-key-entirely-000");
        let result = verify_token(&token("user-42", 600), &key);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_token_rejects_blank_subject() {
        let key = DecodingKey::from_secret(SECRET);
        let result = verify_token(&token("   ", 600), &key);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_selected_store_absent() {
        let store = selected("/api/products", None).await.unwrap();
        assert_eq!(store.0, None);

        let store = selected("/api/products?customerId=", Some("  ")).await.unwrap();
        assert_eq!(store.0, None);
    }

    #[tokio::test]
    async fn test_selected_store_query_wins_over_header() {
        let store = selected("/api/products?customerId=7", Some("9")).await.unwrap();
        assert_eq!(store.0, Some(CustomerId::new(7)));
    }

    #[tokio::test]
    async fn test_selected_store_from_header() {
        let store = selected("/api/products?page=2", Some("9")).await.unwrap();
        assert_eq!(store.0, Some(CustomerId::new(9)));
    }

    #[tokio::test]
    async fn test_selected_store_rejects_non_integer() {
        let result = selected("/api/products?customerId=abc", None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = selected("/api/products", Some("12x")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
