use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::{Authentication, SecurityContext};

/// Handler で、 Authentication を受け取るための extractor
/// filter が SecurityContext を request.extensions() に insert 済みである前提
/// 見つからない・匿名の場合は 401 を返す
#[derive(Debug, Clone)]
pub struct Authenticated(pub Authentication);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .and_then(SecurityContext::get_authentication)
            .cloned()
            .map(Authenticated)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::models::UserRecord;

    async fn extract(ctx: Option<SecurityContext>) -> Result<Authenticated, AppError> {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        let (mut parts, _) = req.into_parts();
        Authenticated::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn yields_established_identity() {
        let auth = Authentication::new(UserRecord::new(1, "alice", Vec::new()));
        let Authenticated(found) = extract(Some(SecurityContext::authenticated(auth)))
            .await
            .unwrap();
        assert_eq!(found.username(), "alice");
    }

    #[tokio::test]
    async fn anonymous_context_is_rejected() {
        let err = extract(Some(SecurityContext::default())).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn missing_context_is_rejected() {
        let err = extract(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
