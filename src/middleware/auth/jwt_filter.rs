//! Bearer JWT → SecurityContext を確立する認証フィルタ
//!
//! 1 リクエストにつき 1 回だけ走る middleware:
//! - `Authorization: Bearer <jwt>` からトークンを取り出す
//! - username を decode する (失敗は log して匿名扱い)
//! - context が空のときだけ user を引き、token がその user に有効か確認する
//! - 有効なら Authentication を SecurityContext に載せる
//!
//! どの分岐でも後続は必ず 1 回呼ぶ。拒否 (401/403) は下流の責務。
//! 例外は user directory の失敗のみで、これはエラーとして上に返す。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Extensions, HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::bearer_auth::extract_bearer_token;
use crate::security::{Authentication, AuthenticationDetails, SecurityContext};
use crate::services::auth::TokenValidator;
use crate::services::directory::DirectoryError;
use crate::state::AppState;

/// Register the authentication filter on every route of `router`.
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::jwt_filter::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(
        state,
        jwt_authentication_filter,
    ))
}

async fn jwt_authentication_filter(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // An earlier layer may already have established an identity.
    let mut ctx = req
        .extensions_mut()
        .remove::<SecurityContext>()
        .unwrap_or_default();

    if let Err(err) = authenticate(&state, req.headers(), req.extensions(), &mut ctx).await {
        tracing::error!(error = %err, "user lookup failed for a decodable token");
        return Err(err.into());
    }

    // middleware → extractor への受け渡し (匿名でも空の context を載せる)
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    extensions: &Extensions,
    ctx: &mut SecurityContext,
) -> Result<(), DirectoryError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(token) = extract_bearer_token(raw) else {
        return Ok(());
    };

    let Some(username) = resolve_claimed_identity(state.tokens.as_ref(), token) else {
        return Ok(());
    };

    // first successful authentication wins
    if ctx.is_authenticated() {
        return Ok(());
    }

    if let Some(authentication) = validate_identity(state, &username, token).await? {
        let details = AuthenticationDetails::from_request(headers, extensions);
        publish_authentication(ctx, authentication, details);
    }

    Ok(())
}

/// Decode the username claim, turning every decode failure into `None`.
pub fn resolve_claimed_identity(tokens: &dyn TokenValidator, token: &str) -> Option<String> {
    match tokens.decode_username(token) {
        Ok(username) => Some(username),
        Err(err) => {
            tracing::error!(token = %token, error = %err, "failed to read username from token");
            None
        }
    }
}

/// Load the claimed user and confirm the token is valid for that user.
///
/// A directory failure is returned as-is; an invalid token is `Ok(None)`.
pub async fn validate_identity(
    state: &AppState,
    username: &str,
    token: &str,
) -> Result<Option<Authentication>, DirectoryError> {
    let user = state.users.load_by_username(username).await?;

    if !state.tokens.is_valid_for(token, &user) {
        tracing::debug!(username = %user.username, "token is not valid for user");
        return Ok(None);
    }

    Ok(Some(Authentication::new(user)))
}

/// Commit `authentication` into the context with the request's details.
///
/// The caller guarantees the context was empty.
pub fn publish_authentication(
    ctx: &mut SecurityContext,
    authentication: Authentication,
    details: AuthenticationDetails,
) {
    let authentication = authentication.with_details(details);
    tracing::debug!(username = %authentication.username(), "authenticated request");
    ctx.set_authentication(authentication);
}
