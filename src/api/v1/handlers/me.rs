/*
 * Responsibility
 * - GET /me : 認証済み主体 (username / authorities) を返す
 * - 匿名なら extractor が 401
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::Authenticated;
use crate::models::Authority;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub authorities: Vec<Authority>,
}

pub async fn me(Authenticated(auth): Authenticated) -> Json<MeResponse> {
    let user = auth.principal();
    Json(MeResponse {
        id: user.id,
        username: user.username.clone(),
        authorities: auth.authorities().to_vec(),
    })
}
