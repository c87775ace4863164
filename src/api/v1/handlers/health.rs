/*
 * Responsibility
 * - GET /health (疎通用)
 * - 認証不要 (filter は通るが、匿名でもそのまま返す)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
