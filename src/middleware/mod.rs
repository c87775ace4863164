/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::jwt_filter::apply(...), http::apply(...)
 */
pub mod auth;
pub mod bearer_auth;
pub mod http;
