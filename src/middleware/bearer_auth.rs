/*
 * Responsibility
 * - Authorization ヘッダ値から Bearer トークンを取り出す (純粋関数)
 * - 検証・拒否はしない (それは filter / 下流の責務)
 */

/// Scheme prefix, trailing space included. Matching is case-sensitive.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Strip the `Bearer ` prefix from a raw `Authorization` header value.
///
/// Returns `None` when the header is absent or uses another scheme.
/// `"Bearer "` alone yields `Some("")`; the empty token is rejected later, at decode time.
pub fn extract_bearer_token(header_value: Option<&str>) -> Option<&str> {
    header_value?.strip_prefix(BEARER_PREFIX)
}
