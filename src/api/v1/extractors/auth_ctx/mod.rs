/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - filter が確立した Authentication を handler に提供する
 * - 匿名リクエストはここで 401 (filter 自体は拒否しない)
 *
 * Public API:
 * - Authenticated
 */

mod core;

pub use self::core::Authenticated;
