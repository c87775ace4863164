/*!
 * Request-scoped security context
 *
 * Responsibility:
 * - 「このリクエストは誰か」を保持する (最大 1 つの Authentication)
 * - request extensions に載せて call chain を通す (グローバル/thread-local は使わない)
 *
 * Public API:
 * - SecurityContext
 * - Authentication / AuthenticationDetails
 */
mod context;

pub use context::{Authentication, AuthenticationDetails, SecurityContext};
