/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - tokens: TokenValidator, users: UserDirectory
 * - Clone 前提で持つ (内部は Arc)
 * - リクエストごとの状態 (SecurityContext) はここに置かない
 */
use std::sync::Arc;

use crate::services::{auth::TokenValidator, directory::UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<dyn TokenValidator>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    pub fn new(tokens: Arc<dyn TokenValidator>, users: Arc<dyn UserDirectory>) -> Self {
        Self { tokens, users }
    }
}
