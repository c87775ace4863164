/*
 * Responsibility
 * - モジュール構成の公開 (binary と tests/ から同じ crate を使う)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;
pub mod state;
