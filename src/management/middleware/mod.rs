//! # 管理服务器中间件

pub mod auth;

pub use auth::{extract_bearer_token, require_bearer_secret, secrets_match, verify_secret};
