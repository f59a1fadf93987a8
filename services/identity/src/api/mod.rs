//! HTTP API

pub mod health;
pub mod session;
pub mod verification;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Router, middleware};
use serde::Serialize;
use signet_auth_core::TokenService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::login::LoginService;
use crate::application::verification::VerificationService;
use crate::infrastructure::middleware::authenticate;

/// 服务共享状态
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub login: Arc<LoginService>,
    pub verification: Arc<VerificationService>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 组装路由
///
/// 认证中间件包裹全部路由，保证每个请求恰好经过一次、
/// 先于任何处理器。
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(session::login))
        .route("/api/auth/logout", post(session::logout))
        .route("/api/auth/refresh", post(session::refresh))
        .route("/api/auth/email/code", post(verification::request_code))
        .route("/api/auth/email/verify", post(verification::verify_code))
        .route("/api/me", get(session::current_user))
        .route("/health", get(health::health))
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            authenticate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
