//! 会话端点：登录、登出、刷新

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use signet_errors::AppError;
use tracing::{info, warn};

use super::{AppState, MessageResponse};
use crate::application::login::TokenPair;
use crate::infrastructure::cookies;
use crate::infrastructure::middleware::Principal;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub role: String,
}

/// 登录：凭证换令牌对，写入两个会话 cookie
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let pair = state.login.login(&req.username, &req.password).await?;
    let headers = session_headers(&state, &pair)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponse {
            message: "Login successful".to_string(),
        }),
    )
        .into_response())
}

/// 登出
///
/// 无论令牌有效、过期、损坏还是缺失都必须成功并清除 cookie；
/// 主体提取只为审计消息，解析失败一律吞掉。
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let subject = cookies::access_token(&headers).and_then(|token| {
        match state.tokens.extract_subject(&token) {
            Ok(subject) => Some(subject),
            Err(e) => {
                warn!(error = %e, "Ignoring unparseable access token during logout");
                None
            }
        }
    });

    let mut response_headers = HeaderMap::new();
    cookies::clear_session(&mut response_headers);

    let message = match subject {
        Some(subject) => {
            info!(subject = %subject, "User logged out");
            format!("{} logged out", subject)
        }
        None => {
            info!("Logged out (no user information)");
            "Logged out".to_string()
        }
    };

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse { message }),
    )
        .into_response()
}

/// 刷新：用刷新令牌 cookie 换一对新令牌
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = cookies::refresh_token(&headers)
        .ok_or_else(|| AppError::unauthorized("Missing refresh token"))?;

    let pair = state.login.refresh(&token)?;
    let response_headers = session_headers(&state, &pair)?;

    Ok((
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "Token refreshed".to_string(),
        }),
    )
        .into_response())
}

/// 当前用户（需要已认证主体）
pub async fn current_user(Principal(principal): Principal) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        username: principal.subject,
        role: principal.role,
    })
}

fn session_headers(state: &AppState, pair: &TokenPair) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    cookies::write_session(
        &mut headers,
        &pair.access_token,
        pair.expires_in,
        &pair.refresh_token,
        state.tokens.refresh_token_expires_in(),
    )
    .map_err(|e| AppError::internal(format!("Failed to build session cookies: {}", e)))?;
    Ok(headers)
}
