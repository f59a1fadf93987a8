//! 邮箱验证端点

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use signet_errors::AppError;

use super::{AppState, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct EmailCodeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailVerifyRequest {
    pub email: String,
    pub code: String,
}

/// 申请验证码：签发并投递
pub async fn request_code(
    State(state): State<AppState>,
    Json(req): Json<EmailCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.verification.request_code(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent".to_string(),
    }))
}

/// 校验验证码
pub async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<EmailVerifyRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.verification.verify_code(&req.email, &req.code)?;

    Ok(Json(MessageResponse {
        message: "Email verified".to_string(),
    }))
}
