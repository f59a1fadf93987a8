//! 服务错误定义

use crate::domain::verification::VerificationError;
use signet_errors::AppError;
use thiserror::Error;

/// 登录/刷新错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 凭证被拒绝（不泄露用户名与密码哪个错误）
    #[error("Invalid username or password")]
    Unauthorized,

    /// 认证提供方故障，与凭证错误区分以便不同的客户端提示
    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => AppError::unauthorized("Invalid username or password"),
            AuthError::AuthenticationFailed => AppError::unauthenticated("Authentication failed"),
        }
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        // 三种失败对调用方可区分
        AppError::validation(err.to_string())
    }
}
