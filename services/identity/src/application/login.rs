//! 登录服务
//!
//! 凭证协作方与令牌签发之间的编排边界，自身不持有状态。

use std::sync::Arc;

use serde::Serialize;
use signet_auth_core::TokenService;
use tracing::{info, warn};

use crate::domain::credentials::{CredentialError, CredentialVerifier};
use crate::error::AuthError;

/// 一次签发的令牌对
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

pub struct LoginService {
    verifier: Arc<dyn CredentialVerifier>,
    tokens: Arc<TokenService>,
}

impl LoginService {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, tokens: Arc<TokenService>) -> Self {
        Self { verifier, tokens }
    }

    /// 登录：校验凭证，签发访问/刷新令牌对
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let authorities = self
            .verifier
            .verify_credentials(username, password)
            .await
            .map_err(|e| match e {
                CredentialError::Rejected => AuthError::Unauthorized,
                CredentialError::Provider(msg) => {
                    warn!(username = %username, error = %msg, "Credential provider failure");
                    AuthError::AuthenticationFailed
                }
            })?;

        // 主角色写入令牌
        let pair = self.issue_pair(username, authorities.primary())?;

        info!(username = %username, role = %authorities.primary(), "Login succeeded");
        Ok(pair)
    }

    /// 刷新：校验刷新令牌，重新签发一对令牌
    ///
    /// 不做轮换链：旧刷新令牌在自然过期前依然有效。
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .validate_refresh_token(refresh_token)
            .map_err(|e| {
                warn!(error = %e, "Refresh token rejected");
                AuthError::Unauthorized
            })?;

        let pair = self.issue_pair(&claims.sub, &claims.role)?;

        info!(username = %claims.sub, "Token pair refreshed");
        Ok(pair)
    }

    fn issue_pair(&self, subject: &str, role: &str) -> Result<TokenPair, AuthError> {
        let access_token = self
            .tokens
            .generate_access_token(subject, role)
            .map_err(|e| {
                warn!(error = %e, "Access token issuance failed");
                AuthError::AuthenticationFailed
            })?;

        let refresh_token = self
            .tokens
            .generate_refresh_token(subject, role)
            .map_err(|e| {
                warn!(error = %e, "Refresh token issuance failed");
                AuthError::AuthenticationFailed
            })?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.tokens.access_token_expires_in(),
            token_type: "Bearer".to_string(),
        })
    }
}
