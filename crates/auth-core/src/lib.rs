//! signet-auth-core - 认证核心库
//!
//! JWT Claims 与令牌签发/校验

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use signet_errors::{AppError, AppResult};
use thiserror::Error;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// 令牌校验错误
///
/// 攻击者可控输入的所有解析/签名/过期失败都收敛到这两个变体，
/// 校验路径永不 panic。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// 签名无效、结构损坏或令牌类型不符
    #[error("Malformed token")]
    Malformed,
    /// 签名有效但已过期
    #[error("Token expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed => AppError::unauthorized("Invalid token"),
            TokenError::Expired => AppError::unauthorized("Token expired"),
        }
    }
}

/// JWT Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// 单一角色
    pub role: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Token type (access or refresh)
    #[serde(default)]
    pub token_type: String,
}

impl Claims {
    fn new(subject: &str, role: &str, expires_in_secs: i64, token_type: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            token_type: token_type.to_string(),
        }
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == TOKEN_TYPE_ACCESS
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TOKEN_TYPE_REFRESH
    }
}

/// Token 服务
///
/// 无状态、可 Clone，多线程并发使用无需同步。
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_expires_in: i64,
    refresh_expires_in: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_expires_in: i64, refresh_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_expires_in,
            refresh_expires_in,
        }
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, subject: &str, role: &str) -> AppResult<String> {
        let claims = Claims::new(subject, role, self.access_expires_in, TOKEN_TYPE_ACCESS);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// 生成刷新令牌
    pub fn generate_refresh_token(&self, subject: &str, role: &str) -> AppResult<String> {
        let claims = Claims::new(subject, role, self.refresh_expires_in, TOKEN_TYPE_REFRESH);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {}", e)))
    }

    /// 验证令牌
    ///
    /// 签名校验先于过期检查（`jsonwebtoken::decode` 的契约）：
    /// 被篡改的载荷在读取 exp 之前就会失败，伪造的未来过期时间无效。
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0; // 不允许时间偏差

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;

        Ok(token_data.claims)
    }

    /// 验证访问令牌（确保是 access token）
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;

        if !claims.is_access_token() {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }

    /// 验证刷新令牌（确保是 refresh token）
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;

        if !claims.is_refresh_token() {
            return Err(TokenError::Malformed);
        }

        Ok(claims)
    }

    /// 令牌是否已过期
    ///
    /// 基于 `validate`：被篡改的令牌返回 `Err(Malformed)`，
    /// 绝不静默地当作"未过期"。
    pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
        match self.validate(token) {
            Ok(_) => Ok(false),
            Err(TokenError::Expired) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// 提取令牌主体
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.validate(token).map(|claims| claims.sub)
    }

    /// 获取访问令牌过期时间（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_expires_in
    }

    /// 获取刷新令牌过期时间（秒）
    pub fn refresh_token_expires_in(&self) -> i64 {
        self.refresh_expires_in
    }
}
