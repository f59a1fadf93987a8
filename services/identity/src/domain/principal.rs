//! 认证主体

use signet_auth_core::Claims;

/// 请求作用域内的已认证身份
///
/// 每次令牌校验成功后重新构造，随请求结束丢弃，从不持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub subject: String,
    pub role: String,
}

impl From<&Claims> for AuthenticatedPrincipal {
    fn from(claims: &Claims) -> Self {
        Self {
            subject: claims.sub.clone(),
            role: claims.role.clone(),
        }
    }
}
