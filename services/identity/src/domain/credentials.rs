//! 凭证校验端口

use thiserror::Error;

/// 凭证校验错误
#[derive(Debug, Error)]
pub enum CredentialError {
    /// 用户名或密码错误（不区分具体是哪个）
    #[error("Credentials rejected")]
    Rejected,

    /// 凭证提供方故障（非凭证本身的问题）
    #[error("Credential provider error: {0}")]
    Provider(String),
}

/// 授权集合
///
/// 非空、有序；第一个条目为主角色，写入令牌。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoritySet(Vec<String>);

impl AuthoritySet {
    /// 构造授权集合，空集合无效
    pub fn new(authorities: Vec<String>) -> Option<Self> {
        if authorities.is_empty() {
            None
        } else {
            Some(Self(authorities))
        }
    }

    /// 单一授权的集合
    pub fn single(authority: impl Into<String>) -> Self {
        Self(vec![authority.into()])
    }

    /// 主角色（第一个授权）
    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// 凭证存储协作方接口
///
/// 密码哈希比对在实现方完成；本服务只拿到校验结论。
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthoritySet, CredentialError>;
}
