//! 内存用户目录
//!
//! 配置种子驱动的凭证存储实现，密码为 argon2 PHC 哈希。

use std::collections::HashMap;

use argon2::password_hash::Error as HashError;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use signet_config::UserSeed;
use tracing::warn;

use crate::domain::credentials::{AuthoritySet, CredentialError, CredentialVerifier};

struct UserRecord {
    password_hash: String,
    authorities: AuthoritySet,
}

pub struct InMemoryUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserDirectory {
    /// 从配置种子构建目录；授权为空的种子补默认角色
    pub fn from_seed(seed: &[UserSeed]) -> Self {
        let users = seed
            .iter()
            .map(|user| {
                let authorities = AuthoritySet::new(user.authorities.clone())
                    .unwrap_or_else(|| {
                        warn!(username = %user.username, "Seed user has no authorities, defaulting to ROLE_USER");
                        AuthoritySet::single("ROLE_USER")
                    });

                (
                    user.username.clone(),
                    UserRecord {
                        password_hash: user.password_hash.clone(),
                        authorities,
                    },
                )
            })
            .collect();

        Self { users }
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for InMemoryUserDirectory {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthoritySet, CredentialError> {
        // 未知用户与密码错误同样处理，不泄露账号是否存在
        let record = self
            .users
            .get(username)
            .ok_or(CredentialError::Rejected)?;

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| CredentialError::Provider(format!("Corrupt password hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(record.authorities.clone()),
            Err(HashError::Password) => Err(CredentialError::Rejected),
            Err(e) => Err(CredentialError::Provider(e.to_string())),
        }
    }
}
