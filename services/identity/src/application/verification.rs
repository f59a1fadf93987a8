//! 邮箱验证服务
//!
//! 串联 issue → deliver：存储只管验证码，投递交给邮件协作方。

use std::str::FromStr;
use std::sync::Arc;

use email_address::EmailAddress;
use signet_adapter_email::EmailSender;
use signet_errors::{AppError, AppResult};
use tracing::{debug, info};

use crate::domain::verification::{VerificationError, VerificationStore};

pub struct VerificationService {
    store: Arc<VerificationStore>,
    email_sender: Arc<dyn EmailSender>,
}

impl VerificationService {
    pub fn new(store: Arc<VerificationStore>, email_sender: Arc<dyn EmailSender>) -> Self {
        Self {
            store,
            email_sender,
        }
    }

    /// 签发验证码并通过邮件投递
    pub async fn request_code(&self, email: &str) -> AppResult<()> {
        EmailAddress::from_str(email)
            .map_err(|_| AppError::validation("Invalid email address"))?;

        debug!(email = %email, "Issuing verification code");

        let code = self.store.issue(email);
        let minutes = self.store.window().num_minutes();

        let subject = "Email verification code";
        let body = format!(
            "Your verification code is {}. It expires in {} minutes.\n\n\
             If you did not request this code, you can ignore this message.",
            code, minutes
        );

        // 条目先落库再投递：投递失败的孤儿条目随窗口过期或被重发覆盖
        self.email_sender.send_text_email(email, subject, &body).await?;

        info!(email = %email, "Verification code sent");
        Ok(())
    }

    /// 校验验证码
    ///
    /// 三种失败（未申请/过期/不匹配）原样交给调用方做用户提示。
    pub fn verify_code(&self, email: &str, code: &str) -> Result<(), VerificationError> {
        let result = self.store.verify(email, code);

        match &result {
            Ok(()) => info!(email = %email, "Email verified"),
            Err(e) => debug!(email = %email, error = %e, "Verification attempt failed"),
        }

        result
    }

    /// 在途验证码数量（健康检查用）
    pub fn pending(&self) -> usize {
        self.store.pending()
    }
}
