//! signet-adapter-email - Email 适配器
//!
//! 验证码的带外投递通道，提供 SMTP 纯文本邮件发送。

mod client;

pub use client::EmailClient;
pub use signet_config::EmailConfig;

use signet_errors::AppResult;

/// 邮件发送接口
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送纯文本邮件
    async fn send_text_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
