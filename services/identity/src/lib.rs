//! signet-identity - 身份认证与一次性验证码服务

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
