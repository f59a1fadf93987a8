//! 认证中间件
//!
//! 每个请求恰好经过一次，且先于任何读取身份的处理器。
//! 失败开放：缺失/无效令牌只记日志并放行为匿名请求，
//! 授权由下游显式检查（`Principal` 提取器）。

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use signet_auth_core::TokenService;
use tracing::{debug, warn};

use crate::domain::principal::AuthenticatedPrincipal;
use crate::infrastructure::cookies;

/// 认证中间件
///
/// 从访问令牌 cookie 还原身份并注入请求扩展。
/// 三值结果（已认证/匿名，绝无拒绝）体现在扩展里有无
/// `AuthenticatedPrincipal` 上，本层永不返回错误响应。
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::access_token(request.headers()) {
        match tokens.validate_access_token(&token) {
            Ok(claims) => {
                let principal = AuthenticatedPrincipal::from(&claims);
                debug!(subject = %principal.subject, role = %principal.role, "Request authenticated");
                request.extensions_mut().insert(principal);
            }
            Err(e) => {
                // 失败开放：记录后继续以匿名身份处理
                warn!(error = %e, "Access token rejected, continuing unauthenticated");
            }
        }
    }

    next.run(request).await
}

/// 已认证主体提取器
///
/// 下游的显式授权检查：扩展中没有主体时拒绝 401。
/// 应该在 `authenticate` 中间件之后使用。
pub struct Principal(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(Principal)
            .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))
    }
}
