//! 会话 Cookie 传输
//!
//! 线缆格式固定：访问令牌写入 `Authorization` cookie，值带 `Bearer `
//! 前缀；刷新令牌写入 `RefreshToken` cookie，值为裸令牌。
//! 两者 Path=/、HttpOnly。前缀只在写入时添加、读取时剥离。

use axum::http::header::{COOKIE, InvalidHeaderValue, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

pub const ACCESS_COOKIE: &str = "Authorization";
pub const REFRESH_COOKIE: &str = "RefreshToken";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 写入一对会话 cookie
pub fn write_session(
    headers: &mut HeaderMap,
    access_token: &str,
    access_max_age: i64,
    refresh_token: &str,
    refresh_max_age: i64,
) -> Result<(), InvalidHeaderValue> {
    let access = format!(
        "{}={}{}; Path=/; HttpOnly; Max-Age={}",
        ACCESS_COOKIE, BEARER_PREFIX, access_token, access_max_age
    );
    let refresh = format!(
        "{}={}; Path=/; HttpOnly; Max-Age={}",
        REFRESH_COOKIE, refresh_token, refresh_max_age
    );

    headers.append(SET_COOKIE, HeaderValue::from_str(&access)?);
    headers.append(SET_COOKIE, HeaderValue::from_str(&refresh)?);
    Ok(())
}

/// 清除两个会话 cookie：空值 + Max-Age=0，客户端立即失效
pub fn clear_session(headers: &mut HeaderMap) {
    for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
        let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", name);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.append(SET_COOKIE, value);
        }
    }
}

/// 从请求头解析指定 cookie 的值
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

/// 读取访问令牌：取 `Authorization` cookie 并剥离 Bearer 前缀
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let value = cookie_value(headers, ACCESS_COOKIE)?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// 读取刷新令牌（裸值）
pub fn refresh_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, REFRESH_COOKIE).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_write_session_sets_both_cookies() {
        let mut headers = HeaderMap::new();
        write_session(&mut headers, "aaa.bbb.ccc", 3600, "ddd.eee.fff", 1_209_600).unwrap();

        let cookies: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(
            cookies[0],
            "Authorization=Bearer aaa.bbb.ccc; Path=/; HttpOnly; Max-Age=3600"
        );
        assert_eq!(
            cookies[1],
            "RefreshToken=ddd.eee.fff; Path=/; HttpOnly; Max-Age=1209600"
        );
    }

    #[test]
    fn test_clear_session_expires_both_cookies() {
        let mut headers = HeaderMap::new();
        clear_session(&mut headers);

        let cookies: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("Authorization=;"));
        assert!(cookies[1].starts_with("RefreshToken=;"));
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[test]
    fn test_access_token_strips_bearer_prefix() {
        let headers = request_headers("Authorization=Bearer aaa.bbb.ccc; Other=x");
        assert_eq!(access_token(&headers).as_deref(), Some("aaa.bbb.ccc"));
    }

    #[test]
    fn test_access_token_without_bearer_marker_is_ignored() {
        let headers = request_headers("Authorization=aaa.bbb.ccc");
        assert_eq!(access_token(&headers), None);
    }

    #[test]
    fn test_missing_cookie_yields_none() {
        let headers = HeaderMap::new();
        assert_eq!(access_token(&headers), None);
        assert_eq!(refresh_token(&headers), None);
    }

    #[test]
    fn test_refresh_token_is_raw_value() {
        let headers = request_headers("RefreshToken=ddd.eee.fff");
        assert_eq!(refresh_token(&headers).as_deref(), Some("ddd.eee.fff"));
    }
}
