use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// 通过 OTP 验证的手机号，注入到请求扩展中
#[derive(Debug, Clone)]
pub struct VerifiedPhone(pub String);

/// 估价单接口鉴权: Bearer 令牌须来自 /api/otp/verify 且未过期
pub async fn require_verified_phone(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;

    let phone = state
        .otp
        .authorize(token)
        .ok_or_else(|| ApiError::Unauthorized("phone verification required".to_string()))?;

    req.extensions_mut().insert(VerifiedPhone(phone));
    Ok(next.run(req).await)
}

/// 管理接口鉴权: 未配置密钥时一律拒绝
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state
        .config
        .admin
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("admin access disabled".to_string()))?;

    let token = bearer_token(&req)?;
    if !bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(ApiError::Unauthorized("invalid admin key".to_string()));
    }

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;
    extract_bearer_token(header)
}

/// 从 Authorization 头中取出 Bearer 令牌
pub fn extract_bearer_token(header: &str) -> Result<&str, ApiError> {
    const BEARER_PREFIX: &str = "Bearer ";

    let token = header.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        ApiError::Unauthorized("Authorization header must use Bearer scheme".to_string())
    })?;

    if token.trim().is_empty() {
        return Err(ApiError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token.trim())
}
