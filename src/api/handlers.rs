use crate::api::auth::VerifiedPhone;
use crate::api::AppState;
use crate::error::{ApiError, EstimateError, RateTableError};
use crate::export::document_to_csv;
use crate::models::{EstimateDocument, ProjectConfiguration, PublicEstimate};
use crate::otp::phone::mask_phone;
use crate::otp::{AccessGrant, CodeIssued};
use crate::rates::RateTable;
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// 请求体: 手机号
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

/// 请求体: 手机号 + 验证码
#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

/// 估价响应体: 只含区间
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    #[serde(flatten)]
    pub estimate: PublicEstimate,
}

#[derive(Debug, Serialize)]
pub struct OtpRequestResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub issued: CodeIssued,
}

#[derive(Debug, Serialize)]
pub struct OtpVerifyResponse {
    pub success: bool,
    #[serde(flatten)]
    pub grant: AccessGrant,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub success: bool,
    pub document: EstimateDocument,
}

#[derive(Debug, Serialize)]
pub struct RatesReplacedResponse {
    pub success: bool,
    pub version: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 配置解析失败统一按输入错误处理
fn parse_configuration(
    payload: Result<Json<ProjectConfiguration>, JsonRejection>,
) -> Result<ProjectConfiguration, ApiError> {
    payload
        .map(|Json(config)| config)
        .map_err(|rejection| EstimateError::Configuration(rejection.body_text()).into())
}

/// OTP 请求体解析失败同样返回 `{ success: false, error }`
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// 估价接口: 返回分类区间 + 总价区间
pub async fn compute_estimate(
    State(state): State<AppState>,
    payload: Result<Json<ProjectConfiguration>, JsonRejection>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let config = parse_configuration(payload)?;
    let estimate = state.estimator.public_estimate(&config)?;

    Ok(Json(EstimateResponse {
        success: true,
        estimate,
    }))
}

/// 申请验证码
pub async fn request_otp(
    State(state): State<AppState>,
    payload: Result<Json<OtpRequest>, JsonRejection>,
) -> Result<Json<OtpRequestResponse>, ApiError> {
    let req = parse_body(payload)?;
    let issued = state.otp.request_code(&req.phone)?;
    Ok(Json(OtpRequestResponse {
        success: true,
        message: "verification code sent".to_string(),
        issued,
    }))
}

/// 校验验证码，成功后签发估价单访问令牌
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<OtpVerifyRequest>, JsonRejection>,
) -> Result<Json<OtpVerifyResponse>, ApiError> {
    let req = parse_body(payload)?;
    let grant = state.otp.verify_code(&req.phone, &req.code)?;
    Ok(Json(OtpVerifyResponse {
        success: true,
        grant,
    }))
}

/// 估价单 (JSON)
pub async fn estimate_document(
    State(state): State<AppState>,
    Extension(VerifiedPhone(phone)): Extension<VerifiedPhone>,
    payload: Result<Json<ProjectConfiguration>, JsonRejection>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let config = parse_configuration(payload)?;
    let document = state.estimator.document(&config)?;
    tracing::info!(
        "Estimate document issued to {}: {} lines",
        mask_phone(&phone),
        document.lines.len()
    );

    Ok(Json(DocumentResponse {
        success: true,
        document,
    }))
}

/// 估价单 (CSV 下载)
pub async fn estimate_document_csv(
    State(state): State<AppState>,
    Extension(VerifiedPhone(phone)): Extension<VerifiedPhone>,
    payload: Result<Json<ProjectConfiguration>, JsonRejection>,
) -> Result<Response, ApiError> {
    let config = parse_configuration(payload)?;
    let document = state.estimator.document(&config)?;
    let body = document_to_csv(&document)?;
    tracing::info!("Estimate CSV issued to {}", mask_phone(&phone));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"estimate.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// 管理员替换费率表: 整表校验，不完整则原表保持不变
pub async fn replace_rates(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<RatesReplacedResponse>, ApiError> {
    let table = RateTable::from_json_str(&body)?;
    let installed = state
        .estimator
        .rates()
        .replace(table)
        .map_err(RateTableError::from)?;

    Ok(Json(RatesReplacedResponse {
        success: true,
        version: installed.version.clone(),
    }))
}
