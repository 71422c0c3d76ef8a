use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// 估价错误
#[derive(Debug, Error)]
pub enum EstimateError {
    /// 输入配置无法解析或缺少基础字段
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// 费率表缺少被引用的条目 (数据缺陷，不应在完整费率表上出现)
    #[error("missing rate for {category}/{item} at {key}")]
    MissingRate {
        category: &'static str,
        item: String,
        key: String,
    },
}

/// 费率表加载错误，启动或管理员替换时出现
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("failed to read rate table '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("rate table JSON invalid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rate table incomplete: {0}")]
    Incomplete(#[from] EstimateError),
}

/// OTP 流程错误
#[derive(Debug, Error)]
pub enum OtpError {
    #[error("invalid phone number")]
    InvalidPhone,

    #[error("please wait {retry_after_secs}s before requesting a new code")]
    Cooldown { retry_after_secs: i64 },

    #[error("no pending code for this number")]
    NotRequested,

    #[error("code expired, request a new one")]
    Expired,

    #[error("incorrect code, {remaining} attempts left")]
    InvalidCode { remaining: u32 },

    #[error("too many incorrect attempts, try again later")]
    LockedOut,

    #[error("failed to deliver code: {0}")]
    Delivery(String),
}

/// 估价单导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv flush failed: {0}")]
    Flush(String),
}

/// HTTP 层错误，统一输出 `{ success: false, error }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    RateTable(#[from] RateTableError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Estimate(EstimateError::Configuration(_)) => StatusCode::BAD_REQUEST,
            Self::Estimate(EstimateError::MissingRate { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Otp(err) => match err {
                OtpError::InvalidPhone | OtpError::NotRequested => StatusCode::BAD_REQUEST,
                OtpError::Cooldown { .. } | OtpError::LockedOut => StatusCode::TOO_MANY_REQUESTS,
                OtpError::Expired => StatusCode::GONE,
                OtpError::InvalidCode { .. } => StatusCode::UNAUTHORIZED,
                OtpError::Delivery(_) => StatusCode::BAD_GATEWAY,
            },
            Self::RateTable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的文案，数据缺陷不暴露细节
    fn public_message(&self) -> String {
        match self {
            Self::Estimate(EstimateError::MissingRate { .. })
            | Self::Export(_)
            | Self::Internal(_) => {
                "estimate could not be computed".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected ({}): {}", status, self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}
