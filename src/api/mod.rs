pub mod auth;
pub mod handlers;

use crate::config::AppConfig;
use crate::otp::OtpService;
use crate::service::EstimatorService;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::{
    compute_estimate, estimate_document, estimate_document_csv, health_check, replace_rates,
    request_otp, verify_otp,
};

/// 共享状态：估价服务 + OTP 服务 + 配置
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<EstimatorService>,
    pub otp: Arc<OtpService>,
    pub config: Arc<AppConfig>,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    // 估价单: 需先通过手机验证
    let document_routes = Router::new()
        .route("/api/estimate/document", post(handlers::estimate_document))
        .route("/api/estimate/document.csv", post(handlers::estimate_document_csv))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_verified_phone,
        ));

    // 费率表替换: 管理员密钥
    let admin_routes = Router::new()
        .route("/api/admin/rates", put(handlers::replace_rates))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/estimate", post(handlers::compute_estimate))
        .route("/api/otp/request", post(handlers::request_otp))
        .route("/api/otp/verify", post(handlers::verify_otp))
        .merge(document_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
