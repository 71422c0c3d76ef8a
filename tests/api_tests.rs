use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use interior_estimator::error::OtpError;
use interior_estimator::otp::{OtpSender, OtpService, OtpSettings};
use interior_estimator::rates::defaults;
use interior_estimator::{router, AppConfig, AppState, EstimatorService, RateStore};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

/// 记录最近一次投递的验证码
#[derive(Default)]
struct CapturingSender {
    last: Mutex<Option<(String, String)>>,
}

impl OtpSender for CapturingSender {
    fn send(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        *self.last.lock().unwrap() = Some((phone.to_string(), code.to_string()));
        Ok(())
    }
}

impl CapturingSender {
    fn last_code(&self) -> String {
        self.last.lock().unwrap().as_ref().unwrap().1.clone()
    }
}

struct TestApp {
    app: Router,
    sender: Arc<CapturingSender>,
    rates: Arc<RateStore>,
}

fn test_app() -> TestApp {
    let mut config = AppConfig::default();
    config.admin.api_key = Some(ADMIN_KEY.to_string());

    let rates = Arc::new(RateStore::new(defaults::builtin()).unwrap());
    let sender = Arc::new(CapturingSender::default());
    let otp = OtpService::new(OtpSettings::from(&config.otp), sender.clone());

    let app = router(AppState {
        estimator: Arc::new(EstimatorService::new(rates.clone())),
        otp: Arc::new(otp),
        config: Arc::new(config),
    });

    TestApp { app, sender, rates }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: String,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, token, body.to_string()).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn false_ceiling_only() -> Value {
    json!({
        "package": "premium",
        "bhk": "3bhk",
        "carpetArea": 1200,
        "singleLine": { "falseCeiling": { "enabled": true } }
    })
}

async fn verified_token(app: &TestApp) -> String {
    let (status, _) = send_json(
        &app.app,
        Method::POST,
        "/api/otp/request",
        None,
        json!({ "phone": "98765 43210" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/otp/verify",
        None,
        json!({ "phone": "9876543210", "code": app.sender.last_code() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app.app, Method::GET, "/health", None, String::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_estimate_returns_ranges_only() {
    let app = test_app();
    let (status, body) =
        send_json(&app.app, Method::POST, "/api/estimate", None, false_ceiling_only()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let single = &body["ranges"]["singleLineItems"];
    assert_eq!(single["low"], 993_600);
    assert_eq!(single["high"], 1_166_400);
    assert_eq!(single["included"], true);

    let total = &body["ranges"]["grandTotal"];
    assert_eq!(total["low"], 993_600);
    assert_eq!(total["high"], 1_166_400);

    assert_eq!(body["ranges"]["kitchen"]["label"], "Not included");
    assert!(body.get("lines").is_none());
    assert!(!body.to_string().contains("900"));
}

#[tokio::test]
async fn test_estimate_rejects_malformed_configuration() {
    let app = test_app();
    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/estimate",
        None,
        json!({ "package": "premium" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("invalid configuration"));
}

#[tokio::test]
async fn test_document_requires_verified_phone() {
    let app = test_app();
    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/estimate/document",
        None,
        false_ceiling_only(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send_json(
        &app.app,
        Method::POST,
        "/api/estimate/document",
        Some("not-a-token"),
        false_ceiling_only(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_otp_then_document() {
    let app = test_app();
    let token = verified_token(&app).await;

    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/estimate/document",
        Some(&token),
        false_ceiling_only(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let document = &body["document"];
    assert_eq!(document["grandTotal"], 1_080_000);
    assert_eq!(document["lines"].as_array().unwrap().len(), 1);
    assert_eq!(document["lines"][0]["specification"], "1200 sqft");
    assert_eq!(document["subtotals"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_otp_code_is_single_use() {
    let app = test_app();
    send_json(
        &app.app,
        Method::POST,
        "/api/otp/request",
        None,
        json!({ "phone": "9876543210" }),
    )
    .await;
    let code = app.sender.last_code();

    let verify = json!({ "phone": "9876543210", "code": code });
    let (first, _) =
        send_json(&app.app, Method::POST, "/api/otp/verify", None, verify.clone()).await;
    let (second, _) = send_json(&app.app, Method::POST, "/api/otp/verify", None, verify).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_otp_resend_cooldown() {
    let app = test_app();
    let request = json!({ "phone": "9876543210" });
    let (first, _) =
        send_json(&app.app, Method::POST, "/api/otp/request", None, request.clone()).await;
    let (second, body) =
        send_json(&app.app, Method::POST, "/api/otp/request", None, request).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_document_csv_download() {
    let app = test_app();
    let token = verified_token(&app).await;

    let (status, bytes) = send(
        &app.app,
        Method::POST,
        "/api/estimate/document.csv",
        Some(&token),
        false_ceiling_only().to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("category,item,package,specification,amount"));
    assert!(csv.contains("1080000"));
    assert!(csv.contains("Not included"));
}

#[tokio::test]
async fn test_admin_replaces_rate_table() {
    let app = test_app();
    let mut table = serde_json::to_value(defaults::builtin()).unwrap();
    table["version"] = json!("2025.1");

    let (status, _) = send(
        &app.app,
        Method::PUT,
        "/api/admin/rates",
        Some("wrong-key"),
        table.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.rates.version(), defaults::BUILTIN_VERSION);

    let (status, body) =
        send_json(&app.app, Method::PUT, "/api/admin/rates", Some(ADMIN_KEY), table).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "2025.1");
    assert_eq!(app.rates.version(), "2025.1");
}

#[tokio::test]
async fn test_admin_rejects_incomplete_table() {
    let app = test_app();
    let mut table = serde_json::to_value(defaults::builtin()).unwrap();
    table["version"] = json!("broken");
    table["addOns"]["sofa"]
        .as_object_mut()
        .unwrap()
        .remove("4bhk");

    let (status, body) =
        send_json(&app.app, Method::PUT, "/api/admin/rates", Some(ADMIN_KEY), table).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(app.rates.version(), defaults::BUILTIN_VERSION);
}

#[tokio::test]
async fn test_otp_malformed_body_uses_error_envelope() {
    let app = test_app();

    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/otp/request",
        None,
        json!({ "mobile": "9876543210" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));

    let (status, body) =
        send(&app.app, Method::POST, "/api/otp/verify", None, "{not json".to_string()).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_document_specification_from_json_floats() {
    let app = test_app();
    let token = verified_token(&app).await;

    let (status, body) = send_json(
        &app.app,
        Method::POST,
        "/api/estimate/document",
        Some(&token),
        json!({
            "package": "premium",
            "bhk": "3bhk",
            "carpetArea": 1200.0,
            "singleLine": {
                "falseCeiling": { "enabled": true },
                "painting": { "enabled": true, "area": 950.5 }
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lines = &body["document"]["lines"];
    assert_eq!(lines[0]["specification"], "1200 sqft");
    assert_eq!(lines[1]["specification"], "950.5 sqft");
    assert_eq!(lines[1]["amount"], 33_268);
}
