use interior_estimator::otp::{LogSender, OtpService, OtpSettings};
use interior_estimator::rates::defaults;
use interior_estimator::{api, AppConfig, AppState, EstimatorService, RateStore, RateTable};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = Arc::new(AppConfig::load()?);
    info!("Starting server with config: {:?}", config);

    // 加载费率表: 指定文件优先，否则使用内置费率表
    let table = match &config.rates.path {
        Some(path) => RateTable::from_path(Path::new(path))?,
        None => defaults::builtin(),
    };
    let rates = Arc::new(RateStore::new(table)?);

    // 创建服务
    let estimator = Arc::new(EstimatorService::new(rates));
    let otp = Arc::new(OtpService::new(
        OtpSettings::from(&config.otp),
        Arc::new(LogSender),
    ));

    // 定期清理过期验证码与令牌
    let purge_otp = otp.clone();
    let purge_every = Duration::from_secs(config.otp.purge_interval_seconds);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_every);
        loop {
            ticker.tick().await;
            let purged = purge_otp.purge_expired();
            if purged > 0 {
                info!("Purged {} expired OTP records", purged);
            }
        }
    });

    if config.admin.api_key.is_none() {
        info!("admin.api_key not set, rate replacement endpoint disabled");
    }

    // 构建路由
    let app = api::router(AppState {
        estimator,
        otp,
        config: config.clone(),
    });

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/estimate              - category and total ranges");
    info!("  POST /api/otp/request           - send verification code");
    info!("  POST /api/otp/verify            - verify code, issue token");
    info!("  POST /api/estimate/document     - itemised estimate (token)");
    info!("  POST /api/estimate/document.csv - itemised estimate as CSV (token)");
    info!("  PUT  /api/admin/rates           - replace rate table (admin key)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
