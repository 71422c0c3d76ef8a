pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod otp;
pub mod rates;
pub mod service;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use error::{ApiError, EstimateError};
pub use rates::{RateStore, RateTable};
pub use service::EstimatorService;
