pub mod phone;
pub mod sender;
pub mod service;

pub use phone::normalize_phone;
pub use sender::{LogSender, OtpSender};
pub use service::{AccessGrant, CodeIssued, OtpService, OtpSettings};
