use crate::error::OtpError;
use crate::otp::phone::mask_phone;

/// 验证码投递通道 (WhatsApp 模板消息、短信等)
pub trait OtpSender: Send + Sync {
    fn send(&self, phone: &str, code: &str) -> Result<(), OtpError>;
}

/// 开发环境投递: 只写日志
pub struct LogSender;

impl OtpSender for LogSender {
    fn send(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        tracing::info!("OTP for {}: {}", mask_phone(phone), code);
        Ok(())
    }
}
