use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    pub otp: OtpConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesConfig {
    /// JSON 费率表路径，未设置时使用内置费率表
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    pub code_length: u32,
    pub ttl_seconds: u64,
    pub resend_cooldown_seconds: u64,
    pub max_attempts: u32,
    pub token_ttl_seconds: u64,
    pub purge_interval_seconds: u64,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 为空时管理接口不可用
    #[serde(default)]
    pub api_key: Option<String>,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_seconds: 300,
            resend_cooldown_seconds: 30,
            max_attempts: 5,
            token_ttl_seconds: 1800,
            purge_interval_seconds: 60,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            rates: RatesConfig::default(),
            otp: OtpConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 → estimator.toml (可选) → 环境变量 ESTIMATOR__SECTION__KEY
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("estimator")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let cfg: AppConfig = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("otp.code_length", defaults.otp.code_length as i64)?
            .set_default("otp.ttl_seconds", defaults.otp.ttl_seconds as i64)?
            .set_default(
                "otp.resend_cooldown_seconds",
                defaults.otp.resend_cooldown_seconds as i64,
            )?
            .set_default("otp.max_attempts", defaults.otp.max_attempts as i64)?
            .set_default("otp.token_ttl_seconds", defaults.otp.token_ttl_seconds as i64)?
            .set_default(
                "otp.purge_interval_seconds",
                defaults.otp.purge_interval_seconds as i64,
            )?
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix("ESTIMATOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=8).contains(&self.otp.code_length) {
            return Err(ConfigError::Message(
                "otp.code_length must be between 4 and 8".to_string(),
            ));
        }
        if self.otp.max_attempts == 0 {
            return Err(ConfigError::Message("otp.max_attempts must be at least 1".to_string()));
        }
        if self.otp.ttl_seconds == 0 || self.otp.token_ttl_seconds == 0 {
            return Err(ConfigError::Message("otp TTLs must be positive".to_string()));
        }
        if self.otp.purge_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "otp.purge_interval_seconds must be positive".to_string(),
            ));
        }
        if matches!(&self.admin.api_key, Some(key) if key.trim().is_empty()) {
            return Err(ConfigError::Message("admin.api_key cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_file() {
        let cfg = AppConfig::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.otp.code_length, 6);
        assert_eq!(cfg.otp.max_attempts, 5);
        assert!(cfg.rates.path.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_otp_settings() {
        let mut cfg = AppConfig::default();
        cfg.otp.code_length = 2;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.otp.max_attempts = 0;
        assert!(cfg.validate().unwrap_err().to_string().contains("max_attempts"));

        let mut cfg = AppConfig::default();
        cfg.admin.api_key = Some("  ".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_admin_key_redacted_in_debug() {
        let mut cfg = AppConfig::default();
        cfg.admin.api_key = Some("secret-admin-key".to_string());
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("secret-admin-key"));
        assert!(printed.contains("***"));
    }
}
