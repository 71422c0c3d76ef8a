use crate::config::OtpConfig;
use crate::error::OtpError;
use crate::otp::phone::{mask_phone, normalize_phone};
use crate::otp::sender::OtpSender;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// OTP 规则
#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub code_length: u32,
    pub ttl: Duration,
    pub resend_cooldown: Duration,
    pub max_attempts: u32,
    pub token_ttl: Duration,
}

impl From<&OtpConfig> for OtpSettings {
    fn from(cfg: &OtpConfig) -> Self {
        Self {
            code_length: cfg.code_length,
            ttl: Duration::seconds(cfg.ttl_seconds as i64),
            resend_cooldown: Duration::seconds(cfg.resend_cooldown_seconds as i64),
            max_attempts: cfg.max_attempts,
            token_ttl: Duration::seconds(cfg.token_ttl_seconds as i64),
        }
    }
}

/// 待验证的验证码，只存哈希
#[derive(Debug, Clone)]
struct PendingCode {
    code_hash: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
    locked: bool,
}

#[derive(Debug, Clone)]
struct Grant {
    phone: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeIssued {
    pub phone: String,
    pub expires_in_seconds: i64,
    pub resend_after_seconds: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub token: String,
    pub phone: String,
    pub expires_in_seconds: i64,
}

fn hash_code(phone: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone.as_bytes());
    hasher.update(b":");
    hasher.update(code.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn generate_code(length: u32) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(&random_bytes)
}

/// 手机验证码服务
///
/// 按归一化手机号保存记录: 重发冷却、有效期、错误次数锁定。
/// 验证成功后验证码作废，并签发短期访问令牌。
pub struct OtpService {
    settings: OtpSettings,
    codes: DashMap<String, PendingCode>,
    grants: DashMap<String, Grant>,
    sender: Arc<dyn OtpSender>,
}

impl OtpService {
    pub fn new(settings: OtpSettings, sender: Arc<dyn OtpSender>) -> Self {
        Self {
            settings,
            codes: DashMap::new(),
            grants: DashMap::new(),
            sender,
        }
    }

    pub fn request_code(&self, raw_phone: &str) -> Result<CodeIssued, OtpError> {
        self.request_code_at(raw_phone, Utc::now())
    }

    pub fn request_code_at(
        &self,
        raw_phone: &str,
        now: DateTime<Utc>,
    ) -> Result<CodeIssued, OtpError> {
        let phone = normalize_phone(raw_phone)?;
        let code = generate_code(self.settings.code_length);
        let record = PendingCode {
            code_hash: hash_code(&phone, &code),
            issued_at: now,
            expires_at: now + self.settings.ttl,
            failed_attempts: 0,
            locked: false,
        };

        // 冷却判断与写入在同一个 entry 锁内完成
        match self.codes.entry(phone.clone()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get();
                if existing.locked && now < existing.expires_at {
                    return Err(OtpError::LockedOut);
                }
                let next_allowed = existing.issued_at + self.settings.resend_cooldown;
                if now < next_allowed {
                    let wait = (next_allowed - now).num_seconds().max(1);
                    return Err(OtpError::Cooldown { retry_after_secs: wait });
                }
                entry.insert(record);
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
        }

        if let Err(e) = self.sender.send(&phone, &code) {
            tracing::warn!("OTP delivery to {} failed: {}", mask_phone(&phone), e);
            self.codes.remove(&phone);
            return Err(e);
        }

        tracing::info!("OTP issued for {}", mask_phone(&phone));
        Ok(CodeIssued {
            phone,
            expires_in_seconds: self.settings.ttl.num_seconds(),
            resend_after_seconds: self.settings.resend_cooldown.num_seconds(),
        })
    }

    pub fn verify_code(&self, raw_phone: &str, code: &str) -> Result<AccessGrant, OtpError> {
        self.verify_code_at(raw_phone, code, Utc::now())
    }

    pub fn verify_code_at(
        &self,
        raw_phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessGrant, OtpError> {
        let phone = normalize_phone(raw_phone)?;
        let candidate = hash_code(&phone, code.trim());

        {
            let mut pending = self.codes.get_mut(&phone).ok_or(OtpError::NotRequested)?;

            if now >= pending.expires_at {
                drop(pending);
                self.codes.remove(&phone);
                return Err(OtpError::Expired);
            }
            if pending.locked {
                return Err(OtpError::LockedOut);
            }

            let matched: bool = candidate
                .as_bytes()
                .ct_eq(pending.code_hash.as_bytes())
                .into();

            if !matched {
                pending.failed_attempts += 1;
                if pending.failed_attempts >= self.settings.max_attempts {
                    pending.locked = true;
                    tracing::warn!("OTP locked for {} after {} attempts", mask_phone(&phone), pending.failed_attempts);
                    return Err(OtpError::LockedOut);
                }
                return Err(OtpError::InvalidCode {
                    remaining: self.settings.max_attempts - pending.failed_attempts,
                });
            }
        }

        // 验证码一次性: 在同一分片锁内复核并删除，并发的同码校验只有一个能拿到令牌
        let consumed = self.codes.remove_if(&phone, |_, pending| {
            !pending.locked
                && now < pending.expires_at
                && bool::from(candidate.as_bytes().ct_eq(pending.code_hash.as_bytes()))
        });
        if consumed.is_none() {
            return Err(OtpError::NotRequested);
        }

        let token = generate_token();
        self.grants.insert(
            token.clone(),
            Grant {
                phone: phone.clone(),
                expires_at: now + self.settings.token_ttl,
            },
        );

        tracing::info!("OTP verified for {}", mask_phone(&phone));
        Ok(AccessGrant {
            token,
            phone,
            expires_in_seconds: self.settings.token_ttl.num_seconds(),
        })
    }

    /// 令牌有效时返回对应手机号
    pub fn authorize(&self, token: &str) -> Option<String> {
        self.authorize_at(token, Utc::now())
    }

    pub fn authorize_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let phone = {
            let grant = self.grants.get(token)?;
            if now < grant.expires_at {
                Some(grant.phone.clone())
            } else {
                None
            }
        };
        if phone.is_none() {
            self.grants.remove(token);
        }
        phone
    }

    /// 清理过期记录，返回清理条数
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.codes.len() + self.grants.len();
        self.codes.retain(|_, pending| now < pending.expires_at);
        self.grants.retain(|_, grant| now < grant.expires_at);
        let removed = before.saturating_sub(self.codes.len() + self.grants.len());
        if removed > 0 {
            tracing::debug!("Purged {} expired OTP records", removed);
        }
        removed
    }
}
