use crate::error::OtpError;

const DEFAULT_COUNTRY_CODE: &str = "91";

/// 手机号归一化: 只保留数字，10 位本地号补国家码，0 开头的 11 位号去掉前导 0
pub fn normalize_phone(raw: &str) -> Result<String, OtpError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = match digits.len() {
        10 => format!("{}{}", DEFAULT_COUNTRY_CODE, digits),
        11 if digits.starts_with('0') => format!("{}{}", DEFAULT_COUNTRY_CODE, &digits[1..]),
        _ => digits,
    };

    if (11..=15).contains(&normalized.len()) && !normalized.starts_with('0') {
        Ok(normalized)
    } else {
        Err(OtpError::InvalidPhone)
    }
}

/// 日志中只保留末四位
pub fn mask_phone(phone: &str) -> String {
    let keep = phone.len().saturating_sub(4);
    format!("{}{}", "*".repeat(keep), &phone[keep..])
}
