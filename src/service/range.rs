use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// 下浮 8%
const LOW_PERCENT: i64 = 92;
/// 上浮 8%
const HIGH_PERCENT: i64 = 108;

/// 对外展示的价格区间，隐藏精确金额
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: u64,
    pub high: u64,
}

fn percent_of(exact: &BigDecimal, percent: i64) -> BigDecimal {
    (exact * &BigDecimal::from(percent) / BigDecimal::from(100)).round(0)
}

impl PriceRange {
    /// low = round(exact × 0.92), high = round(exact × 1.08)
    ///
    /// 小数金额额外夹在 floor/ceil 之外，保证 low ≤ exact ≤ high。
    /// 每个分类与总价各自独立换算，分类区间之和不等于总价区间。
    pub fn from_exact(exact: &BigDecimal) -> Self {
        if *exact <= BigDecimal::zero() {
            return Self::default();
        }

        let floor = exact.with_scale(0);
        let ceil = if &floor < exact {
            &floor + BigDecimal::from(1)
        } else {
            floor.clone()
        };

        let low = percent_of(exact, LOW_PERCENT).min(floor);
        let high = percent_of(exact, HIGH_PERCENT).max(ceil);

        Self {
            low: low.to_u64().unwrap_or(0),
            high: high.to_u64().unwrap_or(u64::MAX),
        }
    }

    /// 金额为 0 的分类视为未包含
    pub fn is_included(&self) -> bool {
        self.high > 0
    }

    pub fn label(&self) -> String {
        if self.is_included() {
            format!("₹{} – ₹{}", format_inr(self.low), format_inr(self.high))
        } else {
            "Not included".to_string()
        }
    }
}

/// 印度计数法分组: 末三位一组，之后两位一组 (9,93,600)
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
