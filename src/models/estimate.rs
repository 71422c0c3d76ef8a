use crate::models::catalog::{Bhk, Category, Package};
use crate::service::range::PriceRange;
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 明细说明的两条数据通路
///
/// `public` 只含尺寸、面积、数量；`internal` 额外带单价与乘式，只在内部使用。
/// 两者分别构造，不从 internal 中剔除费率得到 public。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDetail {
    pub public: String,
    pub internal: String,
}

/// 单条计价明细，生成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub category: Category,
    pub name: String,
    pub package: Package,
    pub detail: LineDetail,
    pub amount: BigDecimal,
}

/// 分类小计，始终包含全部分类 (未启用的为 0)，按固定顺序
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    totals: IndexMap<Category, BigDecimal>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self {
            totals: Category::ALL
                .into_iter()
                .map(|c| (c, BigDecimal::zero()))
                .collect(),
        }
    }

    pub fn add(&mut self, category: Category, amount: &BigDecimal) {
        let entry = self.totals.entry(category).or_insert_with(BigDecimal::zero);
        *entry = &*entry + amount;
    }

    pub fn get(&self, category: Category) -> BigDecimal {
        self.totals.get(&category).cloned().unwrap_or_else(BigDecimal::zero)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &BigDecimal)> {
        self.totals.iter().map(|(c, v)| (*c, v))
    }

    pub fn sum(&self) -> BigDecimal {
        self.totals
            .values()
            .fold(BigDecimal::zero(), |acc, v| acc + v)
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self::new()
    }
}

/// 引擎输出: 精确金额，只在内部流转
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub rate_version: String,
    pub package: Package,
    pub bhk: Bhk,
    pub lines: Vec<LineItem>,
    pub totals: CategoryTotals,
    pub grand_total: BigDecimal,
}

/// 区间 + 展示文案
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeView {
    #[serde(flatten)]
    pub range: PriceRange,
    pub included: bool,
    pub label: String,
}

impl From<PriceRange> for RangeView {
    fn from(range: PriceRange) -> Self {
        Self {
            range,
            included: range.is_included(),
            label: range.label(),
        }
    }
}

/// 对外 (不可信调用方) 视图: 只有分类区间与总价区间
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicEstimate {
    pub ranges: IndexMap<String, RangeView>,
}

pub const GRAND_TOTAL_KEY: &str = "grandTotal";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    pub category: Category,
    pub item: String,
    pub package: Package,
    pub specification: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSubtotal {
    pub category: Category,
    pub label: String,
    pub amount: u64,
    pub included: bool,
}

/// 估价单视图: 允许逐项精确金额，但说明只取 public 通路
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDocument {
    pub rate_version: String,
    pub package: Package,
    pub bhk: Bhk,
    pub lines: Vec<DocumentLine>,
    pub subtotals: Vec<DocumentSubtotal>,
    pub grand_total: u64,
}

/// 展示时才取整到卢比
fn whole_rupees(amount: &BigDecimal) -> u64 {
    amount.round(0).to_u64().unwrap_or(0)
}

impl Estimate {
    pub fn public_view(&self) -> PublicEstimate {
        let mut ranges: IndexMap<String, RangeView> = self
            .totals
            .iter()
            .map(|(category, exact)| (category.key().to_string(), PriceRange::from_exact(exact).into()))
            .collect();
        // 总价区间由总价直接换算，不累加分类区间
        ranges.insert(
            GRAND_TOTAL_KEY.to_string(),
            PriceRange::from_exact(&self.grand_total).into(),
        );
        PublicEstimate { ranges }
    }

    pub fn document(&self) -> EstimateDocument {
        let lines = self
            .lines
            .iter()
            .map(|line| DocumentLine {
                category: line.category,
                item: line.name.clone(),
                package: line.package,
                specification: line.detail.public.clone(),
                amount: whole_rupees(&line.amount),
            })
            .collect();

        let subtotals = self
            .totals
            .iter()
            .map(|(category, exact)| DocumentSubtotal {
                category,
                label: category.label().to_string(),
                amount: whole_rupees(exact),
                included: !exact.is_zero(),
            })
            .collect();

        EstimateDocument {
            rate_version: self.rate_version.clone(),
            package: self.package,
            bhk: self.bhk,
            lines,
            subtotals,
            grand_total: whole_rupees(&self.grand_total),
        }
    }
}
