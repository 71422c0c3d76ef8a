use crate::error::EstimateError;
use crate::models::catalog::{Category, Package};
use crate::models::configuration::{
    BedroomConfig, KitchenConfig, LivingRoomConfig, PoojaRoomConfig, ProjectConfiguration,
    QuantityItem,
};
use crate::models::estimate::{CategoryTotals, Estimate, LineDetail, LineItem};
use crate::rates::table::LivingRoomQuote;
use crate::rates::RateTable;
use crate::service::range::format_inr;
use bigdecimal::{BigDecimal, ToPrimitive};
use std::sync::Arc;

/// 金额展示: 整数按印度计数法分组，小数原样输出
fn rupees(amount: &BigDecimal) -> String {
    match amount.to_u64() {
        Some(v) if amount.with_scale(0) == *amount => format!("₹{}", format_inr(v)),
        _ => format!("₹{}", amount),
    }
}

fn count(qty: u32, singular: &str, plural: &str) -> String {
    if qty == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", qty, plural)
    }
}

/// 面积 × 单价
fn per_area(area: &BigDecimal, rate: &BigDecimal) -> (BigDecimal, String) {
    (area * rate, format!("{} sqft × {}", area, rupees(rate)))
}

/// 数量 × 单价
fn per_unit(qty: u32, price: &BigDecimal) -> (BigDecimal, String) {
    (BigDecimal::from(qty) * price, format!("{} × {}", qty, rupees(price)))
}

/// 逐项累加: 明细列表 + 分类小计
#[derive(Default)]
struct Ledger {
    lines: Vec<LineItem>,
    totals: CategoryTotals,
}

impl Ledger {
    fn push(
        &mut self,
        category: Category,
        name: String,
        package: Package,
        public: String,
        (amount, internal): (BigDecimal, String),
    ) {
        self.totals.add(category, &amount);
        self.lines.push(LineItem {
            category,
            name,
            package,
            detail: LineDetail { public, internal },
            amount,
        });
    }
}

/// 计价引擎
///
/// 纯函数: 同一配置与同一费率表总得到相同结果，不做 I/O，可并发调用。
/// 费率表由构造方注入，不依赖任何全局状态。
pub struct PricingEngine {
    rates: Arc<RateTable>,
}

impl PricingEngine {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// 按固定分类顺序计价: 单项 → 卧室 → 客厅 → 厨房 → 佛堂 → 附加项
    pub fn estimate(&self, config: &ProjectConfiguration) -> Result<Estimate, EstimateError> {
        let mut ledger = Ledger::default();

        self.price_single_line(config, &mut ledger)?;
        for bedroom in &config.bedrooms {
            self.price_bedroom(config.package, bedroom, &mut ledger)?;
        }
        if let Some(living_room) = &config.living_room {
            self.price_living_room(config.package, living_room, &mut ledger)?;
        }
        if let Some(kitchen) = &config.kitchen {
            self.price_kitchen(config.package, kitchen, &mut ledger)?;
        }
        if let Some(pooja_room) = &config.pooja_room {
            self.price_pooja_room(config.package, pooja_room, &mut ledger)?;
        }
        self.price_add_ons(config, &mut ledger)?;

        let grand_total = ledger.totals.sum();

        Ok(Estimate {
            rate_version: self.rates.version.clone(),
            package: config.package,
            bhk: config.bhk,
            lines: ledger.lines,
            totals: ledger.totals,
            grand_total,
        })
    }

    /// 单项: 优先使用该项自带面积，否则回退到套内面积
    fn price_single_line(
        &self,
        config: &ProjectConfiguration,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        for (&item, entry) in config.single_line.iter().filter(|(_, e)| e.enabled) {
            let package = entry.effective_package(config.package);
            let area = entry.magnitude.area.as_ref().unwrap_or(&config.carpet_area);
            let rate = self.rates.single_line_rate(item, package)?;

            ledger.push(
                Category::SingleLineItems,
                item.label().to_string(),
                package,
                format!("{} sqft", area),
                per_area(area, rate),
            );
        }
        Ok(())
    }

    fn price_bedroom(
        &self,
        global: Package,
        bedroom: &BedroomConfig,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        for (&item, entry) in bedroom.furniture.iter().filter(|(_, e)| e.enabled) {
            let package = entry.effective_package(global);
            let area = self.rates.bedroom_area(item, bedroom.size)?;
            let rate = self.rates.bedroom_rate(item, package)?;

            ledger.push(
                Category::Bedrooms,
                format!("{} • {}", bedroom.display_name(), item.label()),
                package,
                format!("{} • {} sqft", bedroom.size.label(), area),
                per_area(area, rate),
            );
        }
        Ok(())
    }

    fn price_living_room(
        &self,
        global: Package,
        living_room: &LivingRoomConfig,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        let size = living_room.size;
        for (&item, entry) in living_room.items.iter().filter(|(_, e)| e.enabled) {
            let package = entry.effective_package(global);
            let (public, priced) = match self.rates.living_room_quote(item, package, size)? {
                LivingRoomQuote::Fixed(price) => (
                    size.label().to_string(),
                    (price.clone(), format!("{} • fixed {}", size.label(), rupees(price))),
                ),
                LivingRoomQuote::PerArea { area, rate } => {
                    (format!("{} • {} sqft", size.label(), area), per_area(area, rate))
                }
            };

            ledger.push(Category::LivingRoom, item.label().to_string(), package, public, priced);
        }
        Ok(())
    }

    fn price_kitchen(
        &self,
        global: Package,
        kitchen: &KitchenConfig,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        if kitchen.base_unit.enabled {
            let package = kitchen.base_unit.effective_package(global);
            let area = self.rates.kitchen_base_area(kitchen.kitchen_type, kitchen.size)?;
            let rate = self.rates.kitchen_base_rate(package)?;

            ledger.push(
                Category::Kitchen,
                "Kitchen Base Unit".to_string(),
                package,
                format!(
                    "{} • {} • {} sqft",
                    kitchen.kitchen_type.label(),
                    kitchen.size.label(),
                    area
                ),
                per_area(area, rate),
            );
        }

        for (&item, entry) in kitchen.accessories.iter().filter(|(_, e)| counts(e)) {
            let package = entry.effective_package(global);
            let qty = entry.magnitude.qty;
            let price = self.rates.kitchen_accessory_price(item, package)?;

            ledger.push(
                Category::Kitchen,
                item.label().to_string(),
                package,
                count(qty, "unit", "units"),
                per_unit(qty, price),
            );
        }
        Ok(())
    }

    fn price_pooja_room(
        &self,
        global: Package,
        pooja_room: &PoojaRoomConfig,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        let size = pooja_room.size;

        if pooja_room.unit.enabled {
            let package = pooja_room.unit.effective_package(global);
            let price = self.rates.pooja_unit_price(package, size)?;

            ledger.push(
                Category::PoojaRoom,
                "Pooja Unit".to_string(),
                package,
                size.label().to_string(),
                (price.clone(), format!("{} • fixed {}", size.label(), rupees(price))),
            );
        }

        if counts(&pooja_room.doors) {
            let package = pooja_room.doors.effective_package(global);
            let qty = pooja_room.doors.magnitude.qty;
            let price = self.rates.pooja_door_price(package, size)?;

            ledger.push(
                Category::PoojaRoom,
                "Pooja Door".to_string(),
                package,
                format!("{} • {}", size.label(), count(qty, "door", "doors")),
                per_unit(qty, price),
            );
        }
        Ok(())
    }

    /// 附加项: 按 (户型, 套餐) 的单件价 × 数量
    fn price_add_ons(
        &self,
        config: &ProjectConfiguration,
        ledger: &mut Ledger,
    ) -> Result<(), EstimateError> {
        for (&item, entry) in config.add_ons.iter().filter(|(_, e)| counts(e)) {
            let package = entry.effective_package(config.package);
            let qty = entry.magnitude.qty;
            let price = self.rates.add_on_price(item, config.bhk, package)?;

            ledger.push(
                Category::AddOns,
                item.label().to_string(),
                package,
                format!("{} • {}", count(qty, "unit", "units"), config.bhk.label()),
                per_unit(qty, price),
            );
        }
        Ok(())
    }
}

/// 数量型项目: 启用且数量大于 0 才计入
fn counts(entry: &QuantityItem) -> bool {
    entry.enabled && entry.magnitude.qty > 0
}
