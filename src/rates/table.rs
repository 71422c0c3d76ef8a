use crate::error::{EstimateError, RateTableError};
use crate::models::catalog::{
    AddOnItem, BedroomFurniture, BedroomSize, Bhk, KitchenAccessory, KitchenType, LivingRoomItem,
    Package, RoomSize, SingleLineItem,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 套餐 → 单价
pub type PackageRates = BTreeMap<Package, BigDecimal>;

/// 套餐 → 尺寸 → 固定价
pub type SizedPrices = BTreeMap<Package, BTreeMap<RoomSize, BigDecimal>>;

/// 面积表 + 每平方英尺单价，两张表相互独立
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRated<S: Ord> {
    pub area: BTreeMap<S, BigDecimal>,
    pub rate: PackageRates,
}

/// 客厅项目的两种计价方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pricing", rename_all = "camelCase")]
pub enum LivingRoomPricing {
    Fixed { price: SizedPrices },
    PerArea(AreaRated<RoomSize>),
}

/// 客厅项目在给定套餐与尺寸下的报价依据
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LivingRoomQuote<'a> {
    Fixed(&'a BigDecimal),
    PerArea {
        area: &'a BigDecimal,
        rate: &'a BigDecimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenRates {
    /// 地柜单价只随套餐变化
    pub base_unit_rate: PackageRates,
    /// 地柜面积随 (厨房类型, 尺寸) 变化
    pub base_unit_area: BTreeMap<KitchenType, BTreeMap<RoomSize, BigDecimal>>,
    pub accessories: BTreeMap<KitchenAccessory, PackageRates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoojaRates {
    pub unit: SizedPrices,
    pub door: SizedPrices,
}

/// 费率表
///
/// 不可变、带版本号。构造后须通过 [`RateTable::validate`]，之后所有合法配置
/// 引用到的 (套餐, 尺寸/户型) 组合都能查到费率。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub version: String,
    pub single_line: BTreeMap<SingleLineItem, PackageRates>,
    pub bedroom: BTreeMap<BedroomFurniture, AreaRated<BedroomSize>>,
    pub living_room: BTreeMap<LivingRoomItem, LivingRoomPricing>,
    pub kitchen: KitchenRates,
    pub pooja_room: PoojaRates,
    pub add_ons: BTreeMap<AddOnItem, BTreeMap<Bhk, PackageRates>>,
}

fn missing(category: &'static str, item: &str, key: String) -> EstimateError {
    EstimateError::MissingRate {
        category,
        item: item.to_string(),
        key,
    }
}

fn sized_price<'a>(
    prices: &'a SizedPrices,
    package: Package,
    size: RoomSize,
    category: &'static str,
    item: &str,
) -> Result<&'a BigDecimal, EstimateError> {
    prices
        .get(&package)
        .and_then(|by_size| by_size.get(&size))
        .ok_or_else(|| missing(category, item, format!("{}/{}", package, size.label())))
}

impl RateTable {
    /// 从 JSON 文本加载并校验
    pub fn from_json_str(raw: &str) -> Result<Self, RateTableError> {
        let table: RateTable = serde_json::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, RateTableError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RateTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn single_line_rate(
        &self,
        item: SingleLineItem,
        package: Package,
    ) -> Result<&BigDecimal, EstimateError> {
        self.single_line
            .get(&item)
            .and_then(|rates| rates.get(&package))
            .ok_or_else(|| missing("singleLineItems", item.label(), package.to_string()))
    }

    pub fn bedroom_area(
        &self,
        item: BedroomFurniture,
        size: BedroomSize,
    ) -> Result<&BigDecimal, EstimateError> {
        self.bedroom
            .get(&item)
            .and_then(|t| t.area.get(&size))
            .ok_or_else(|| missing("bedrooms", item.label(), format!("area/{}", size.label())))
    }

    pub fn bedroom_rate(
        &self,
        item: BedroomFurniture,
        package: Package,
    ) -> Result<&BigDecimal, EstimateError> {
        self.bedroom
            .get(&item)
            .and_then(|t| t.rate.get(&package))
            .ok_or_else(|| missing("bedrooms", item.label(), format!("rate/{}", package)))
    }

    pub fn living_room_quote(
        &self,
        item: LivingRoomItem,
        package: Package,
        size: RoomSize,
    ) -> Result<LivingRoomQuote<'_>, EstimateError> {
        let pricing = self
            .living_room
            .get(&item)
            .ok_or_else(|| missing("livingRoom", item.label(), "pricing".to_string()))?;

        match pricing {
            LivingRoomPricing::Fixed { price } => {
                sized_price(price, package, size, "livingRoom", item.label())
                    .map(LivingRoomQuote::Fixed)
            }
            LivingRoomPricing::PerArea(t) => {
                let area = t.area.get(&size).ok_or_else(|| {
                    missing("livingRoom", item.label(), format!("area/{}", size.label()))
                })?;
                let rate = t.rate.get(&package).ok_or_else(|| {
                    missing("livingRoom", item.label(), format!("rate/{}", package))
                })?;
                Ok(LivingRoomQuote::PerArea { area, rate })
            }
        }
    }

    pub fn kitchen_base_rate(&self, package: Package) -> Result<&BigDecimal, EstimateError> {
        self.kitchen
            .base_unit_rate
            .get(&package)
            .ok_or_else(|| missing("kitchen", "Base Unit", format!("rate/{}", package)))
    }

    pub fn kitchen_base_area(
        &self,
        kitchen_type: KitchenType,
        size: RoomSize,
    ) -> Result<&BigDecimal, EstimateError> {
        self.kitchen
            .base_unit_area
            .get(&kitchen_type)
            .and_then(|by_size| by_size.get(&size))
            .ok_or_else(|| {
                missing(
                    "kitchen",
                    "Base Unit",
                    format!("area/{}/{}", kitchen_type.label(), size.label()),
                )
            })
    }

    pub fn kitchen_accessory_price(
        &self,
        item: KitchenAccessory,
        package: Package,
    ) -> Result<&BigDecimal, EstimateError> {
        self.kitchen
            .accessories
            .get(&item)
            .and_then(|rates| rates.get(&package))
            .ok_or_else(|| missing("kitchen", item.label(), package.to_string()))
    }

    pub fn pooja_unit_price(
        &self,
        package: Package,
        size: RoomSize,
    ) -> Result<&BigDecimal, EstimateError> {
        sized_price(&self.pooja_room.unit, package, size, "poojaRoom", "Pooja Unit")
    }

    pub fn pooja_door_price(
        &self,
        package: Package,
        size: RoomSize,
    ) -> Result<&BigDecimal, EstimateError> {
        sized_price(&self.pooja_room.door, package, size, "poojaRoom", "Pooja Door")
    }

    pub fn add_on_price(
        &self,
        item: AddOnItem,
        bhk: Bhk,
        package: Package,
    ) -> Result<&BigDecimal, EstimateError> {
        self.add_ons
            .get(&item)
            .and_then(|by_bhk| by_bhk.get(&bhk))
            .and_then(|rates| rates.get(&package))
            .ok_or_else(|| {
                missing("addOns", item.label(), format!("{}/{}", bhk.label(), package))
            })
    }

    /// 校验完整性: 每个项目在每个套餐、每个尺寸/户型下都必须有费率
    pub fn validate(&self) -> Result<(), EstimateError> {
        for package in Package::ALL {
            for item in SingleLineItem::ALL {
                self.single_line_rate(item, package)?;
            }

            for item in BedroomFurniture::ALL {
                self.bedroom_rate(item, package)?;
                for size in BedroomSize::ALL {
                    self.bedroom_area(item, size)?;
                }
            }

            for item in LivingRoomItem::ALL {
                for size in RoomSize::ALL {
                    self.living_room_quote(item, package, size)?;
                }
            }

            self.kitchen_base_rate(package)?;
            for kitchen_type in KitchenType::ALL {
                for size in RoomSize::ALL {
                    self.kitchen_base_area(kitchen_type, size)?;
                }
            }
            for item in KitchenAccessory::ALL {
                self.kitchen_accessory_price(item, package)?;
            }

            for size in RoomSize::ALL {
                self.pooja_unit_price(package, size)?;
                self.pooja_door_price(package, size)?;
            }

            for item in AddOnItem::ALL {
                for bhk in Bhk::ALL {
                    self.add_on_price(item, bhk, package)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::defaults;

    #[test]
    fn test_builtin_table_is_complete() {
        let table = defaults::builtin();
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_reference_rates() {
        let table = defaults::builtin();
        assert_eq!(
            table.single_line_rate(SingleLineItem::FalseCeiling, Package::Premium).unwrap(),
            &BigDecimal::from(900)
        );
        assert_eq!(
            table.bedroom_area(BedroomFurniture::Wardrobe, BedroomSize::S14x16).unwrap(),
            &BigDecimal::from(35)
        );
        assert_eq!(
            table.bedroom_rate(BedroomFurniture::Wardrobe, Package::Premium).unwrap(),
            &BigDecimal::from(2800)
        );
    }

    #[test]
    fn test_missing_entry_fails_validation() {
        let mut table = defaults::builtin();
        table
            .add_ons
            .get_mut(&AddOnItem::Sofa)
            .unwrap()
            .get_mut(&Bhk::Four)
            .unwrap()
            .remove(&Package::Luxury);

        let err = table.validate().unwrap_err();
        match err {
            EstimateError::MissingRate { category, item, key } => {
                assert_eq!(category, "addOns");
                assert_eq!(item, "Sofa");
                assert_eq!(key, "4 BHK/Luxury");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_living_room_size_fails_validation() {
        let mut table = defaults::builtin();
        if let Some(LivingRoomPricing::Fixed { price }) =
            table.living_room.get_mut(&LivingRoomItem::TvUnit)
        {
            price.get_mut(&Package::Premium).unwrap().remove(&RoomSize::Large);
        }
        assert!(matches!(
            table.validate(),
            Err(EstimateError::MissingRate { category: "livingRoom", .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_table() {
        let table = defaults::builtin();
        let raw = serde_json::to_string(&table).unwrap();
        let loaded = RateTable::from_json_str(&raw).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_incomplete_json_rejected() {
        let mut value = serde_json::to_value(defaults::builtin()).unwrap();
        value["kitchen"]["accessories"]
            .as_object_mut()
            .unwrap()
            .remove("cornerUnit");
        let err = RateTable::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, RateTableError::Incomplete(_)));
    }
}
