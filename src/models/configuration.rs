use crate::error::EstimateError;
use crate::models::catalog::{
    AddOnItem, BedroomFurniture, BedroomRole, BedroomSize, Bhk, KitchenAccessory, KitchenType,
    LivingRoomItem, Package, RoomSize, SingleLineItem,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 去掉尾随零: JSON 浮点经 bigdecimal 解析后会带 16 位有效数字 (950.5 → 950.5000000000000)
pub fn normalize_decimal(value: &BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    let (_, scale) = normalized.as_bigint_and_exponent();
    if scale < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}

fn normalized_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    BigDecimal::deserialize(deserializer).map(|v| normalize_decimal(&v))
}

fn normalized_optional_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BigDecimal>::deserialize(deserializer).map(|v| v.as_ref().map(normalize_decimal))
}

/// 数量型计量 (门数、配件数、附加项件数)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(default)]
    pub qty: u32,
}

/// 面积型计量，area 为空时由所属分类决定回退面积
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaOverride {
    #[serde(default, deserialize_with = "normalized_optional_decimal")]
    pub area: Option<BigDecimal>,
}

/// 计量完全来自费率表 (按尺寸查面积或固定价)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {}

/// 可配置项: 是否启用 + 计量 + 单项套餐覆盖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurableItem<M> {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub magnitude: M,
    #[serde(default)]
    pub package_override: Option<Package>,
}

pub type QuantityItem = ConfigurableItem<Quantity>;
pub type AreaItem = ConfigurableItem<AreaOverride>;
pub type DerivedItem = ConfigurableItem<Derived>;

impl<M> ConfigurableItem<M> {
    /// 单项覆盖优先于全局套餐，仅作用于本项
    pub fn effective_package(&self, global: Package) -> Package {
        self.package_override.unwrap_or(global)
    }

    pub fn with_override(mut self, package: Package) -> Self {
        self.package_override = Some(package);
        self
    }
}

impl QuantityItem {
    pub fn qty(qty: u32) -> Self {
        Self {
            enabled: true,
            magnitude: Quantity { qty },
            package_override: None,
        }
    }
}

impl AreaItem {
    /// 使用项目总面积
    pub fn full_area() -> Self {
        Self {
            enabled: true,
            magnitude: AreaOverride::default(),
            package_override: None,
        }
    }

    pub fn area(area: BigDecimal) -> Self {
        Self {
            enabled: true,
            magnitude: AreaOverride { area: Some(area) },
            package_override: None,
        }
    }
}

impl DerivedItem {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            magnitude: Derived {},
            package_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedroomConfig {
    pub role: BedroomRole,
    /// 自定义名称，例如 "Guest Bedroom 2"
    #[serde(default)]
    pub name: Option<String>,
    pub size: BedroomSize,
    #[serde(default)]
    pub furniture: BTreeMap<BedroomFurniture, DerivedItem>,
}

impl BedroomConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.role.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingRoomConfig {
    pub size: RoomSize,
    #[serde(default)]
    pub items: BTreeMap<LivingRoomItem, DerivedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenConfig {
    #[serde(rename = "type")]
    pub kitchen_type: KitchenType,
    pub size: RoomSize,
    #[serde(default)]
    pub base_unit: DerivedItem,
    #[serde(default)]
    pub accessories: BTreeMap<KitchenAccessory, QuantityItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoojaRoomConfig {
    pub size: RoomSize,
    #[serde(default)]
    pub unit: DerivedItem,
    #[serde(default)]
    pub doors: QuantityItem,
}

/// 一次估价请求的完整配置快照
///
/// 每次请求重新构造，持久化由调用方负责。尺寸枚举的合法性由反序列化保证，
/// 数值合理性 (非负) 由上游录入层保证。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    pub package: Package,
    pub bhk: Bhk,
    #[serde(deserialize_with = "normalized_decimal")]
    pub carpet_area: BigDecimal,
    #[serde(default)]
    pub single_line: BTreeMap<SingleLineItem, AreaItem>,
    #[serde(default)]
    pub bedrooms: Vec<BedroomConfig>,
    #[serde(default)]
    pub living_room: Option<LivingRoomConfig>,
    #[serde(default)]
    pub kitchen: Option<KitchenConfig>,
    #[serde(default)]
    pub pooja_room: Option<PoojaRoomConfig>,
    #[serde(default)]
    pub add_ons: BTreeMap<AddOnItem, QuantityItem>,
}

impl ProjectConfiguration {
    /// 只有基础信息、未启用任何项的配置
    pub fn new(package: Package, bhk: Bhk, carpet_area: BigDecimal) -> Self {
        Self {
            package,
            bhk,
            carpet_area,
            single_line: BTreeMap::new(),
            bedrooms: Vec::new(),
            living_room: None,
            kitchen: None,
            pooja_room: None,
            add_ons: BTreeMap::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, EstimateError> {
        serde_json::from_str(raw).map_err(|e| EstimateError::Configuration(e.to_string()))
    }
}
