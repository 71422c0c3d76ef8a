use serde::{Deserialize, Serialize};
use std::fmt;

/// 套餐档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Package {
    Premium,
    Luxury,
}

impl Package {
    pub const ALL: [Package; 2] = [Package::Premium, Package::Luxury];

    pub fn label(self) -> &'static str {
        match self {
            Package::Premium => "Premium",
            Package::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 户型档位 (Bedroom-Hall-Kitchen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bhk {
    #[serde(rename = "1bhk")]
    One,
    #[serde(rename = "2bhk")]
    Two,
    #[serde(rename = "3bhk")]
    Three,
    #[serde(rename = "4bhk")]
    Four,
}

impl Bhk {
    pub const ALL: [Bhk; 4] = [Bhk::One, Bhk::Two, Bhk::Three, Bhk::Four];

    pub fn label(self) -> &'static str {
        match self {
            Bhk::One => "1 BHK",
            Bhk::Two => "2 BHK",
            Bhk::Three => "3 BHK",
            Bhk::Four => "4 BHK",
        }
    }
}

/// 卧室尺寸 (固定四档)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BedroomSize {
    #[serde(rename = "10x10")]
    S10x10,
    #[serde(rename = "11x12")]
    S11x12,
    #[serde(rename = "12x14")]
    S12x14,
    #[serde(rename = "14x16")]
    S14x16,
}

impl BedroomSize {
    pub const ALL: [BedroomSize; 4] = [
        BedroomSize::S10x10,
        BedroomSize::S11x12,
        BedroomSize::S12x14,
        BedroomSize::S14x16,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BedroomSize::S10x10 => "10x10",
            BedroomSize::S11x12 => "11x12",
            BedroomSize::S12x14 => "12x14",
            BedroomSize::S14x16 => "14x16",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedroomRole {
    Master,
    Children,
    Guest,
}

impl BedroomRole {
    pub fn label(self) -> &'static str {
        match self {
            BedroomRole::Master => "Master Bedroom",
            BedroomRole::Children => "Children Bedroom",
            BedroomRole::Guest => "Guest Bedroom",
        }
    }
}

/// 客厅/厨房/佛堂共用的三档尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomSize {
    Small,
    Medium,
    Large,
}

impl RoomSize {
    pub const ALL: [RoomSize; 3] = [RoomSize::Small, RoomSize::Medium, RoomSize::Large];

    pub fn label(self) -> &'static str {
        match self {
            RoomSize::Small => "Small",
            RoomSize::Medium => "Medium",
            RoomSize::Large => "Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KitchenType {
    Straight,
    LShaped,
    Parallel,
    UShaped,
}

impl KitchenType {
    pub const ALL: [KitchenType; 4] = [
        KitchenType::Straight,
        KitchenType::LShaped,
        KitchenType::Parallel,
        KitchenType::UShaped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KitchenType::Straight => "Straight",
            KitchenType::LShaped => "L-Shaped",
            KitchenType::Parallel => "Parallel",
            KitchenType::UShaped => "U-Shaped",
        }
    }
}

/// 费用分类，声明顺序即累加与输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    SingleLineItems,
    Bedrooms,
    LivingRoom,
    Kitchen,
    PoojaRoom,
    AddOns,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::SingleLineItems,
        Category::Bedrooms,
        Category::LivingRoom,
        Category::Kitchen,
        Category::PoojaRoom,
        Category::AddOns,
    ];

    /// 对外 JSON 中使用的键名
    pub fn key(self) -> &'static str {
        match self {
            Category::SingleLineItems => "singleLineItems",
            Category::Bedrooms => "bedrooms",
            Category::LivingRoom => "livingRoom",
            Category::Kitchen => "kitchen",
            Category::PoojaRoom => "poojaRoom",
            Category::AddOns => "addOns",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::SingleLineItems => "Single Line Items",
            Category::Bedrooms => "Bedrooms",
            Category::LivingRoom => "Living Room",
            Category::Kitchen => "Kitchen",
            Category::PoojaRoom => "Pooja Room",
            Category::AddOns => "Add-ons",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 按面积计价、覆盖全屋的单项
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SingleLineItem {
    FalseCeiling,
    Painting,
    ElectricalWiring,
}

impl SingleLineItem {
    pub const ALL: [SingleLineItem; 3] = [
        SingleLineItem::FalseCeiling,
        SingleLineItem::Painting,
        SingleLineItem::ElectricalWiring,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SingleLineItem::FalseCeiling => "False Ceiling",
            SingleLineItem::Painting => "Painting",
            SingleLineItem::ElectricalWiring => "Electrical Wiring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BedroomFurniture {
    Wardrobe,
    Study,
    TvUnit,
    BedPanel,
}

impl BedroomFurniture {
    pub const ALL: [BedroomFurniture; 4] = [
        BedroomFurniture::Wardrobe,
        BedroomFurniture::Study,
        BedroomFurniture::TvUnit,
        BedroomFurniture::BedPanel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BedroomFurniture::Wardrobe => "Wardrobe",
            BedroomFurniture::Study => "Study Unit",
            BedroomFurniture::TvUnit => "TV Unit",
            BedroomFurniture::BedPanel => "Bed Back Panel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LivingRoomItem {
    TvUnit,
    ShoeRack,
    WallPanelling,
    CrockeryUnit,
}

impl LivingRoomItem {
    pub const ALL: [LivingRoomItem; 4] = [
        LivingRoomItem::TvUnit,
        LivingRoomItem::ShoeRack,
        LivingRoomItem::WallPanelling,
        LivingRoomItem::CrockeryUnit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LivingRoomItem::TvUnit => "TV Unit",
            LivingRoomItem::ShoeRack => "Shoe Rack",
            LivingRoomItem::WallPanelling => "Wall Panelling",
            LivingRoomItem::CrockeryUnit => "Crockery Unit",
        }
    }
}

/// 厨房配件，按数量 × 单价计价
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KitchenAccessory {
    TandemBaskets,
    BottlePullout,
    CornerUnit,
    WickerBasket,
}

impl KitchenAccessory {
    pub const ALL: [KitchenAccessory; 4] = [
        KitchenAccessory::TandemBaskets,
        KitchenAccessory::BottlePullout,
        KitchenAccessory::CornerUnit,
        KitchenAccessory::WickerBasket,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KitchenAccessory::TandemBaskets => "Tandem Baskets",
            KitchenAccessory::BottlePullout => "Bottle Pullout",
            KitchenAccessory::CornerUnit => "Corner Unit",
            KitchenAccessory::WickerBasket => "Wicker Basket",
        }
    }
}

/// 附加项，按 (户型, 套餐) 的单件价格计价
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddOnItem {
    Sofa,
    DiningTable,
    Curtains,
    ShoeCabinet,
}

impl AddOnItem {
    pub const ALL: [AddOnItem; 4] = [
        AddOnItem::Sofa,
        AddOnItem::DiningTable,
        AddOnItem::Curtains,
        AddOnItem::ShoeCabinet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AddOnItem::Sofa => "Sofa",
            AddOnItem::DiningTable => "Dining Table",
            AddOnItem::Curtains => "Curtains",
            AddOnItem::ShoeCabinet => "Shoe Cabinet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Bhk::Three).unwrap(), "\"3bhk\"");
        assert_eq!(serde_json::to_string(&BedroomSize::S14x16).unwrap(), "\"14x16\"");
        assert_eq!(serde_json::to_string(&KitchenType::LShaped).unwrap(), "\"l-shaped\"");
        assert_eq!(
            serde_json::to_string(&KitchenAccessory::TandemBaskets).unwrap(),
            "\"tandemBaskets\""
        );
        let pkg: Package = serde_json::from_str("\"luxury\"").unwrap();
        assert_eq!(pkg, Package::Luxury);
    }

    #[test]
    fn test_category_order_matches_keys() {
        let keys: Vec<_> = Category::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec!["singleLineItems", "bedrooms", "livingRoom", "kitchen", "poojaRoom", "addOns"]
        );
        for c in Category::ALL {
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{}\"", c.key()));
        }
    }

    #[test]
    fn test_unknown_size_rejected() {
        assert!(serde_json::from_str::<BedroomSize>("\"9x9\"").is_err());
    }
}
