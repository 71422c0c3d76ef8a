//! 内置费率表 (单位: 卢比，面积单位: 平方英尺)

use crate::models::catalog::{
    AddOnItem, BedroomFurniture, BedroomSize, Bhk, KitchenAccessory, KitchenType, LivingRoomItem,
    Package, RoomSize, SingleLineItem,
};
use crate::rates::table::{
    AreaRated, KitchenRates, LivingRoomPricing, PackageRates, PoojaRates, RateTable, SizedPrices,
};
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

pub const BUILTIN_VERSION: &str = "builtin-2024.1";

fn packages(premium: i64, luxury: i64) -> PackageRates {
    BTreeMap::from([
        (Package::Premium, BigDecimal::from(premium)),
        (Package::Luxury, BigDecimal::from(luxury)),
    ])
}

fn by_room_size(small: i64, medium: i64, large: i64) -> BTreeMap<RoomSize, BigDecimal> {
    BTreeMap::from([
        (RoomSize::Small, BigDecimal::from(small)),
        (RoomSize::Medium, BigDecimal::from(medium)),
        (RoomSize::Large, BigDecimal::from(large)),
    ])
}

fn sized(premium: [i64; 3], luxury: [i64; 3]) -> SizedPrices {
    BTreeMap::from([
        (Package::Premium, by_room_size(premium[0], premium[1], premium[2])),
        (Package::Luxury, by_room_size(luxury[0], luxury[1], luxury[2])),
    ])
}

fn bedroom(areas: [i64; 4], premium: i64, luxury: i64) -> AreaRated<BedroomSize> {
    AreaRated {
        area: BedroomSize::ALL
            .into_iter()
            .zip(areas)
            .map(|(size, a)| (size, BigDecimal::from(a)))
            .collect(),
        rate: packages(premium, luxury),
    }
}

/// 按户型 1~4 BHK 的 (Premium, Luxury) 单件价
fn by_bhk(prices: [(i64, i64); 4]) -> BTreeMap<Bhk, PackageRates> {
    Bhk::ALL
        .into_iter()
        .zip(prices)
        .map(|(bhk, (premium, luxury))| (bhk, packages(premium, luxury)))
        .collect()
}

pub fn builtin() -> RateTable {
    RateTable {
        version: BUILTIN_VERSION.to_string(),
        single_line: BTreeMap::from([
            (SingleLineItem::FalseCeiling, packages(900, 1200)),
            (SingleLineItem::Painting, packages(35, 55)),
            (SingleLineItem::ElectricalWiring, packages(120, 160)),
        ]),
        bedroom: BTreeMap::from([
            (BedroomFurniture::Wardrobe, bedroom([24, 28, 32, 35], 2800, 3600)),
            (BedroomFurniture::Study, bedroom([12, 14, 16, 18], 2200, 2900)),
            (BedroomFurniture::TvUnit, bedroom([15, 18, 21, 24], 1900, 2600)),
            (BedroomFurniture::BedPanel, bedroom([20, 24, 28, 32], 1600, 2200)),
        ]),
        living_room: BTreeMap::from([
            (
                LivingRoomItem::TvUnit,
                LivingRoomPricing::Fixed {
                    price: sized([45000, 55000, 65000], [60000, 72000, 85000]),
                },
            ),
            (
                LivingRoomItem::ShoeRack,
                LivingRoomPricing::Fixed {
                    price: sized([18000, 22000, 26000], [24000, 29000, 34000]),
                },
            ),
            (
                LivingRoomItem::WallPanelling,
                LivingRoomPricing::PerArea(AreaRated {
                    area: by_room_size(60, 80, 100),
                    rate: packages(1500, 2100),
                }),
            ),
            (
                LivingRoomItem::CrockeryUnit,
                LivingRoomPricing::PerArea(AreaRated {
                    area: by_room_size(18, 24, 30),
                    rate: packages(2400, 3200),
                }),
            ),
        ]),
        kitchen: KitchenRates {
            base_unit_rate: packages(2400, 3200),
            base_unit_area: BTreeMap::from([
                (KitchenType::Straight, by_room_size(40, 50, 60)),
                (KitchenType::LShaped, by_room_size(55, 70, 85)),
                (KitchenType::Parallel, by_room_size(65, 80, 95)),
                (KitchenType::UShaped, by_room_size(80, 95, 110)),
            ]),
            accessories: BTreeMap::from([
                (KitchenAccessory::TandemBaskets, packages(8500, 12000)),
                (KitchenAccessory::BottlePullout, packages(6500, 9000)),
                (KitchenAccessory::CornerUnit, packages(14000, 19500)),
                (KitchenAccessory::WickerBasket, packages(5000, 7000)),
            ]),
        },
        pooja_room: PoojaRates {
            unit: sized([35000, 50000, 70000], [48000, 68000, 95000]),
            door: sized([12000, 15000, 18000], [16000, 20000, 24000]),
        },
        add_ons: BTreeMap::from([
            (
                AddOnItem::Sofa,
                by_bhk([(45000, 65000), (55000, 80000), (65000, 95000), (80000, 120000)]),
            ),
            (
                AddOnItem::DiningTable,
                by_bhk([(30000, 45000), (35000, 52000), (42000, 60000), (50000, 72000)]),
            ),
            (
                AddOnItem::Curtains,
                by_bhk([(15000, 22000), (25000, 36000), (35000, 50000), (45000, 65000)]),
            ),
            (
                AddOnItem::ShoeCabinet,
                by_bhk([(12000, 17000), (14000, 19000), (16000, 22000), (18000, 25000)]),
            ),
        ]),
    }
}
