pub mod defaults;
pub mod store;
pub mod table;

pub use store::RateStore;
pub use table::{AreaRated, KitchenRates, LivingRoomPricing, PoojaRates, RateTable};
