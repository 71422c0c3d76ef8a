pub mod catalog;
pub mod configuration;
pub mod estimate;

pub use catalog::{Bhk, Category, Package};
pub use configuration::{
    AreaItem, BedroomConfig, ConfigurableItem, DerivedItem, KitchenConfig, LivingRoomConfig,
    PoojaRoomConfig, ProjectConfiguration, QuantityItem,
};
pub use estimate::{
    CategoryTotals, DocumentLine, DocumentSubtotal, Estimate, EstimateDocument, LineDetail,
    LineItem, PublicEstimate, RangeView, GRAND_TOTAL_KEY,
};
