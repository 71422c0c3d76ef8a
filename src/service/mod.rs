pub mod estimator;
pub mod pricing;
pub mod range;

pub use estimator::EstimatorService;
pub use pricing::PricingEngine;
pub use range::{format_inr, PriceRange};
