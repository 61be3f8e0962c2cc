//! Domain model types

pub mod estimate;
pub mod features;
pub mod vehicle;

pub use estimate::{PriceEstimate, PriceSource, Valuation};
pub use features::{ConfidenceLevel, FeatureVector, Prediction};
pub use vehicle::{VehicleIdentity, VehicleRecord};
