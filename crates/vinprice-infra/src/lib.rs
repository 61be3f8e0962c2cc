//! Infrastructure layer - dataset loader, rule persistence, model artifact

pub mod dataset;
pub mod model_artifact;
pub mod persistence;

pub use dataset::{load_dataset, Dataset};
pub use model_artifact::LinearModelArtifact;
