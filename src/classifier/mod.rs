//! Classifier access: the offline-trained artifact and its cached handle.

pub mod artifact;
pub mod store;

pub use artifact::{load_artifact, ClassifierArtifact};
pub use store::ModelStore;

use crate::data::model::FeatureBatch;
use crate::error::ModelError;

/// Anything that maps a whole batch to one integer class code per row.
pub trait Classifier {
    fn predict(&self, batch: &FeatureBatch) -> Result<Vec<i64>, ModelError>;
}
