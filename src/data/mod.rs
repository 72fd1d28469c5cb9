/// Data layer: core types, input acquisition.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        sliders
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │  validate    │  input    │  clamp to range
///   └──────────┘               └──────────┘
///        │                           │
///        └───────────┬───────────────┘
///                    ▼
///             ┌──────────────┐
///             │ FeatureBatch  │  Vec<FeatureRecord>, row order kept
///             └──────────────┘
/// ```

pub mod input;
pub mod loader;
pub mod model;
