use super::model::{Feature, FeatureBatch, FeatureRecord};

/// Slider resolution, matching the one-decimal measurements.
pub const STEP: f64 = 0.1;

/// Round a slider position to one decimal ([`STEP`]).
pub fn snap(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Manual input – the four bounded slider values
// ---------------------------------------------------------------------------

/// Current state of the manual controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualInput {
    record: FeatureRecord,
}

impl Default for ManualInput {
    fn default() -> Self {
        let mut record = FeatureRecord::new(0.0, 0.0, 0.0, 0.0);
        for f in Feature::ALL {
            record.set(f, f.default_value());
        }
        Self { record }
    }
}

impl ManualInput {
    pub fn get(&self, feature: Feature) -> f64 {
        self.record.get(feature)
    }

    /// Set a control value, clamped to the feature's range.
    pub fn set(&mut self, feature: Feature, value: f64) {
        let range = feature.range();
        self.record
            .set(feature, value.clamp(*range.start(), *range.end()));
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A single-row batch holding exactly the control values.
    pub fn to_batch(&self) -> FeatureBatch {
        FeatureBatch::single(self.record)
    }
}
