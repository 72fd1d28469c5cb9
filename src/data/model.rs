use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

// ---------------------------------------------------------------------------
// Feature – one of the four measured columns
// ---------------------------------------------------------------------------

/// The four Iris measurements, in the canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::SepalLength,
        Feature::SepalWidth,
        Feature::PetalLength,
        Feature::PetalWidth,
    ];

    /// Exact header name expected in uploaded files and model artifacts.
    pub fn column(self) -> &'static str {
        match self {
            Feature::SepalLength => "SepalLengthCm",
            Feature::SepalWidth => "SepalWidthCm",
            Feature::PetalLength => "PetalLengthCm",
            Feature::PetalWidth => "PetalWidthCm",
        }
    }

    /// Human-readable slider label.
    pub fn label(self) -> &'static str {
        match self {
            Feature::SepalLength => "Sepal Length (cm)",
            Feature::SepalWidth => "Sepal Width (cm)",
            Feature::PetalLength => "Petal Length (cm)",
            Feature::PetalWidth => "Petal Width (cm)",
        }
    }

    /// Range observed in the reference dataset; bounds the manual controls.
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Feature::SepalLength => 4.3..=7.9,
            Feature::SepalWidth => 2.0..=4.4,
            Feature::PetalLength => 1.0..=6.9,
            Feature::PetalWidth => 0.1..=2.5,
        }
    }

    pub fn default_value(self) -> f64 {
        match self {
            Feature::SepalLength => 5.8,
            Feature::SepalWidth => 3.0,
            Feature::PetalLength => 4.3,
            Feature::PetalWidth => 1.3,
        }
    }

    pub fn from_column(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.column() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// FeatureRecord / FeatureBatch – rows fed to the classifier
// ---------------------------------------------------------------------------

/// One sample with the four measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "SepalLengthCm")]
    pub sepal_length: f64,
    #[serde(rename = "SepalWidthCm")]
    pub sepal_width: f64,
    #[serde(rename = "PetalLengthCm")]
    pub petal_length: f64,
    #[serde(rename = "PetalWidthCm")]
    pub petal_width: f64,
}

impl FeatureRecord {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::SepalLength => self.sepal_length,
            Feature::SepalWidth => self.sepal_width,
            Feature::PetalLength => self.petal_length,
            Feature::PetalWidth => self.petal_width,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::SepalLength => self.sepal_length = value,
            Feature::SepalWidth => self.sepal_width = value,
            Feature::PetalLength => self.petal_length = value,
            Feature::PetalWidth => self.petal_width = value,
        }
    }

    /// Values in canonical column order.
    pub fn to_vec(&self) -> Vec<f64> {
        Feature::ALL.iter().map(|&f| self.get(f)).collect()
    }
}

/// Ordered rows; row order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureBatch {
    pub records: Vec<FeatureRecord>,
}

impl FeatureBatch {
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self { records }
    }

    pub fn single(record: FeatureRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRecord> {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Species / LabelMap – classifier output codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    /// Fixed presentation order.
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    pub fn label(self) -> &'static str {
        match self {
            Species::Setosa => "Iris-setosa",
            Species::Versicolor => "Iris-versicolor",
            Species::Virginica => "Iris-virginica",
        }
    }

    /// Axis label used in the distribution chart.
    pub fn short_label(self) -> &'static str {
        match self {
            Species::Setosa => "Setosa",
            Species::Versicolor => "Versicolor",
            Species::Virginica => "Virginica",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Species::Setosa => 0,
            Species::Versicolor => 1,
            Species::Virginica => 2,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed mapping between classifier codes and species.
pub struct LabelMap;

impl LabelMap {
    /// Codes outside `{0, 1, 2}` are rejected rather than guessed.
    pub fn species_for(code: i64) -> Result<Species, PredictError> {
        match code {
            0 => Ok(Species::Setosa),
            1 => Ok(Species::Versicolor),
            2 => Ok(Species::Virginica),
            other => Err(PredictError::UnknownLabel(other)),
        }
    }

    pub fn code_for(species: Species) -> i64 {
        species.index() as i64
    }
}

// ---------------------------------------------------------------------------
// PredictionResult / SpeciesCounts
// ---------------------------------------------------------------------------

/// One species per input row, positionally aligned with the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    pub labels: Vec<Species>,
}

impl PredictionResult {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_strings(&self) -> Vec<&'static str> {
        self.labels.iter().map(|s| s.label()).collect()
    }
}

/// Occurrences per species, indexed in [`Species::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesCounts {
    counts: [usize; 3],
}

impl SpeciesCounts {
    pub fn from_labels(labels: &[Species]) -> Self {
        let mut counts = [0usize; 3];
        for s in labels {
            counts[s.index()] += 1;
        }
        Self { counts }
    }

    pub fn get(&self, species: Species) -> usize {
        self.counts[species.index()]
    }

    /// `(species, count)` pairs in fixed order, zero-filled.
    pub fn entries(&self) -> impl Iterator<Item = (Species, usize)> + '_ {
        Species::ALL.into_iter().map(|s| (s, self.get(s)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_map_is_bijective_over_known_codes() {
        for code in 0..3 {
            let species = LabelMap::species_for(code).unwrap();
            assert_eq!(LabelMap::code_for(species), code);
        }
        let labels: Vec<&str> = (0..3)
            .map(|c| LabelMap::species_for(c).unwrap().label())
            .collect();
        assert_eq!(labels, ["Iris-setosa", "Iris-versicolor", "Iris-virginica"]);
    }

    #[test]
    fn label_map_rejects_unknown_codes() {
        assert!(matches!(
            LabelMap::species_for(3),
            Err(PredictError::UnknownLabel(3))
        ));
        assert!(matches!(
            LabelMap::species_for(-1),
            Err(PredictError::UnknownLabel(-1))
        ));
    }

    #[test]
    fn counts_are_zero_filled_in_fixed_order() {
        let counts = SpeciesCounts::from_labels(&[
            Species::Virginica,
            Species::Setosa,
            Species::Setosa,
        ]);
        let entries: Vec<(Species, usize)> = counts.entries().collect();
        assert_eq!(
            entries,
            vec![
                (Species::Setosa, 2),
                (Species::Versicolor, 0),
                (Species::Virginica, 1)
            ]
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn feature_columns_resolve_back() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_column(f.column()), Some(f));
            assert!(f.range().contains(&f.default_value()));
        }
        assert_eq!(Feature::from_column("Species"), None);
    }
}
