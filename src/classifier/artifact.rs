use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::data::model::{Feature, FeatureBatch, FeatureRecord};
use crate::error::ModelError;

// ---------------------------------------------------------------------------
// Serialized artifact
// ---------------------------------------------------------------------------

/// The pre-trained classifier as written by the offline training step.
///
/// ```json
/// {
///   "kind": "rbf",
///   "classes": [0, 1, 2],
///   "feature_names": ["SepalLengthCm", "SepalWidthCm", "PetalLengthCm", "PetalWidthCm"],
///   "scaler": { "mean": [...], "scale": [...] },
///   "gamma": 0.25,
///   "support_vectors": [[...], ...],
///   "dual_coefficients": [[...], [...], [...]],
///   "intercepts": [...]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Integer code emitted for each class, in estimator order.
    pub classes: Vec<i64>,
    /// Column order the estimator was fitted on.
    pub feature_names: Vec<String>,
    /// Standardization applied before the estimator, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    #[serde(flatten)]
    pub estimator: Estimator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Estimators that can be evaluated without the training library.
/// Each produces one score per class; the highest score wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// One-vs-rest linear decision functions: `w_k · x + b_k`.
    Linear {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// One-vs-rest RBF-kernel SVM sharing a set of support vectors:
    /// `Σ_i α_ki · exp(-γ ‖x - sv_i‖²) + b_k`.
    Rbf {
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Closest class centroid by squared Euclidean distance.
    NearestCentroid { centroids: Vec<Vec<f64>> },
}

impl Estimator {
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::Linear { .. } => "Linear (one-vs-rest)",
            Estimator::Rbf { .. } => "Support Vector Machine (RBF kernel)",
            Estimator::NearestCentroid { .. } => "Nearest centroid",
        }
    }

    fn scores(&self, x: &[f64]) -> Vec<f64> {
        match self {
            Estimator::Linear {
                coefficients,
                intercepts,
            } => coefficients
                .iter()
                .zip(intercepts)
                .map(|(w, b)| dot(w, x) + b)
                .collect(),
            Estimator::Rbf {
                gamma,
                support_vectors,
                dual_coefficients,
                intercepts,
            } => {
                let kernel: Vec<f64> = support_vectors
                    .iter()
                    .map(|sv| (-gamma * squared_distance(sv, x)).exp())
                    .collect();
                dual_coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(alpha, b)| dot(alpha, &kernel) + b)
                    .collect()
            }
            Estimator::NearestCentroid { centroids } => centroids
                .iter()
                .map(|c| -squared_distance(c, x))
                .collect(),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

/// Read, parse and validate the artifact at `path`.
pub fn load_artifact(path: &Path) -> Result<ClassifierArtifact, ModelError> {
    let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ClassifierArtifact =
        serde_json::from_str(&text).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.validate()?;

    log::info!(
        "Loaded {} classifier with {} classes from {}",
        artifact.estimator.name(),
        artifact.classes.len(),
        path.display()
    );
    Ok(artifact)
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::Invalid(msg.into())
}

fn check_rows(name: &str, rows: &[Vec<f64>], expected_rows: usize, width: usize) -> Result<(), ModelError> {
    if rows.len() != expected_rows {
        return Err(invalid(format!(
            "{name} has {} rows, expected {expected_rows}",
            rows.len()
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(invalid(format!(
            "{name}[{i}] has {} values, expected {width}",
            row.len()
        )));
    }
    Ok(())
}

impl ClassifierArtifact {
    /// Check that every dimension agrees with the class list and features.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(invalid("no classes"));
        }
        let unique: BTreeSet<i64> = self.classes.iter().copied().collect();
        if unique.len() != n_classes {
            return Err(invalid("duplicate class codes"));
        }

        let order = self.feature_order()?;
        let width = order.len();

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(invalid("scaler dimensions do not match features"));
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(invalid("scaler has a zero or non-finite scale"));
            }
        }

        match &self.estimator {
            Estimator::Linear {
                coefficients,
                intercepts,
            } => {
                check_rows("coefficients", coefficients, n_classes, width)?;
                if intercepts.len() != n_classes {
                    return Err(invalid("intercepts do not match classes"));
                }
            }
            Estimator::Rbf {
                gamma,
                support_vectors,
                dual_coefficients,
                intercepts,
            } => {
                if !(gamma.is_finite() && *gamma > 0.0) {
                    return Err(invalid(format!("gamma must be positive, got {gamma}")));
                }
                if support_vectors.is_empty() {
                    return Err(invalid("no support vectors"));
                }
                check_rows("support_vectors", support_vectors, support_vectors.len(), width)?;
                check_rows(
                    "dual_coefficients",
                    dual_coefficients,
                    n_classes,
                    support_vectors.len(),
                )?;
                if intercepts.len() != n_classes {
                    return Err(invalid("intercepts do not match classes"));
                }
            }
            Estimator::NearestCentroid { centroids } => {
                check_rows("centroids", centroids, n_classes, width)?;
            }
        }
        Ok(())
    }

    /// Resolve `feature_names` into features.  Must name each feature once.
    pub fn feature_order(&self) -> Result<Vec<Feature>, ModelError> {
        let mut order = Vec::with_capacity(self.feature_names.len());
        for name in &self.feature_names {
            let feature = Feature::from_column(name)
                .ok_or_else(|| invalid(format!("unknown feature '{name}'")))?;
            if order.contains(&feature) {
                return Err(invalid(format!("feature '{name}' listed twice")));
            }
            order.push(feature);
        }
        if order.len() != Feature::ALL.len() {
            return Err(invalid(format!(
                "expected {} features, got {}",
                Feature::ALL.len(),
                order.len()
            )));
        }
        Ok(order)
    }

    fn prepare(&self, record: &FeatureRecord, order: &[Feature]) -> Vec<f64> {
        let raw = order.iter().map(|&f| record.get(f));
        match &self.scaler {
            Some(s) => raw
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(v, (m, sc))| (v - m) / sc)
                .collect(),
            None => raw.collect(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, batch: &FeatureBatch) -> Result<Vec<i64>, ModelError> {
        let order = self.feature_order()?;
        batch
            .iter()
            .map(|record| {
                let x = self.prepare(record, &order);
                let scores = self.estimator.scores(&x);
                let best = scores
                    .iter()
                    .enumerate()
                    .fold(None::<(usize, f64)>, |best, (i, &s)| match best {
                        Some((_, b)) if b.total_cmp(&s).is_ge() => best,
                        _ => Some((i, s)),
                    })
                    .map(|(i, _)| i)
                    .ok_or_else(|| invalid("estimator produced no scores"))?;
                self.classes.get(best).copied().ok_or_else(|| {
                    invalid(format!("score {best} has no class code"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn names() -> Vec<String> {
        Feature::ALL.iter().map(|f| f.column().to_string()).collect()
    }

    /// Published Iris class means.
    pub(crate) fn centroid_artifact() -> ClassifierArtifact {
        ClassifierArtifact {
            classes: vec![0, 1, 2],
            feature_names: names(),
            scaler: None,
            estimator: Estimator::NearestCentroid {
                centroids: vec![
                    vec![5.006, 3.428, 1.462, 0.246],
                    vec![5.936, 2.770, 4.260, 1.326],
                    vec![6.588, 2.974, 5.552, 2.026],
                ],
            },
        }
    }

    #[test]
    fn nearest_centroid_predicts_typical_samples() {
        let model = centroid_artifact();
        model.validate().unwrap();
        let batch = FeatureBatch::new(vec![
            FeatureRecord::new(5.1, 3.5, 1.4, 0.2),
            FeatureRecord::new(5.8, 3.0, 4.3, 1.3),
            FeatureRecord::new(6.7, 3.0, 5.8, 2.2),
        ]);
        assert_eq!(model.predict(&batch).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn linear_scores_with_scaler_and_reordered_features() {
        // Petal width first; class 7 wins on wide petals, class 3 otherwise.
        let model = ClassifierArtifact {
            classes: vec![3, 7],
            feature_names: vec![
                "PetalWidthCm".into(),
                "SepalLengthCm".into(),
                "SepalWidthCm".into(),
                "PetalLengthCm".into(),
            ],
            scaler: Some(StandardScaler {
                mean: vec![1.0, 0.0, 0.0, 0.0],
                scale: vec![0.5, 1.0, 1.0, 1.0],
            }),
            estimator: Estimator::Linear {
                coefficients: vec![vec![0.0; 4], vec![1.0, 0.0, 0.0, 0.0]],
                intercepts: vec![0.0, 0.0],
            },
        };
        model.validate().unwrap();
        let batch = FeatureBatch::new(vec![
            FeatureRecord::new(5.0, 3.0, 1.5, 0.2),
            FeatureRecord::new(5.0, 3.0, 1.5, 2.0),
        ]);
        assert_eq!(model.predict(&batch).unwrap(), vec![3, 7]);
    }

    #[test]
    fn rbf_prefers_class_of_nearby_support_vector() {
        let model = ClassifierArtifact {
            classes: vec![0, 1, 2],
            feature_names: names(),
            scaler: None,
            estimator: Estimator::Rbf {
                gamma: 0.5,
                support_vectors: vec![
                    vec![5.0, 3.4, 1.5, 0.2],
                    vec![5.9, 2.8, 4.3, 1.3],
                    vec![6.6, 3.0, 5.6, 2.0],
                ],
                dual_coefficients: vec![
                    vec![1.0, -0.5, -0.5],
                    vec![-0.5, 1.0, -0.5],
                    vec![-0.5, -0.5, 1.0],
                ],
                intercepts: vec![0.0, 0.0, 0.0],
            },
        };
        model.validate().unwrap();
        let batch = FeatureBatch::new(vec![
            FeatureRecord::new(6.6, 3.0, 5.5, 2.1),
            FeatureRecord::new(5.0, 3.3, 1.4, 0.2),
        ]);
        assert_eq!(model.predict(&batch).unwrap(), vec![2, 0]);
    }

    #[test]
    fn validation_rejects_inconsistent_dimensions() {
        let mut model = centroid_artifact();
        model.estimator = Estimator::NearestCentroid {
            centroids: vec![vec![5.0, 3.4, 1.5, 0.2]],
        };
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));

        let mut model = centroid_artifact();
        model.feature_names[3] = "Species".into();
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));

        let mut model = centroid_artifact();
        model.classes = vec![0, 0, 2];
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn unvalidated_mismatch_is_an_error_not_a_panic() {
        let mut model = centroid_artifact();
        model.classes = vec![0];
        let batch = FeatureBatch::single(FeatureRecord::new(6.7, 3.0, 5.8, 2.2));
        assert!(matches!(model.predict(&batch), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn load_artifact_reads_json_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("model.json");
        let json = serde_json::to_string(&centroid_artifact()).unwrap();
        assert!(json.contains("\"kind\":\"nearest_centroid\""));
        std::fs::write(&path, json).unwrap();
        let loaded = load_artifact(&path).unwrap();
        assert_eq!(loaded.classes, vec![0, 1, 2]);
        assert!(matches!(loaded.estimator, Estimator::NearestCentroid { .. }));
        let batch = FeatureBatch::single(FeatureRecord::new(5.1, 3.5, 1.4, 0.2));
        assert_eq!(loaded.predict(&batch).unwrap(), vec![0]);

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{\"kind\": \"linear\"").unwrap();
        assert!(matches!(
            load_artifact(&corrupt),
            Err(ModelError::Parse { .. })
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_artifact(&missing), Err(ModelError::Io { .. })));
    }
}
