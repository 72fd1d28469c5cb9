use crate::classifier::Classifier;
use crate::data::model::{FeatureBatch, LabelMap, PredictionResult};
use crate::error::PredictError;

/// Run the classifier over the whole batch in one call and translate its
/// codes to species, one per row in row order.
pub fn predict<C>(batch: &FeatureBatch, classifier: &C) -> Result<PredictionResult, PredictError>
where
    C: Classifier + ?Sized,
{
    let codes = classifier.predict(batch)?;
    if codes.len() != batch.len() {
        return Err(PredictError::LengthMismatch {
            expected: batch.len(),
            got: codes.len(),
        });
    }

    let labels = codes
        .into_iter()
        .map(LabelMap::species_for)
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Predicted {} rows", labels.len());

    Ok(PredictionResult { labels })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::model::{FeatureRecord, Species};
    use crate::error::ModelError;

    /// Returns canned codes and records how often it was called.
    struct FixedClassifier {
        codes: Vec<i64>,
        calls: Cell<usize>,
    }

    impl FixedClassifier {
        fn new(codes: Vec<i64>) -> Self {
            Self {
                codes,
                calls: Cell::new(0),
            }
        }
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _batch: &FeatureBatch) -> Result<Vec<i64>, ModelError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.codes.clone())
        }
    }

    fn batch_of(n: usize) -> FeatureBatch {
        FeatureBatch::new(vec![FeatureRecord::new(5.8, 3.0, 4.3, 1.3); n])
    }

    #[test]
    fn manual_input_maps_code_one_to_versicolor() {
        let classifier = FixedClassifier::new(vec![1]);
        let result = predict(&batch_of(1), &classifier).unwrap();
        assert_eq!(result.labels, vec![Species::Versicolor]);
        assert_eq!(result.label_strings(), vec!["Iris-versicolor"]);
    }

    #[test]
    fn batch_is_dispatched_in_a_single_call() {
        let classifier = FixedClassifier::new(vec![0, 0, 2]);
        let result = predict(&batch_of(3), &classifier).unwrap();
        assert_eq!(classifier.calls.get(), 1);
        assert_eq!(
            result.label_strings(),
            vec!["Iris-setosa", "Iris-setosa", "Iris-virginica"]
        );
    }

    #[test]
    fn unknown_code_is_rejected() {
        let classifier = FixedClassifier::new(vec![0, 5]);
        assert!(matches!(
            predict(&batch_of(2), &classifier),
            Err(PredictError::UnknownLabel(5))
        ));
    }

    #[test]
    fn code_count_must_match_rows() {
        let classifier = FixedClassifier::new(vec![0]);
        assert!(matches!(
            predict(&batch_of(2), &classifier),
            Err(PredictError::LengthMismatch {
                expected: 2,
                got: 1
            })
        ));
    }
}
