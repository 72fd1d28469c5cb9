use crate::data::model::{PredictionResult, Species, SpeciesCounts};

/// What the result area shows for a finished prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// One input row: a highlighted inline label.
    Single(Species),
    /// Several rows: a per-row table plus the distribution chart.
    Batch {
        labels: Vec<Species>,
        counts: SpeciesCounts,
    },
}

impl Report {
    /// `None` for an empty result; uploads never produce one.
    pub fn from_result(result: PredictionResult) -> Option<Report> {
        match result.labels.len() {
            0 => None,
            1 => Some(Report::Single(result.labels[0])),
            _ => {
                let counts = SpeciesCounts::from_labels(&result.labels);
                Some(Report::Batch {
                    labels: result.labels,
                    counts,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_is_inline() {
        let result = PredictionResult {
            labels: vec![Species::Versicolor],
        };
        assert_eq!(
            Report::from_result(result),
            Some(Report::Single(Species::Versicolor))
        );
    }

    #[test]
    fn several_rows_are_tabulated_and_counted() {
        let result = PredictionResult {
            labels: vec![Species::Setosa, Species::Setosa, Species::Virginica],
        };
        let Some(Report::Batch { labels, counts }) = Report::from_result(result) else {
            panic!("expected a batch report");
        };
        assert_eq!(
            labels,
            vec![Species::Setosa, Species::Setosa, Species::Virginica]
        );
        assert_eq!(counts.get(Species::Setosa), 2);
        assert_eq!(counts.get(Species::Versicolor), 0);
        assert_eq!(counts.get(Species::Virginica), 1);
    }

    #[test]
    fn empty_result_has_no_report() {
        assert_eq!(Report::from_result(PredictionResult::default()), None);
    }
}
