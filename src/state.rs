use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::classifier::ModelStore;
use crate::config::AppConfig;
use crate::data::input::ManualInput;
use crate::data::loader;
use crate::data::model::{Feature, FeatureBatch};
use crate::predict::predict;
use crate::report::Report;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    IrisPrediction,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Home, Page::IrisPrediction];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "-",
            Page::IrisPrediction => "Iris Species Prediction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Prediction,
    About,
}

// ---------------------------------------------------------------------------
// Input / output slots
// ---------------------------------------------------------------------------

/// A successfully validated uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub path: PathBuf,
    pub batch: FeatureBatch,
}

impl Upload {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A prediction waiting out the spinner delay.
#[derive(Debug, Clone)]
pub struct PendingPrediction {
    pub batch: FeatureBatch,
    pub started: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Report(Report),
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    pub page: Page,
    pub tab: Tab,

    /// Slider values, used whenever no file is uploaded.
    pub manual: ManualInput,

    /// Uploaded feature table (takes precedence over the sliders).
    pub upload: Option<Upload>,

    /// Lazily loaded classifier.
    pub model: ModelStore,

    pub pending: Option<PendingPrediction>,

    /// Result of the last finished prediction.
    pub outcome: Option<Outcome>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the decorative image exists on disk.
    pub image_available: bool,
}

impl Default for AppState {
    fn default() -> Self {
        let config = AppConfig::default();
        let model = ModelStore::new(config.model_path.clone());
        Self::new(config, model)
    }
}

impl AppState {
    pub fn new(config: AppConfig, model: ModelStore) -> Self {
        let image_available = config.image_path.is_file();
        if !image_available {
            log::warn!("Image {} not found", config.image_path.display());
        }
        Self {
            config,
            page: Page::Home,
            tab: Tab::Prediction,
            manual: ManualInput::default(),
            upload: None,
            model,
            pending: None,
            outcome: None,
            status_message: None,
            image_available,
        }
    }

    /// Rows that a prediction would run on right now.
    pub fn input_batch(&self) -> FeatureBatch {
        match &self.upload {
            Some(upload) => upload.batch.clone(),
            None => self.manual.to_batch(),
        }
    }

    /// Replace the upload with the file at `path`.  On failure the previous
    /// input stays in place and the error is shown as a status message.
    pub fn load_upload(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(batch) => {
                self.upload = Some(Upload {
                    path: path.to_path_buf(),
                    batch,
                });
                self.invalidate_result();
                self.status_message = None;
            }
            Err(e) => {
                let e = anyhow::Error::new(e).context(format!("loading {}", path.display()));
                log::error!("Failed to load upload: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the upload and go back to the sliders.
    pub fn clear_upload(&mut self) {
        self.upload = None;
        self.invalidate_result();
        self.status_message = None;
    }

    /// Move one slider.  A changed value discards the shown result.
    pub fn set_manual(&mut self, feature: Feature, value: f64) {
        let before = self.manual;
        self.manual.set(feature, value);
        if self.manual != before {
            self.invalidate_result();
        }
    }

    pub fn reset_manual(&mut self) {
        if self.manual != ManualInput::default() {
            self.manual.reset();
            self.invalidate_result();
        }
    }

    /// The input changed: drop the shown outcome and any prediction still
    /// waiting on the previous input.
    fn invalidate_result(&mut self) {
        self.pending = None;
        self.outcome = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Snapshot the current input and start the spinner.
    pub fn request_prediction(&mut self, now: Instant) {
        self.pending = Some(PendingPrediction {
            batch: self.input_batch(),
            started: now,
        });
        self.outcome = None;
    }

    /// Run the pending prediction once its delay has elapsed.
    /// Returns `true` when a prediction finished during this call.
    pub fn poll_prediction(&mut self, now: Instant) -> bool {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.started) >= self.config.prediction_delay);
        if !ready {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };

        self.outcome = Some(match self.run_prediction(&pending.batch) {
            Ok(report) => Outcome::Report(report),
            Err(e) => {
                log::error!("Prediction failed: {e:#}");
                Outcome::Failed(format!("{e:#}"))
            }
        });
        true
    }

    /// Model access, dispatch and report for one batch.
    pub fn run_prediction(&self, batch: &FeatureBatch) -> Result<Report> {
        let model = self
            .model
            .get()
            .with_context(|| format!("loading classifier {}", self.model.path().display()))?;
        let result = predict(batch, model.as_ref()).context("running prediction")?;
        Report::from_result(result).context("no rows to predict")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::classifier::artifact::tests::centroid_artifact;
    use crate::data::model::{FeatureRecord, Species};
    use crate::error::ModelError;

    fn state_with_model() -> AppState {
        let config = AppConfig {
            image_path: PathBuf::from("does-not-exist.jpg"),
            ..AppConfig::default()
        };
        AppState::new(config, ModelStore::with_loader("model.json", |_| Ok(centroid_artifact())))
    }

    #[test]
    fn manual_input_feeds_prediction_until_upload() {
        let mut state = state_with_model();
        assert!(!state.image_available);
        assert_eq!(state.input_batch().len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.csv");
        std::fs::write(
            &path,
            "SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm\n5.1,3.5,1.4,0.2\n4.9,3.0,1.4,0.2\n6.7,3.0,5.8,2.2\n",
        )
        .unwrap();
        state.load_upload(&path);
        assert_eq!(state.input_batch().len(), 3);
        assert_eq!(state.upload.as_ref().unwrap().file_name(), "batch.csv");

        state.clear_upload();
        assert_eq!(state.input_batch(), state.manual.to_batch());
    }

    #[test]
    fn bad_upload_keeps_previous_input() {
        let mut state = state_with_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "SepalLengthCm,SepalWidthCm\n5.1,3.5\n").unwrap();

        state.load_upload(&path);
        assert!(state.upload.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("PetalLengthCm"), "{msg}");
    }

    #[test]
    fn prediction_waits_for_delay_then_reports_single_result() {
        let mut state = state_with_model();
        let start = Instant::now();
        state.request_prediction(start);
        assert!(state.is_pending());

        assert!(!state.poll_prediction(start + Duration::from_millis(500)));
        assert!(state.outcome.is_none());

        assert!(state.poll_prediction(start + Duration::from_secs(2)));
        assert!(!state.is_pending());
        assert_eq!(
            state.outcome,
            Some(Outcome::Report(Report::Single(Species::Versicolor)))
        );
    }

    #[test]
    fn moving_a_slider_discards_the_shown_result() {
        let mut state = state_with_model();
        let start = Instant::now();
        state.request_prediction(start);
        assert!(state.poll_prediction(start + Duration::from_secs(2)));
        assert_eq!(
            state.outcome,
            Some(Outcome::Report(Report::Single(Species::Versicolor)))
        );

        state.set_manual(Feature::PetalLength, 1.2);
        state.set_manual(Feature::PetalWidth, 0.2);
        assert!(state.outcome.is_none());

        state.request_prediction(start);
        assert!(state.poll_prediction(start + Duration::from_secs(2)));
        assert_eq!(
            state.outcome,
            Some(Outcome::Report(Report::Single(Species::Setosa)))
        );
    }

    #[test]
    fn unchanged_slider_value_keeps_the_result() {
        let mut state = state_with_model();
        let start = Instant::now();
        state.request_prediction(start);
        state.poll_prediction(start + Duration::from_secs(2));

        state.set_manual(Feature::SepalLength, Feature::SepalLength.default_value());
        state.reset_manual();
        assert!(state.outcome.is_some());
    }

    #[test]
    fn slider_change_cancels_a_pending_prediction() {
        let mut state = state_with_model();
        let start = Instant::now();
        state.request_prediction(start);
        state.set_manual(Feature::PetalLength, 1.2);

        assert!(!state.is_pending());
        assert!(!state.poll_prediction(start + Duration::from_secs(3)));
        assert!(state.outcome.is_none());
    }

    #[test]
    fn changing_the_upload_cancels_a_pending_prediction() {
        let mut state = state_with_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.csv");
        std::fs::write(
            &path,
            "SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm\n5.1,3.5,1.4,0.2\n6.7,3.0,5.8,2.2\n",
        )
        .unwrap();

        let start = Instant::now();
        state.request_prediction(start);
        state.load_upload(&path);
        assert_eq!(state.input_batch().len(), 2);
        assert!(!state.poll_prediction(start + Duration::from_secs(3)));
        assert!(state.outcome.is_none());

        state.request_prediction(start);
        state.clear_upload();
        assert!(!state.is_pending());
        assert!(!state.poll_prediction(start + Duration::from_secs(3)));
        assert!(state.outcome.is_none());
    }

    #[test]
    fn batch_prediction_reports_counts() {
        let state = state_with_model();
        let batch = FeatureBatch::new(vec![
            FeatureRecord::new(5.1, 3.5, 1.4, 0.2),
            FeatureRecord::new(4.9, 3.0, 1.4, 0.2),
            FeatureRecord::new(6.7, 3.0, 5.8, 2.2),
        ]);
        let Report::Batch { labels, counts } = state.run_prediction(&batch).unwrap() else {
            panic!("expected a batch report");
        };
        assert_eq!(
            labels,
            vec![Species::Setosa, Species::Setosa, Species::Virginica]
        );
        let entries: Vec<usize> = counts.entries().map(|(_, n)| n).collect();
        assert_eq!(entries, vec![2, 0, 1]);
    }

    #[test]
    fn model_failure_aborts_only_the_current_pass() {
        let config = AppConfig::default();
        let mut state = AppState::new(
            config,
            ModelStore::with_loader("missing.json", |_| {
                Err(ModelError::Invalid("corrupt".into()))
            }),
        );
        let start = Instant::now();
        state.request_prediction(start);
        assert!(state.poll_prediction(start + Duration::from_secs(2)));
        match &state.outcome {
            Some(Outcome::Failed(msg)) => {
                assert!(msg.contains("loading classifier missing.json"), "{msg}");
                assert!(msg.contains("corrupt"), "{msg}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // The next action starts over.
        state.request_prediction(start);
        assert!(state.is_pending());
        assert!(state.outcome.is_none());
    }
}
