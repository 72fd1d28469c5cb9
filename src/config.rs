use std::path::PathBuf;
use std::time::Duration;

/// Fixed application settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Serialized classifier produced by the offline training step.
    pub model_path: PathBuf,
    /// Decorative picture shown above the input table.
    pub image_path: PathBuf,
    /// Spinner time before a prediction runs.
    pub prediction_delay: Duration,
    /// Credit line in the page header: author name and profile link.
    pub author_name: String,
    pub author_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Machine Learning Dashboard – Iris Prediction".to_string(),
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
            model_path: PathBuf::from("generate_iris.json"),
            image_path: PathBuf::from("iris.JPG"),
            prediction_delay: Duration::from_secs(2),
            author_name: "Muhammad Alif Fahrezi".to_string(),
            author_url: "https://www.linkedin.com/in/aliffahrezii/".to_string(),
        }
    }
}
