use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::artifact::{load_artifact, ClassifierArtifact};
use crate::error::ModelError;

type Loader = Box<dyn Fn(&Path) -> Result<ClassifierArtifact, ModelError>>;

// ---------------------------------------------------------------------------
// ModelStore – lazily loaded, shared classifier handle
// ---------------------------------------------------------------------------

/// Owns the classifier for the lifetime of the application.
///
/// The artifact is read and validated on the first [`ModelStore::get`] and
/// the same `Arc` is handed out afterwards.  A failed load leaves the store empty,
/// so the next request tries again.
pub struct ModelStore {
    path: PathBuf,
    loader: Loader,
    cell: OnceLock<Arc<ClassifierArtifact>>,
}

impl ModelStore {
    /// Store backed by the JSON artifact at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, load_artifact)
    }

    pub fn with_loader<F>(path: impl Into<PathBuf>, loader: F) -> Self
    where
        F: Fn(&Path) -> Result<ClassifierArtifact, ModelError> + 'static,
    {
        Self {
            path: path.into(),
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the cached classifier, loading it on first use.
    pub fn get(&self) -> Result<Arc<ClassifierArtifact>, ModelError> {
        if let Some(model) = self.cell.get() {
            return Ok(Arc::clone(model));
        }
        log::debug!("Loading classifier from {}", self.path.display());
        let model = (self.loader)(&self.path)?;
        model.validate()?;
        let model = Arc::new(model);
        Ok(Arc::clone(self.cell.get_or_init(|| model)))
    }
}

impl fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
