//! The persisted training output and its process-wide cache.
//!
//! An [`Artifact`] bundles everything the dashboard needs: the fitted model,
//! the label encoder, the feature order, held-out metrics and the ranked
//! feature importances. It is written once by the trainer as MessagePack and
//! only ever read afterwards.

use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info, instrument};

use crate::boost::{FeatureImportance, GradientBoostedTrees};
use crate::encoder::LabelEncoder;
use crate::error::ArtifactError;

/// Bumped whenever the artifact layout or feature encoding changes.
pub const FORMAT_VERSION: u32 = 1;

/// Held-out evaluation results recorded at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub format_version: u32,
    pub model: GradientBoostedTrees,
    pub encoder: LabelEncoder,
    /// Feature names in the exact column order the model was fitted on.
    pub features: Vec<String>,
    pub metrics: Metrics,
    /// Sorted by descending importance.
    pub importances: Vec<FeatureImportance>,
}

impl Artifact {
    /// Saves the artifact to a MessagePack file.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let write_err = |source| ArtifactError::WriteArtifact {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        write_named(&mut writer, self)?;
        writer.flush().map_err(write_err)?;
        info!("artifact saved");
        Ok(())
    }

    /// Loads an artifact, rejecting files written with another format version.
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::ReadArtifact {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: Artifact =
            from_read(BufReader::new(file)).map_err(|source| ArtifactError::DecodeArtifact {
                path: path.to_path_buf(),
                source,
            })?;

        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::IncompatibleArtifact {
                path: path.to_path_buf(),
                expected: FORMAT_VERSION,
                found: artifact.format_version,
            });
        }

        debug!(
            n_classes = artifact.encoder.len(),
            n_features = artifact.features.len(),
            "artifact loaded"
        );
        Ok(artifact)
    }
}

type Loader = dyn Fn(&Path) -> Result<Artifact, ArtifactError> + Send + Sync;

/// Loads an artifact on first use and hands out the same shared copy
/// afterwards.
///
/// The loader runs at most once per cache, even when several threads ask
/// for the artifact at the same time. A failed load is not cached.
pub struct ArtifactCache {
    path: PathBuf,
    loader: Box<Loader>,
    cell: OnceLock<Arc<Artifact>>,
    init: Mutex<()>,
}

impl std::fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("path", &self.path)
            .field("loaded", &self.cell.get().is_some())
            .finish()
    }
}

impl ArtifactCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_loader(path, Artifact::load)
    }

    pub fn with_loader<F>(path: impl Into<PathBuf>, loader: F) -> Self
    where
        F: Fn(&Path) -> Result<Artifact, ArtifactError> + Send + Sync + 'static,
    {
        ArtifactCache {
            path: path.into(),
            loader: Box::new(loader),
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Returns the cached artifact, loading it first if needed.
    pub fn get(&self) -> Result<Arc<Artifact>, ArtifactError> {
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(artifact) = self.cell.get() {
            return Ok(Arc::clone(artifact));
        }

        info!(path = %self.path.display(), "loading artifact");
        let artifact = Arc::new((self.loader)(&self.path)?);
        let _ = self.cell.set(Arc::clone(&artifact));
        Ok(artifact)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
