//! Model artifact lookup and loading.
//!
//! The artifact location never depends on the working directory: relative
//! paths are joined onto the directory of the running executable.

use crate::logistic::LogisticModel;
use lifeboat_core::{LifeboatError, Result, SurvivalModel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Directory containing the running executable.
pub fn application_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        LifeboatError::ModelLoad(format!("cannot determine application location: {e}"))
    })?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        LifeboatError::ModelLoad(format!(
            "executable path {} has no parent directory",
            exe.display()
        ))
    })
}

/// Resolve `configured` against the application directory.
pub fn resolve_artifact_path(configured: &Path) -> Result<PathBuf> {
    if configured.is_absolute() {
        return Ok(configured.to_path_buf());
    }
    Ok(resolve_against(&application_dir()?, configured))
}

/// Resolve `configured` against an explicit base directory.
pub fn resolve_against(base: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base.join(configured)
    }
}

/// Load the model stored at `path`, choosing the adapter by file extension.
///
/// # Errors
///
/// Returns [`LifeboatError::ModelLoad`] if the file is missing, has an
/// unsupported extension, or cannot be parsed.
pub fn load_model(path: &Path) -> Result<Arc<dyn SurvivalModel>> {
    if !path.is_file() {
        return Err(LifeboatError::ModelLoad(format!(
            "model file '{}' not found; copy models/titanic_model.json next to the \
             executable or set model_path to an absolute path",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let model: Arc<dyn SurvivalModel> = match extension.as_deref() {
        Some("json") => Arc::new(LogisticModel::load(path)?) as Arc<dyn SurvivalModel>,
        #[cfg(feature = "ml")]
        Some("safetensors") => {
            Arc::new(crate::mlp::MlpModel::load(path)?) as Arc<dyn SurvivalModel>
        }
        #[cfg(not(feature = "ml"))]
        Some("safetensors") => {
            return Err(LifeboatError::ModelLoad(format!(
                "'{}' needs the `ml` feature, which this build does not include",
                path.display()
            )))
        }
        _ => {
            return Err(LifeboatError::ModelLoad(format!(
                "unsupported model artifact '{}', expected .json or .safetensors",
                path.display()
            )))
        }
    };

    info!(path = %path.display(), model = model.name(), "Loaded survival model");
    Ok(model)
}
