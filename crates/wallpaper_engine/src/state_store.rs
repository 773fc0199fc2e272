use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use wallpaper_core::RunState;

use crate::{ensure_output_dir, AtomicFileWriter, PersistError};

pub const STATE_FILENAME: &str = "previous-run.json";

pub fn state_path(home: &Path) -> PathBuf {
    home.join(STATE_FILENAME)
}

/// Load the run state stored under `home`.
///
/// A missing or unreadable document yields an empty state; the next run then
/// starts every collection from the head of its feed.
pub fn load_run_state(home: &Path) -> RunState {
    let path = state_path(home);
    let content = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("No previous run state at {:?}", path);
            return RunState::new();
        }
        Err(err) => {
            engine_warn!("Failed to read run state from {:?}: {}", path, err);
            return RunState::new();
        }
    };

    match serde_json::from_slice::<RunState>(&content) {
        Ok(state) => {
            engine_info!(
                "Loaded run state for {} collections from {:?}",
                state.len(),
                path
            );
            state
        }
        Err(err) => {
            engine_warn!("Failed to parse run state from {:?}: {}", path, err);
            RunState::new()
        }
    }
}

/// Replace the stored run state with `state`.
pub fn save_run_state(home: &Path, state: &RunState) -> Result<PathBuf, PersistError> {
    ensure_output_dir(home)?;
    let content = serde_json::to_vec_pretty(state)?;
    let writer = AtomicFileWriter::new(home.to_path_buf());
    let path = writer.write(STATE_FILENAME, &content)?;
    engine_info!("Saved run state for {} collections to {:?}", state.len(), path);
    Ok(path)
}
