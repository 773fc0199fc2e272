use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_warn};
use futures_util::stream::{self, StreamExt};
use wallpaper_core::{classify, CollectionLayout, ResolutionBucket, Sensitivity};

use crate::decode::image_dimensions;
use crate::persist::move_file;

/// What happened to one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    Moved {
        file_name: String,
        bucket: ResolutionBucket,
        destination: PathBuf,
    },
    /// Could not be decoded or moved; left in staging.
    LeftInStaging { file_name: String, reason: String },
}

/// Regular, non-hidden files directly inside `dir`, sorted by name.
pub(crate) fn visible_files(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(file_name) = entry.file_name().into_string() else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        files.push((file_name, entry.path()));
    }
    files.sort();
    Ok(files)
}

/// Drain one staging partition into resolution buckets.
///
/// Files are independent, so up to `concurrency` are decoded and moved at a
/// time. A file that cannot be decoded stays where it is.
pub async fn relocate_staged(
    layout: &CollectionLayout,
    sensitivity: Sensitivity,
    concurrency: usize,
) -> io::Result<Vec<Relocation>> {
    let staging = layout.staging_dir(sensitivity);
    let files = visible_files(&staging)?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let outcomes = stream::iter(files)
        .map(|(file_name, path)| {
            let layout = layout.clone();
            async move {
                let name = file_name.clone();
                tokio::task::spawn_blocking(move || relocate_one(&layout, sensitivity, file_name, &path))
                    .await
                    .unwrap_or_else(|err| Relocation::LeftInStaging {
                        file_name: name,
                        reason: err.to_string(),
                    })
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Ok(outcomes)
}

fn relocate_one(
    layout: &CollectionLayout,
    sensitivity: Sensitivity,
    file_name: String,
    path: &Path,
) -> Relocation {
    let (width, height) = match image_dimensions(path) {
        Ok(dimensions) => dimensions,
        Err(err) => {
            engine_warn!("Leaving {:?} in staging: {}", path, err);
            return Relocation::LeftInStaging {
                file_name,
                reason: err.to_string(),
            };
        }
    };

    let bucket = classify(width, height);
    let destination = layout.bucket_dir(bucket, sensitivity).join(&file_name);
    match move_file(path, &destination) {
        Ok(()) => {
            engine_debug!("Moved {:?} ({}x{}) to {:?}", path, width, height, destination);
            Relocation::Moved {
                file_name,
                bucket,
                destination,
            }
        }
        Err(err) => {
            engine_warn!("Failed to move {:?} to {:?}: {}", path, destination, err);
            Relocation::LeftInStaging {
                file_name,
                reason: err.to_string(),
            }
        }
    }
}
