use std::fs;
use std::path::PathBuf;

use engine_logging::{engine_debug, engine_info, engine_warn};
use wallpaper_core::{is_placeholder, CollectionLayout, ResolutionBucket, Sensitivity};

use crate::decode::image_dimensions;
use crate::relocate::visible_files;

/// Delete provider "image removed" placeholders from the `others` buckets.
///
/// Only files decoding to exactly the placeholder dimensions are removed;
/// undecodable files are left alone. Returns the removed paths.
pub fn filter_invalid(layout: &CollectionLayout) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for sensitivity in Sensitivity::ALL {
        let dir = layout.bucket_dir(ResolutionBucket::Others, sensitivity);
        let files = match visible_files(&dir) {
            Ok(files) => files,
            Err(err) => {
                engine_warn!("Cannot scan {:?} for placeholders: {}", dir, err);
                continue;
            }
        };

        for (_, path) in files {
            match image_dimensions(&path) {
                Ok((width, height)) if is_placeholder(width, height) => match fs::remove_file(&path) {
                    Ok(()) => {
                        engine_info!("Removed placeholder image {:?}", path);
                        removed.push(path);
                    }
                    Err(err) => engine_warn!("Failed to remove placeholder {:?}: {}", path, err),
                },
                Ok(_) => {}
                Err(err) => engine_debug!("Skipping undecodable {:?}: {}", path, err),
            }
        }
    }
    removed
}
