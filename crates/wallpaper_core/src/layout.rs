use std::path::{Path, PathBuf};

use crate::{ResolutionBucket, Sensitivity};

/// Name of the per-collection staging directory.
pub const STAGING_DIR: &str = "temp";

/// Directory layout of one collection under the working home:
/// `<home>/<collection>/{2560x1440,1920x1080,large,others,temp}/{normal,nsfw}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionLayout {
    collection: String,
    root: PathBuf,
}

impl CollectionLayout {
    pub fn new(home: &Path, collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            root: home.join(collection),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_dir(&self, bucket: ResolutionBucket, sensitivity: Sensitivity) -> PathBuf {
        self.root.join(bucket.dir_name()).join(sensitivity.dir_name())
    }

    pub fn staging_dir(&self, sensitivity: Sensitivity) -> PathBuf {
        self.root.join(STAGING_DIR).join(sensitivity.dir_name())
    }

    /// Every leaf directory of the layout, buckets first, staging last.
    pub fn leaf_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity((ResolutionBucket::ALL.len() + 1) * 2);
        for bucket in ResolutionBucket::ALL {
            for sensitivity in Sensitivity::ALL {
                dirs.push(self.bucket_dir(bucket, sensitivity));
            }
        }
        for sensitivity in Sensitivity::ALL {
            dirs.push(self.staging_dir(sensitivity));
        }
        dirs
    }
}
