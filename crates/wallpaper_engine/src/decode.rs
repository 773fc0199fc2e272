use std::io;
use std::path::{Path, PathBuf};

use image::ImageReader;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to open {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read dimensions of {path:?}: {source}")]
    Dimensions {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Read pixel dimensions from an image header, sniffing the format from content.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), DecodeError> {
    let open_err = |source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?;
    reader
        .into_dimensions()
        .map_err(|source| DecodeError::Dimensions {
            path: path.to_path_buf(),
            source,
        })
}
