use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::engine_debug;
use wallpaper_core::ImageSource;

use crate::filename::{extension_for_content_type, image_file_name};
use crate::{AtomicFileWriter, FetchError, Fetcher, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Fetches image sources and writes them under their provider id.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    append_extension: bool,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, append_extension: bool) -> Self {
        Self {
            fetcher,
            append_extension,
        }
    }

    /// Download `source` into `dest_dir`, replacing any file of the same name.
    ///
    /// Nothing is written unless the response is a successful image response.
    pub async fn download(
        &self,
        source: &ImageSource,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let output = self.fetcher.fetch(&source.url).await?;

        let extension = if self.append_extension {
            output
                .metadata
                .content_type
                .as_deref()
                .and_then(extension_for_content_type)
        } else {
            None
        };
        let file_name = image_file_name(&source.name, extension);

        let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
        let bytes = output.bytes;
        let path = tokio::task::spawn_blocking(move || writer.write(&file_name, &bytes))
            .await
            .map_err(|err| PersistError::Io(std::io::Error::other(err)))??;

        engine_debug!(
            "Downloaded {} ({} bytes) to {:?}",
            source.url,
            output.metadata.byte_len,
            path
        );
        Ok(path)
    }
}
