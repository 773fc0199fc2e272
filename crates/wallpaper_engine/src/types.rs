use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use wallpaper_core::{ResolutionBucket, Sensitivity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Layout,
    Fetching,
    Relocating,
    Filtering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Layout => "layout",
            Stage::Fetching => "fetching",
            Stage::Relocating => "relocating",
            Stage::Filtering => "filtering",
        };
        f.write_str(label)
    }
}

/// Observable progress of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    CollectionFetched {
        collection: String,
        sources: usize,
        finished: bool,
    },
    CollectionFailed {
        collection: String,
        stage: Stage,
        message: String,
    },
    SourceDownloaded {
        collection: String,
        name: String,
        path: PathBuf,
    },
    SourceSkipped {
        collection: String,
        name: String,
        reason: String,
    },
    FileRelocated {
        collection: String,
        file_name: String,
        bucket: ResolutionBucket,
        sensitivity: Sensitivity,
    },
    FileUnclassified {
        collection: String,
        file_name: String,
        reason: String,
    },
    PlaceholderRemoved {
        collection: String,
        path: PathBuf,
    },
    StateSaved {
        path: PathBuf,
    },
    StateSaveFailed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Bytes,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    MissingContentType,
    Parse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::MissingContentType => write!(f, "missing content type"),
            FailureKind::Parse => write!(f, "unparsable body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Per-stage counts of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub collections_fetched: usize,
    pub collections_failed: usize,
    pub collections_skipped: usize,
    pub sources_found: usize,
    pub downloaded: usize,
    pub download_skipped: usize,
    pub relocated: usize,
    pub unclassified: usize,
    pub placeholders_removed: usize,
    pub state_saved: bool,
}
