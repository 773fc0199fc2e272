//! Wallpaper engine: network, filesystem and orchestration for ingestion runs.
mod api;
mod decode;
mod download;
mod fetch;
mod filename;
mod filter;
mod paginate;
mod persist;
mod pipeline;
mod relocate;
mod state_store;
mod types;

pub use api::{
    user_agent_for, AccessToken, ApiSettings, AuthError, Credentials, ListingApi, RedditClient,
    PRODUCT_TOKEN,
};
pub use decode::{image_dimensions, DecodeError};
pub use download::{DownloadError, Downloader};
pub use fetch::{FetchSettings, Fetcher, NoopProgressSink, ProgressSink, ReqwestFetcher};
pub use filename::{extension_for_content_type, image_file_name};
pub use filter::filter_invalid;
pub use paginate::{paginate, CollectionPage};
pub use persist::{ensure_layout, ensure_output_dir, move_file, AtomicFileWriter, PersistError};
pub use pipeline::{Pipeline, PipelineContext, PipelineError, PipelineSettings};
pub use relocate::{relocate_staged, Relocation};
pub use state_store::{load_run_state, save_run_state, state_path, STATE_FILENAME};
pub use types::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, PipelineEvent, RunSummary, Stage,
};
