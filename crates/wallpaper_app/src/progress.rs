use engine_logging::{engine_debug, engine_info, engine_warn};
use wallpaper_engine::{PipelineEvent, ProgressSink, RunSummary};

/// Forwards pipeline events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::CollectionFetched {
                collection,
                sources,
                finished,
            } => engine_info!(
                "[{}] fetched {} sources{}",
                collection,
                sources,
                if finished { " (end of feed)" } else { "" }
            ),
            PipelineEvent::CollectionFailed {
                collection,
                stage,
                message,
            } => engine_warn!("[{}] {} failed: {}", collection, stage, message),
            PipelineEvent::SourceDownloaded {
                collection,
                name,
                path,
            } => engine_debug!("[{}] downloaded {} to {:?}", collection, name, path),
            PipelineEvent::SourceSkipped {
                collection,
                name,
                reason,
            } => engine_debug!("[{}] skipped {}: {}", collection, name, reason),
            PipelineEvent::FileRelocated {
                collection,
                file_name,
                bucket,
                sensitivity,
            } => engine_debug!("[{}] {} -> {}/{}", collection, file_name, bucket, sensitivity),
            PipelineEvent::FileUnclassified {
                collection,
                file_name,
                reason,
            } => engine_warn!("[{}] {} left in staging: {}", collection, file_name, reason),
            PipelineEvent::PlaceholderRemoved { collection, path } => {
                engine_info!("[{}] removed placeholder {:?}", collection, path)
            }
            PipelineEvent::StateSaved { path } => engine_debug!("Run state written to {:?}", path),
            PipelineEvent::StateSaveFailed { message } => {
                engine_warn!("Run state not saved: {}", message)
            }
        }
    }
}

pub fn log_summary(label: &str, summary: &RunSummary) {
    engine_info!(
        "{}: {} collections fetched, {} failed, {} finished; {} sources, {} downloaded, {} skipped; \
         {} relocated, {} left in staging, {} placeholders removed; state saved: {}",
        label,
        summary.collections_fetched,
        summary.collections_failed,
        summary.collections_skipped,
        summary.sources_found,
        summary.downloaded,
        summary.download_skipped,
        summary.relocated,
        summary.unclassified,
        summary.placeholders_removed,
        summary.state_saved
    );
}
