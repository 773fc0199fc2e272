//! Per-invocation orchestration: layout, auth, fetch, download, relocate,
//! filter, persist.
//!
//! Each stage finishes every unit of work (success or logged failure) before
//! the next stage starts. Run state is only mutated between stages, never from
//! inside concurrent work.

use std::path::PathBuf;
use std::sync::Arc;

use engine_logging::{engine_error, engine_info, engine_warn};
use futures_util::stream::{self, StreamExt};
use wallpaper_core::{classify, CollectionLayout, FetchMode, ImageSource, RunState, Sensitivity};

use crate::filter::filter_invalid;
use crate::paginate::{paginate, CollectionPage};
use crate::relocate::{relocate_staged, Relocation};
use crate::state_store::{load_run_state, save_run_state};
use crate::{
    ensure_layout, AccessToken, AuthError, Credentials, Downloader, ListingApi, PipelineEvent,
    ProgressSink, RunSummary, Stage,
};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Working home holding one directory per collection and the state file.
    pub home: PathBuf,
    pub collections: Vec<String>,
    pub fetch_concurrency: usize,
    pub download_concurrency: usize,
    pub relocate_concurrency: usize,
}

impl PipelineSettings {
    pub fn new(home: PathBuf, collections: Vec<String>) -> Self {
        Self {
            home,
            collections,
            fetch_concurrency: 4,
            download_concurrency: 8,
            relocate_concurrency: 4,
        }
    }
}

/// Everything a run carries between stages.
#[derive(Debug)]
pub struct PipelineContext {
    pub token: AccessToken,
    pub run_state: RunState,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

struct DownloadJob {
    collection: String,
    source: ImageSource,
    destination: PathBuf,
}

pub struct Pipeline {
    api: Arc<dyn ListingApi>,
    downloader: Downloader,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(api: Arc<dyn ListingApi>, downloader: Downloader, settings: PipelineSettings) -> Self {
        Self {
            api,
            downloader,
            settings,
        }
    }

    /// Run one full pass over every configured collection.
    ///
    /// Only an authentication failure aborts the run. Everything else is
    /// reported through `sink`, counted in the summary, and skipped.
    pub async fn run(
        &self,
        credentials: &Credentials,
        mode: &FetchMode,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();

        let layouts = self.prepare_layouts(sink, &mut summary);
        if layouts.is_empty() {
            engine_warn!("No usable collections; nothing to do");
            return Ok(summary);
        }

        let token = self.api.authenticate(credentials).await.map_err(|err| {
            engine_error!("Authentication failed, aborting run: {}", err);
            err
        })?;
        let mut context = PipelineContext {
            token,
            run_state: load_run_state(&self.settings.home),
        };

        let ready: Vec<String> = layouts
            .iter()
            .map(|layout| layout.collection().to_string())
            .collect();
        let pending = context.run_state.pending(&ready, mode);
        summary.collections_skipped = ready.len() - pending.len();
        for name in ready.iter().filter(|name| !pending.contains(&name.as_str())) {
            engine_info!("Collection {} is finished; skipping", name);
        }

        let pages = self
            .fetch_pages(&context, &pending, mode, sink, &mut summary)
            .await;
        for page in &pages {
            context
                .run_state
                .record_page(&page.collection, &page.cursor);
        }

        let jobs = download_jobs(&layouts, pages);
        summary.sources_found = jobs.len();
        self.download_all(jobs, sink, &mut summary).await;

        for layout in &layouts {
            self.relocate_collection(layout, sink, &mut summary).await;
        }
        for layout in &layouts {
            sweep_placeholders(layout, sink, &mut summary).await;
        }

        self.persist(&context.run_state, sink, &mut summary);
        Ok(summary)
    }

    fn prepare_layouts(
        &self,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Vec<CollectionLayout> {
        let mut layouts = Vec::with_capacity(self.settings.collections.len());
        for collection in &self.settings.collections {
            let layout = CollectionLayout::new(&self.settings.home, collection);
            match ensure_layout(&layout) {
                Ok(()) => layouts.push(layout),
                Err(err) => {
                    engine_error!("Cannot prepare directories for {}: {}", collection, err);
                    summary.collections_failed += 1;
                    sink.emit(PipelineEvent::CollectionFailed {
                        collection: collection.clone(),
                        stage: Stage::Layout,
                        message: err.to_string(),
                    });
                }
            }
        }
        layouts
    }

    async fn fetch_pages(
        &self,
        context: &PipelineContext,
        pending: &[&str],
        mode: &FetchMode,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) -> Vec<CollectionPage> {
        let api = self.api.as_ref();
        let results = stream::iter(pending.iter().copied())
            .map(|collection| {
                let cursor = context.run_state.cursor(collection);
                async move {
                    let result = paginate(api, &context.token, collection, mode, cursor).await;
                    (collection, result)
                }
            })
            .buffer_unordered(self.settings.fetch_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut pages = Vec::with_capacity(results.len());
        for (collection, result) in results {
            match result {
                Ok(page) => {
                    summary.collections_fetched += 1;
                    sink.emit(PipelineEvent::CollectionFetched {
                        collection: collection.to_string(),
                        sources: page.sources.len(),
                        finished: page.cursor.is_last_page(),
                    });
                    pages.push(page);
                }
                Err(err) => {
                    engine_warn!("Fetching {} failed: {}", collection, err);
                    summary.collections_failed += 1;
                    sink.emit(PipelineEvent::CollectionFailed {
                        collection: collection.to_string(),
                        stage: Stage::Fetching,
                        message: err.to_string(),
                    });
                }
            }
        }
        pages
    }

    async fn download_all(
        &self,
        jobs: Vec<DownloadJob>,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) {
        let downloader = &self.downloader;
        let results = stream::iter(jobs)
            .map(|job| async move {
                let result = downloader.download(&job.source, &job.destination).await;
                (job, result)
            })
            .buffer_unordered(self.settings.download_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        for (job, result) in results {
            match result {
                Ok(path) => {
                    summary.downloaded += 1;
                    sink.emit(PipelineEvent::SourceDownloaded {
                        collection: job.collection,
                        name: job.source.name,
                        path,
                    });
                }
                Err(err) => {
                    engine_warn!("Skipping {} ({}): {}", job.source.name, job.source.url, err);
                    summary.download_skipped += 1;
                    sink.emit(PipelineEvent::SourceSkipped {
                        collection: job.collection,
                        name: job.source.name,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    async fn relocate_collection(
        &self,
        layout: &CollectionLayout,
        sink: &dyn ProgressSink,
        summary: &mut RunSummary,
    ) {
        for sensitivity in Sensitivity::ALL {
            let outcomes =
                match relocate_staged(layout, sensitivity, self.settings.relocate_concurrency).await {
                    Ok(outcomes) => outcomes,
                    Err(err) => {
                        engine_warn!(
                            "Cannot read staging {:?}: {}",
                            layout.staging_dir(sensitivity),
                            err
                        );
                        sink.emit(PipelineEvent::CollectionFailed {
                            collection: layout.collection().to_string(),
                            stage: Stage::Relocating,
                            message: err.to_string(),
                        });
                        continue;
                    }
                };

            for outcome in outcomes {
                match outcome {
                    Relocation::Moved {
                        file_name, bucket, ..
                    } => {
                        summary.relocated += 1;
                        sink.emit(PipelineEvent::FileRelocated {
                            collection: layout.collection().to_string(),
                            file_name,
                            bucket,
                            sensitivity,
                        });
                    }
                    Relocation::LeftInStaging { file_name, reason } => {
                        summary.unclassified += 1;
                        sink.emit(PipelineEvent::FileUnclassified {
                            collection: layout.collection().to_string(),
                            file_name,
                            reason,
                        });
                    }
                }
            }
        }
    }

    fn persist(&self, state: &RunState, sink: &dyn ProgressSink, summary: &mut RunSummary) {
        match save_run_state(&self.settings.home, state) {
            Ok(path) => {
                summary.state_saved = true;
                sink.emit(PipelineEvent::StateSaved { path });
            }
            Err(err) => {
                engine_error!("Failed to persist run state: {}", err);
                sink.emit(PipelineEvent::StateSaveFailed {
                    message: err.to_string(),
                });
            }
        }
    }
}

fn download_jobs(layouts: &[CollectionLayout], pages: Vec<CollectionPage>) -> Vec<DownloadJob> {
    let mut jobs = Vec::new();
    for page in pages {
        let Some(layout) = layouts
            .iter()
            .find(|layout| layout.collection() == page.collection)
        else {
            continue;
        };
        for source in page.sources {
            let destination = destination_dir(layout, &source);
            jobs.push(DownloadJob {
                collection: page.collection.clone(),
                source,
                destination,
            });
        }
    }
    jobs
}

/// Sources with known dimensions go straight to their bucket; the rest are staged.
fn destination_dir(layout: &CollectionLayout, source: &ImageSource) -> PathBuf {
    match source.dimensions() {
        Some((width, height)) => layout.bucket_dir(classify(width, height), source.sensitivity()),
        None => layout.staging_dir(source.sensitivity()),
    }
}

async fn sweep_placeholders(
    layout: &CollectionLayout,
    sink: &dyn ProgressSink,
    summary: &mut RunSummary,
) {
    let owned = layout.clone();
    let removed = match tokio::task::spawn_blocking(move || filter_invalid(&owned)).await {
        Ok(removed) => removed,
        Err(err) => {
            engine_warn!("Placeholder sweep for {} failed: {}", layout.collection(), err);
            sink.emit(PipelineEvent::CollectionFailed {
                collection: layout.collection().to_string(),
                stage: Stage::Filtering,
                message: err.to_string(),
            });
            return;
        }
    };

    for path in removed {
        summary.placeholders_removed += 1;
        sink.emit(PipelineEvent::PlaceholderRemoved {
            collection: layout.collection().to_string(),
            path,
        });
    }
}
