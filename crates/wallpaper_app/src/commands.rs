use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use wallpaper_engine::{
    ensure_output_dir, load_run_state, save_run_state, Downloader, Pipeline, PipelineSettings,
    RedditClient, ReqwestFetcher,
};

use crate::cli::ResetArgs;
use crate::config::AppConfig;
use crate::progress::{log_summary, LogProgressSink};

pub async fn run(config: &AppConfig, home: &Path) -> anyhow::Result<()> {
    ensure_output_dir(home).with_context(|| format!("cannot use home {home:?}"))?;

    let transport = config.fetch_settings();
    let api = RedditClient::new(config.api_settings(), &transport)
        .context("failed to build api client")?;
    let fetcher = ReqwestFetcher::new(transport).context("failed to build download client")?;
    let downloader = Downloader::new(Arc::new(fetcher), config.download.append_extension);

    let mut settings = PipelineSettings::new(home.to_path_buf(), config.collections.clone());
    settings.fetch_concurrency = config.fetch_concurrency;
    settings.download_concurrency = config.download.concurrency;
    let pipeline = Pipeline::new(Arc::new(api), downloader, settings);

    let credentials = config.credentials();
    for mode in config.fetch_modes() {
        engine_info!("Starting run in {:?} mode for {} collections", mode, config.collections.len());
        let summary = pipeline
            .run(&credentials, &mode, &LogProgressSink)
            .await
            .context("run aborted")?;
        log_summary("Run complete", &summary);
    }
    Ok(())
}

pub fn status(home: &Path, configured: &[String]) {
    let state = load_run_state(home);
    println!("home: {}", home.display());
    if state.is_empty() && configured.is_empty() {
        println!("no collections recorded");
        return;
    }
    for (name, entry) in state.iter() {
        let cursor = if entry.cursor.is_empty() {
            "-"
        } else {
            entry.cursor.as_str()
        };
        let flag = if entry.finished { "finished" } else { "open" };
        println!("{name:<24} {cursor:<16} {flag}");
    }
    for name in configured.iter().filter(|name| state.get(name).is_none()) {
        println!("{name:<24} {:<16} never fetched", "-");
    }
}

pub fn reset(home: &Path, args: &ResetArgs) -> anyhow::Result<PathBuf> {
    let mut state = load_run_state(home);
    if args.all {
        engine_info!("Resetting all {} collections", state.len());
        state.clear();
    } else {
        for collection in &args.collections {
            if state.reset(collection) {
                engine_info!("Reset {}", collection);
            } else {
                engine_warn!("No stored state for {}", collection);
            }
        }
    }
    let path = save_run_state(home, &state).context("failed to write run state")?;
    Ok(path)
}
