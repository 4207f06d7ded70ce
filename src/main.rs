//! CLI entry point for assetgrab.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use assetgrab_core::download::{BatchStatus, DEFAULT_CONCURRENCY, event_channel};
use assetgrab_core::render::DEFAULT_SETTLE_DELAY_MS;
use assetgrab_core::{
    AssetLink, ChromiumRenderer, DownloadEngine, DownloadTask, HttpClient, HttpClientConfig,
    LocalFileRenderer, PageRenderer, analyze_page,
};
use clap::Parser;
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod progress_ui;
mod selection;

use app_config::{FileConfig, load_default_file_config};
use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let no_color = args.no_color
        || std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
        || progress_ui::is_dumb_terminal();
    init_tracing(&default_filter(&args), no_color);

    debug!(?args, "CLI arguments parsed");

    let loaded = load_default_file_config()?;
    if loaded.loaded_from_file {
        debug!(path = ?loaded.path, "configuration loaded");
    }
    let config = loaded.config;

    let extensions = args
        .accepted_extensions()?
        .or(config.accepted_extensions()?)
        .unwrap_or_default();

    let renderer = build_renderer(&args, &config);
    info!(page = %args.page_url, renderer = renderer.name(), %extensions, "analyzing page");
    let links = analyze_page(renderer.as_ref(), &args.page_url, &extensions)
        .await
        .context("Page analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(ExitCode::SUCCESS);
    }
    if args.list {
        print_listing(&links);
        return Ok(ExitCode::SUCCESS);
    }

    if links.is_empty() {
        if !args.quiet {
            println!("No media assets found.");
        }
        return Ok(ExitCode::SUCCESS);
    }

    info!(count = links.len(), "assets found");
    let selected = match args.select.as_deref() {
        Some(spec) => {
            let indices = selection::parse_selection(spec, links.len())?;
            selection::apply_selection(&links, &indices)
        }
        None => links,
    };

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    if !selected.is_empty() {
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory '{}'", output_dir.display())
        })?;
    }

    let client_config = HttpClientConfig {
        connect_timeout_secs: config
            .connect_timeout_secs
            .unwrap_or(HttpClientConfig::default().connect_timeout_secs),
        read_timeout_secs: config
            .read_timeout_secs
            .unwrap_or(HttpClientConfig::default().read_timeout_secs),
        user_agent: config.user_agent.clone(),
    };
    let client = HttpClient::from_config(&client_config).context("Failed to build HTTP client")?;
    let concurrency = args
        .concurrency
        .map(usize::from)
        .or(config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    let engine = DownloadEngine::new(concurrency, client)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let signal_task = spawn_interrupt_listener(Arc::clone(&interrupted));

    let (events, receiver) = event_channel();
    let draw_bar = progress_ui::should_draw_bar(
        io::stderr().is_terminal(),
        args.quiet,
        progress_ui::is_dumb_terminal(),
    );
    let ui = progress_ui::spawn_progress_ui(draw_bar, args.quiet, receiver);

    let tasks = DownloadTask::batch(selected, &output_dir);
    let outcome = engine
        .run_batch_with_interrupt(tasks, events, Arc::clone(&interrupted))
        .await;

    if let Err(error) = ui.await {
        warn!(%error, "progress UI task failed");
    }
    signal_task.abort();

    if !args.quiet {
        println!("{}", outcome.message());
    }
    info!(
        completed = outcome.completed(),
        failed = outcome.failed(),
        status = ?outcome.status,
        "run finished"
    );

    Ok(ExitCode::from(exit_status(outcome.status)))
}

fn init_tracing(default_filter: &str, no_color: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

/// Filter used when `RUST_LOG` is unset.
///
/// Batch log lines are already printed by the progress UI, so their tracing
/// mirror only shows up from -v on.
fn default_filter(args: &Args) -> String {
    let level = args.default_log_level();
    if args.verbose == 0 {
        format!("{level},assetgrab::batch=warn")
    } else {
        level.to_string()
    }
}

fn build_renderer(args: &Args, config: &FileConfig) -> Box<dyn PageRenderer> {
    if let Some(path) = &args.html_file {
        return Box::new(LocalFileRenderer::new(path));
    }

    let settle_ms = args
        .settle_ms
        .or(config.settle_delay_ms)
        .unwrap_or(DEFAULT_SETTLE_DELAY_MS);
    let mut renderer = ChromiumRenderer::new().with_settle_delay(Duration::from_millis(settle_ms));
    if let Some(secs) = config.navigation_timeout_secs {
        renderer = renderer.with_navigation_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = args.chromium_path.as_ref().or(config.chromium_path.as_ref()) {
        renderer = renderer.with_executable(path);
    }
    if let Some(user_agent) = &config.user_agent {
        renderer = renderer.with_user_agent(user_agent);
    }
    Box::new(renderer)
}

fn print_listing(links: &[AssetLink]) {
    if links.is_empty() {
        println!("No media assets found.");
        return;
    }
    for (position, link) in links.iter().enumerate() {
        println!("{:>3}. {}", position + 1, link.display_name);
        println!("     {}", link.source_url);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    /// First signal: stop cooperatively.
    Cancel,
    /// Repeated signal: leave now.
    Exit,
}

fn record_interrupt(interrupted: &AtomicBool) -> InterruptAction {
    if interrupted.swap(true, Ordering::SeqCst) {
        InterruptAction::Exit
    } else {
        InterruptAction::Cancel
    }
}

fn spawn_interrupt_listener(interrupted: Arc<AtomicBool>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match record_interrupt(&interrupted) {
                InterruptAction::Cancel => {
                    warn!("interrupt received; stopping after the current chunk (Ctrl-C again to exit now)");
                }
                InterruptAction::Exit => {
                    warn!("second interrupt received; exiting");
                    std::process::exit(i32::from(exit_status(BatchStatus::Cancelled)));
                }
            }
        }
    })
}

fn exit_status(status: BatchStatus) -> u8 {
    match status {
        BatchStatus::Completed | BatchStatus::NothingSelected => 0,
        BatchStatus::EndedAbnormally | BatchStatus::Cancelled => 2,
    }
}
