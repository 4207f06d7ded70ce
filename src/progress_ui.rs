//! Progress UI (bar plus log lines) fed by batch events.

use std::time::Duration;

use assetgrab_core::download::{BatchEvent, BatchSummary};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;

/// Whether to draw a live bar or only print log lines.
pub(crate) fn should_draw_bar(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// Spawns the event consumer; the handle resolves to the terminal summary,
/// or `None` if the channel closed without one.
pub(crate) fn spawn_progress_ui(
    draw_bar: bool,
    quiet: bool,
    mut events: UnboundedReceiver<BatchEvent>,
) -> tokio::task::JoinHandle<Option<BatchSummary>> {
    tokio::spawn(async move {
        let bar = if draw_bar {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden())
        };

        let mut summary = None;
        while let Some(event) = events.recv().await {
            match event {
                BatchEvent::Progress(percent) => bar.set_position(u64::from(percent)),
                BatchEvent::Log(line) => {
                    if !quiet {
                        emit_line(&bar, draw_bar, &line);
                    }
                }
                BatchEvent::Finished(done) => {
                    summary = Some(done);
                    break;
                }
            }
        }

        bar.finish_and_clear();
        summary
    })
}

fn emit_line(bar: &ProgressBar, draw_bar: bool, line: &str) {
    if draw_bar {
        bar.println(line);
    } else {
        eprintln!("{line}");
    }
}
