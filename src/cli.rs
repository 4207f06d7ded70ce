//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use assetgrab_core::AcceptedExtensions;
use clap::Parser;

/// Find media attachments on a post page and download them.
///
/// The page is rendered in headless Chromium so script-inserted links are
/// seen, every anchor pointing at an accepted media extension is listed, and
/// the selected assets are downloaded as "YY.M.D <name>" files.
#[derive(Parser, Debug)]
#[command(name = "assetgrab")]
#[command(author, version, about)]
pub struct Args {
    /// Page to analyze (absolute http or https URL)
    pub page_url: String,

    /// Output directory for downloaded assets [default: config or current directory]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Accepted file extension; repeat or comma-separate (default: .mp4,.mov)
    #[arg(short = 'e', long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Maximum concurrent downloads (1-16) [default: config or 1]
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: Option<u8>,

    /// Download only these 1-based items, e.g. "1,3-5" (default: all)
    #[arg(short = 's', long, value_name = "SPEC")]
    pub select: Option<String>,

    /// Print the numbered asset list and exit without downloading
    #[arg(long, conflicts_with = "json")]
    pub list: bool,

    /// Print the resolved assets as JSON and exit without downloading
    #[arg(long)]
    pub json: bool,

    /// Analyze a saved HTML file instead of rendering the page (PAGE_URL is still the base URL)
    #[arg(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// Chromium executable to render with
    #[arg(long = "chromium", value_name = "PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Wait after page load before reading the markup, in milliseconds (max 60000)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub settle_ms: Option<u64>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Extensions given on the command line, if any.
    pub fn accepted_extensions(&self) -> anyhow::Result<Option<AcceptedExtensions>> {
        if self.extensions.is_empty() {
            return Ok(None);
        }
        Ok(Some(AcceptedExtensions::new(&self.extensions)?))
    }

    /// Default tracing level implied by -v/-q.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://site.example/user/1/post/2";

    #[test]
    fn test_cli_minimal_args_parses_successfully() {
        let args = Args::try_parse_from(["assetgrab", PAGE]).unwrap();
        assert_eq!(args.page_url, PAGE);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.concurrency.is_none());
        assert!(args.extensions.is_empty());
        assert!(!args.list && !args.json);
        assert_eq!(args.default_log_level(), "info");
    }

    #[test]
    fn test_cli_page_url_is_required() {
        let err = Args::try_parse_from(["assetgrab"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["assetgrab", PAGE, "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.default_log_level(), "trace");
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let err = Args::try_parse_from(["assetgrab", PAGE, "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        let args = Args::try_parse_from(["assetgrab", PAGE, "--quiet"]).unwrap();
        assert_eq!(args.default_log_level(), "error");
    }

    #[test]
    fn test_cli_extensions_repeat_and_comma() {
        let args =
            Args::try_parse_from(["assetgrab", PAGE, "-e", "mp4,webm", "--ext", ".MKV"]).unwrap();
        assert_eq!(args.extensions, ["mp4", "webm", ".MKV"]);
        let exts = args.accepted_extensions().unwrap().unwrap();
        assert_eq!(exts.as_slice(), [".mp4", ".webm", ".mkv"]);
    }

    #[test]
    fn test_cli_extensions_invalid_value() {
        let args = Args::try_parse_from(["assetgrab", PAGE, "-e", "a/b"]).unwrap();
        assert!(args.accepted_extensions().is_err());
    }

    #[test]
    fn test_cli_concurrency_range() {
        let args = Args::try_parse_from(["assetgrab", PAGE, "-c", "16"]).unwrap();
        assert_eq!(args.concurrency, Some(16));
        for bad in ["0", "17"] {
            let err = Args::try_parse_from(["assetgrab", PAGE, "-c", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_list_conflicts_with_json() {
        let err = Args::try_parse_from(["assetgrab", PAGE, "--list", "--json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_render_options() {
        let args = Args::try_parse_from([
            "assetgrab",
            PAGE,
            "--html-file",
            "saved.html",
            "--chromium",
            "/usr/bin/chromium",
            "--settle-ms",
            "1500",
            "--select",
            "1,3-4",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(args.html_file, Some(PathBuf::from("saved.html")));
        assert_eq!(args.chromium_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(args.settle_ms, Some(1500));
        assert_eq!(args.select.as_deref(), Some("1,3-4"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_cli_settle_ms_over_max_rejected() {
        let err = Args::try_parse_from(["assetgrab", PAGE, "--settle-ms", "60001"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["assetgrab", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
