//! CLI binary for uploading Markdown to Notion.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `UploadConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use notion_md::config::{DEFAULT_IMGBB_URL, DEFAULT_NOTION_API_URL};
use notion_md::terminal::{bold, cyan, dim, green, red};
use notion_md::{
    upload_markdown, Credentials, MissingImagePolicy, ProgressCallback,
    UnterminatedEquationPolicy, UploadConfig, UploadProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the file's lines, plus a log
/// line for every block that failed.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} lines  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Uploading");

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Clear the bar when the run stops before `on_upload_complete`.
    fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl UploadProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, total_lines: usize) {
        self.bar.set_length(total_lines as u64);
        self.bar.reset_eta();
    }

    fn on_line_done(&self, _line: usize, _total_lines: usize) {
        self.bar.inc(1);
    }

    fn on_block_submitted(&self, _line: usize, kind: &str) {
        self.bar.set_message(kind.to_string());
    }

    fn on_block_error(&self, line: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            let cut: String = error.chars().take(99).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar
            .println(format!("  {} Line {:>4}  {}", red("✗"), line, red(&msg)));
    }

    fn on_upload_complete(&self, submitted: usize, failed: usize) {
        self.bar.finish_and_clear();

        if failed == 0 && self.errors.load(Ordering::SeqCst) == 0 {
            eprintln!(
                "{} {} blocks uploaded",
                green("✔"),
                bold(&submitted.to_string())
            );
        } else {
            eprintln!(
                "{} {} blocks uploaded  ({} problems)",
                cyan("⚠"),
                bold(&submitted.to_string()),
                red(&self.errors.load(Ordering::SeqCst).to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Upload a file to a page (id copied from the page URL)
  md2notion -i 0123456789abcdef0123456789abcdef -p notes.md

  # The full page URL works too
  md2notion -i https://www.notion.so/My-Page-0123456789abcdef0123456789abcdef -p notes.md

  # Keep going when a local image is missing
  md2notion -i <PAGE> -p notes.md --on-missing-image skip

SUPPORTED MARKDOWN:
  # / ## / ###          headings
  $$ (own line)         opens / closes a display equation
  ![alt](path-or-url)   image; local files are uploaded to imgbb,
                        alt text becomes a paragraph below the image
  **bold**, $x^2$       inline bold and inline equations
  anything else         paragraph

ENVIRONMENT VARIABLES:
  NOTION_API_KEY   Notion integration token (required)
  IMGBB_API_KEY    imgbb API key (required)
  NOTION_API_URL   Override the Notion API root
  IMGBB_API_URL    Override the imgbb upload endpoint
  RUST_LOG         Override log filtering
"#;

/// Upload a Markdown file to a Notion page, block by block.
#[derive(Parser, Debug)]
#[command(
    name = "md2notion",
    version,
    about = "Upload a Markdown file to a Notion page",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Notion page id or page URL.
    #[arg(short = 'i', long = "id")]
    id: String,

    /// Markdown file to upload.
    #[arg(short, long)]
    path: PathBuf,

    /// What to do when a local image file does not exist.
    #[arg(long, env = "MD2NOTION_ON_MISSING_IMAGE", value_enum, default_value = "abort")]
    on_missing_image: MissingImageArg,

    /// Submit a `$$` equation that is still open at end of file.
    #[arg(long, env = "MD2NOTION_FLUSH_UNTERMINATED_EQUATION")]
    flush_unterminated_equation: bool,

    /// Notion API root.
    #[arg(long, env = "NOTION_API_URL", default_value = DEFAULT_NOTION_API_URL)]
    notion_api_url: String,

    /// imgbb upload endpoint.
    #[arg(long, env = "IMGBB_API_URL", default_value = DEFAULT_IMGBB_URL)]
    imgbb_api_url: String,

    /// Per-request HTTP timeout in seconds.
    #[arg(long, env = "MD2NOTION_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Print the final statistics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MD2NOTION_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2NOTION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2NOTION_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum MissingImageArg {
    Abort,
    Skip,
}

impl From<MissingImageArg> for MissingImagePolicy {
    fn from(v: MissingImageArg) -> Self {
        match v {
            MissingImageArg::Abort => MissingImagePolicy::Abort,
            MissingImageArg::Skip => MissingImagePolicy::Skip,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar prints per-block failures itself; keep library logs
    // to errors while it is on.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Credentials ──────────────────────────────────────────────────────
    let credentials = Credentials::from_env().context("Missing credentials")?;

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn UploadProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    // ── Run upload ───────────────────────────────────────────────────────
    let result = upload_markdown(&cli.path, &config, &credentials).await;
    if result.is_err() {
        if let Some(cb) = &cli_progress {
            cb.abandon();
        }
    }
    let stats = result.with_context(|| format!("Upload of {} failed", cli.path.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    }

    if !cli.quiet {
        if !show_progress {
            eprintln!(
                "Uploaded {} blocks ({} failed) from {} lines in {}ms",
                stats.blocks_submitted,
                stats.blocks_failed,
                stats.total_lines,
                stats.total_duration_ms
            );
        }
        eprintln!(
            "   {} images uploaded  /  {} skipped  —  {}",
            dim(&stats.images_uploaded.to_string()),
            dim(&stats.images_skipped.to_string()),
            bold(&config.page_id.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `UploadConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<UploadConfig> {
    let equation_policy = if cli.flush_unterminated_equation {
        UnterminatedEquationPolicy::Flush
    } else {
        UnterminatedEquationPolicy::Discard
    };

    let mut builder = UploadConfig::builder(&cli.id)
        .notion_base_url(&cli.notion_api_url)
        .imgbb_url(&cli.imgbb_api_url)
        .request_timeout_secs(cli.timeout)
        .missing_image(cli.on_missing_image.clone().into())
        .unterminated_equation(equation_policy);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
