//! CLI binary for edgequake-summarize.
//!
//! A thin shim over the library: flags are fed through the form reducer
//! exactly as a UI would feed its controls, then the assembled request is
//! sent and the report printed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use edgequake_summarize::form::submit_observed;
use edgequake_summarize::{
    load_pdf, update, write_summary, Action, FormState, InputMode, Language, ProgressCallback,
    SummarizeConfig, Summarizer, SummaryProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner showing the current attempt and any pending backoff.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Summarising");
        bar.set_message("Preparing request…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        self.bar
            .set_message(format!("waiting for the model (attempt {attempt}/{max_attempts})"));
    }

    fn on_retry_scheduled(&self, attempt: u32, delay_ms: u64, reason: &str) {
        let msg = if reason.len() > 80 {
            let cut: String = reason.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            reason.to_string()
        };
        self.bar.println(format!(
            "  {} attempt {attempt} failed: {msg}  {}",
            yellow("⚠"),
            dim(&format!("retrying in {:.1}s", delay_ms as f64 / 1000.0)),
        ));
        self.bar.set_message("backing off…");
    }

    fn on_success(&self, attempts: u32, markdown_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} summary ready  {}",
            green("✔"),
            dim(&format!("{markdown_len} chars, {attempts} attempt(s)"))
        );
    }

    fn on_failure(&self, _attempts: u32, _error: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a local paper in Korean (default language)
  summarize --file paper.pdf

  # Summarise a paper from a URL in English, with a focus
  summarize --file https://arxiv.org/pdf/1706.03762 -l en --focus "training setup"

  # Summarise pasted text
  summarize --text "Lorem ipsum ..." -l es

  # Summarise text from stdin into a file
  pbpaste | summarize --stdin -l ja -o summary.md

  # JSON output with attempt stats
  summarize --file paper.pdf --json > summary.json

LANGUAGES:
  ko Korean   en English   zh Chinese   ja Japanese   es Spanish

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY      Google Gemini API key (required)
  SUMMARIZE_MODEL     Override model ID
  SUMMARIZE_LANGUAGE  Default output language
  RUST_LOG            Override the log filter
"#;

/// Summarise PDF files or text into Markdown reports with Google Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "summarize",
    version,
    about = "Summarise PDF files or pasted text into Markdown reports with Google Gemini",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF path or HTTP/HTTPS URL to summarise.
    #[arg(short, long, group = "input")]
    file: Option<String>,

    /// Text to summarise.
    #[arg(short, long, group = "input")]
    text: Option<String>,

    /// Read the text to summarise from stdin.
    #[arg(long, group = "input")]
    stdin: bool,

    /// What the summary should emphasise.
    #[arg(long, default_value = "")]
    focus: String,

    /// Output language: ko, en, zh, ja, es (or the English name).
    #[arg(short, long, env = "SUMMARIZE_LANGUAGE", default_value = "ko")]
    language: Language,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "SUMMARIZE_OUTPUT")]
    output: Option<PathBuf>,

    /// Gemini model ID.
    #[arg(long, env = "SUMMARIZE_MODEL", default_value = edgequake_summarize::config::DEFAULT_MODEL)]
    model: String,

    /// Total attempts per request, including the first.
    #[arg(long, default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(1..=32))]
    max_attempts: u32,

    /// Also retry responses that carry no summary text.
    #[arg(long)]
    retry_malformed: bool,

    /// Per-attempt HTTP timeout in seconds (default: none).
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long)]
    system_prompt: Option<PathBuf>,

    /// Print the model output verbatim, without clean-up.
    #[arg(long)]
    raw: bool,

    /// Output structured JSON (Summary) instead of Markdown.
    #[arg(long, conflicts_with = "output")]
    json: bool,

    /// Disable the spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Build client ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, progress).await?;
    let summarizer = Summarizer::new(config).context("Failed to initialise the client")?;

    // ── Fill the form ────────────────────────────────────────────────────
    let mut state = FormState::new(cli.language);
    state = update(state, Action::SetFocus(cli.focus.clone()));

    if let Some(ref input) = cli.file {
        state = update(state, Action::SetMode(InputMode::Upload));
        let pdf = load_pdf(input, summarizer.config().download_timeout_secs)
            .await
            .with_context(|| format!("Failed to load '{input}'"))?;
        state = update(
            state,
            Action::FileSelected {
                name: pdf.name.clone(),
                media_type: Some(pdf.media_type.clone()),
            },
        );
        state = update(state, Action::FileLoaded(pdf));
    } else {
        let text = match cli.text {
            Some(ref t) => t.clone(),
            None if cli.stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read text from stdin")?;
                buf
            }
            None => bail!("Provide one of --file, --text or --stdin"),
        };
        state = update(state, Action::SetMode(InputMode::Paste));
        state = update(state, Action::SetText(text));
    }

    state.build_request().context("Nothing to summarise")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let (state, outcome) = submit_observed(state, &summarizer, |s| {
        debug!("Form phase: {:?}", s.phase);
    })
    .await;
    let summary = match outcome {
        Some(Ok(summary)) => summary,
        Some(Err(e)) => bail!(
            "Summarisation failed: {}",
            state.report().map(str::to_string).unwrap_or_else(|| e.to_string())
        ),
        None => bail!("Nothing to summarise"),
    };

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise output")?;
        println!("{json}");
    } else if let Some(ref output_path) = cli.output {
        write_summary(output_path, &summary.markdown)
            .await
            .context("Failed to write summary")?;
        if !cli.quiet {
            eprintln!(
                "{}  {} attempt(s)  {}ms  →  {}",
                green("✔"),
                summary.stats.attempts,
                summary.stats.duration_ms,
                output_path.display()
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(summary.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !summary.markdown.ends_with('\n') {
            handle
                .write_all(b"\n")
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Map CLI args to `SummarizeConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizeConfig> {
    let mut builder = SummarizeConfig::builder()
        .model(cli.model.clone())
        .max_attempts(cli.max_attempts)
        .retry_malformed(cli.retry_malformed)
        .clean_output(!cli.raw);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
