//! CLI entry point for the guild ratings tool.
//!
//! Provides subcommands for building the full guild report, listing a
//! guild's members, and inspecting a single member's ratings.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use guild_rater::{
    analyzers::types::Member,
    config::{
        ClientConfig, DEFAULT_BASE_URL, DEFAULT_GUILD_ID, DEFAULT_OUTFILE, RateLimitConfig,
        RetryPolicy,
    },
    fetch::{BasicClient, Fetcher, RateLimiter},
    output::{print_json, print_pretty, write_report},
    pipeline::rate_guild,
    services::GuildApi,
};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "guild_rater")]
#[command(about = "Ranks the games rated by members of a BoardGameGeek guild", long_about = None)]
struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every member's ratings and write the per-game report as CSV
    Report {
        /// Guild to rate
        #[arg(short, long, default_value_t = DEFAULT_GUILD_ID)]
        guild_id: u64,

        /// CSV file to write the report to (overwritten)
        #[arg(short, long, default_value = DEFAULT_OUTFILE)]
        outfile: String,

        /// Also log the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List a guild's members
    Members {
        #[arg(short, long, default_value_t = DEFAULT_GUILD_ID)]
        guild_id: u64,
    },
    /// Show one user's rated collection
    Ratings {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
}

#[derive(Args)]
struct ClientArgs {
    /// XML API base URL [default: $BGG_BASE_URL, then the public API]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Maximum requests in flight at once
    #[arg(long, global = true, default_value_t = RateLimitConfig::default().max_concurrent)]
    max_concurrent: usize,

    /// Maximum request starts per window (0 disables the cap)
    #[arg(long, global = true, default_value_t = RateLimitConfig::default().max_per_window)]
    max_per_window: usize,

    /// Rate window length in milliseconds (0 disables the cap)
    #[arg(long, global = true, default_value_t = RateLimitConfig::default().window.as_millis() as u64)]
    window_ms: u64,

    /// Attempts per request before giving up
    #[arg(long, global = true, default_value_t = RetryPolicy::default().max_attempts)]
    max_attempts: u32,

    /// Delay before the first retry, doubled on each further retry
    #[arg(long, global = true, default_value_t = RetryPolicy::default().initial_backoff.as_millis() as u64)]
    initial_backoff_ms: u64,

    /// Upper bound on the delay between retries
    #[arg(long, global = true, default_value_t = RetryPolicy::default().max_backoff.as_millis() as u64)]
    max_backoff_ms: u64,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, global = true)]
    request_timeout_secs: Option<u64>,

    /// Skip TLS certificate validation
    #[arg(long, global = true, default_value_t = false)]
    insecure: bool,
}

impl ClientArgs {
    fn client_config(&self) -> ClientConfig {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| std::env::var("BGG_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        ClientConfig {
            base_url,
            accept_invalid_certs: self.insecure,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    fn rate_limits(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_concurrent: self.max_concurrent,
            max_per_window: self.max_per_window,
            window: Duration::from_millis(self.window_ms),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            ..RetryPolicy::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();

    let cli = Cli::parse();
    let api = build_api(&cli.client)?;

    match cli.command {
        Commands::Report {
            guild_id,
            outfile,
            json,
        } => {
            let rows = rate_guild(&api, guild_id).await;

            print_pretty(&rows);
            if json {
                print_json(&rows)?;
            }

            write_report(&outfile, &rows)?;
            info!(guild_id, rows = rows.len(), outfile = %outfile, "Report written");
        }
        Commands::Members { guild_id } => {
            let members = api.list_all_members(guild_id).await;

            for member in &members {
                info!(member = %member, "Member");
            }

            info!(guild_id, total = members.len(), "Member list summary");
        }
        Commands::Ratings { username } => {
            let set = api.collect_ratings(&Member::new(username)).await;

            for rating in set.ratings() {
                info!(
                    item_id = rating.item_id,
                    item_name = %rating.item_name,
                    rating = rating.rating,
                    "Rating"
                );
            }

            info!(member = %set.member, count = set.ratings().len(), "Ratings summary");
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/guild_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("guild_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

/// Wires transport, rate limiter, and retry policy into a [`GuildApi`].
fn build_api(args: &ClientArgs) -> Result<GuildApi<BasicClient>> {
    let client_config = args.client_config();
    let limits = args.rate_limits();
    let policy = args.retry_policy();

    if client_config.accept_invalid_certs {
        warn!("TLS certificate validation is disabled");
    }
    info!(
        base_url = %client_config.base_url,
        max_concurrent = limits.max_concurrent,
        max_per_window = limits.max_per_window,
        window_ms = limits.window.as_millis() as u64,
        max_attempts = policy.max_attempts,
        "Client configured"
    );

    let client = BasicClient::new(&client_config)?;
    let fetcher = Fetcher::new(client, Arc::new(RateLimiter::new(&limits)), policy);
    Ok(GuildApi::new(fetcher, &client_config.base_url)?)
}
