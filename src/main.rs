//! chatrelay - streams a YouTube live chat to stdout as NDJSON
//!
//! This is the entry point for the chatrelay binary. Stdout carries the
//! relay protocol; all diagnostics go to stderr.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use chatrelay::config::Config;
use chatrelay::output::ProtocolWriter;
use chatrelay::provider::InnertubeSource;
use chatrelay::relay::StreamSession;

#[derive(Parser, Debug)]
#[command(name = "chatrelay")]
#[command(version, about = "Streams a YouTube live chat to stdout as newline-delimited JSON", long_about = None)]
struct Cli {
    /// Video id of the live stream whose chat should be relayed
    video_id: String,

    /// Seconds between polls (overrides CHATRELAY_POLL_INTERVAL_SECS)
    #[arg(long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr; stdout belongs to the relay protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatrelay=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(secs) = cli.interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    info!(video_id = %cli.video_id, interval_secs = config.poll_interval.as_secs(), "Starting chatrelay");

    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let source = InnertubeSource::new(http_client, &config);
    let session = StreamSession::new(source, cli.video_id, config.poll_interval);

    let stdout = io::stdout();
    let mut out = ProtocolWriter::new(stdout.lock());
    let outcome = session.run(&mut out).await?;

    info!(exit_code = outcome.exit_code(), "Relay finished");
    Ok(ExitCode::from(outcome.exit_code()))
}
