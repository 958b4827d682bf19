//! Courtside - Evaluation Harness Entry Point
//!
//! Drives the running service's chat endpoint against a golden set and
//! writes a CSV report.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use courtside::eval;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "courtside-eval", about = "Score the agent against a golden set")]
struct Args {
    /// Chat endpoint URL of the running service
    #[arg(long, default_value = "http://127.0.0.1:3000/chat")]
    chat_url: String,

    /// Golden set JSON file (built-in set when omitted)
    #[arg(long)]
    golden: Option<PathBuf>,

    /// Where to write the CSV report
    #[arg(long, default_value = "evaluation_results.csv")]
    output: PathBuf,

    /// Per-case request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courtside=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let cases = match &args.golden {
        Some(path) => eval::load_golden_set(path)?,
        None => eval::default_golden_set(),
    };
    info!(cases = cases.len(), chat_url = %args.chat_url, "starting evaluation");

    let source =
        eval::HttpAnswerSource::new(args.chat_url, Duration::from_secs(args.timeout_secs))?;
    let results = eval::run(&source, &cases).await;
    let summary = eval::summarize(&results);

    eval::write_report(&args.output, &results, &summary)?;

    info!(
        passed = summary.passed,
        total = summary.total,
        pass_rate_percent = summary.pass_rate() * 100.0,
        mean_latency_secs = summary.mean_latency.as_secs_f64(),
        max_latency_secs = summary.max_latency.as_secs_f64(),
        report = %args.output.display(),
        "evaluation complete"
    );

    Ok(())
}
