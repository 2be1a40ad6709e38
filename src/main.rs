use aws_config::BehaviorVersion;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use daily_report::mail::SesMailer;
use daily_report::storage::S3BlobStore;
use daily_report::{Config, ReportJob};

/// Builds the daily sales/inventory report, stores it and emails it.
///
/// Configuration comes from DATA_BUCKET, REPORTS_BUCKET and EMAIL_ADDRESS,
/// with optional SALES_KEY, INVENTORY_KEY and AWS_ENDPOINT_URL.
#[derive(Parser, Debug)]
#[command(name = "daily-report", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    debug!("Loaded configuration: {:?}", config);

    let mut aws = aws_config::defaults(BehaviorVersion::latest());
    if let Some(endpoint) = &config.endpoint_url {
        aws = aws.endpoint_url(endpoint);
    }
    let sdk_config = aws.load().await;

    let job = ReportJob::new(
        config,
        Arc::new(S3BlobStore::new(&sdk_config)),
        Arc::new(SesMailer::new(&sdk_config)),
    );

    let response = job.handle(Utc::now()).await;
    println!("{}", serde_json::to_string(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
