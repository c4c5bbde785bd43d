/// Entry point for the pulse-check CLI
///
/// Reads a newline-delimited block of URLs, enqueues it as a background
/// URL check job and waits for the job and its report callback to finish.
use anyhow::{Context, Result, bail};
use clap::Parser;
use pulse_check::{
    BackgroundJobs, CheckUrlsCommand, CheckUrlsReportCommand, Config, EnqueueRequest,
    EnqueueResponse, JobState, logger,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{SignalKind, signal};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "PULSE_CHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Read newline-delimited URLs from a file, or `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print the finished job as JSON
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// URLs to check, appended after the ones read with --file
    urls: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let guard = logger::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    // process::exit skips destructors, flush the log writer first.
    drop(guard);
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::new(path)?,
        None => Config::default(),
    };
    tracing::debug!("config: {:?}", config);

    let block = read_url_block(cli.file.as_deref(), &cli.urls)?;
    if block.trim().is_empty() {
        bail!("No URLs given");
    }

    let mut jobs = BackgroundJobs::new(
        CheckUrlsCommand::new(&config.batch),
        CheckUrlsReportCommand::new(),
        config.jobs.queue_capacity,
    )
    .with_history_limit(config.jobs.history_limit);
    jobs.start(config.jobs.num_workers);

    let request = EnqueueRequest::new(block);
    let job_ref = jobs.enqueue(request.into_check_urls()).await?;
    println!("{}", serde_json::to_string(&EnqueueResponse { job_ref })?);

    let mut sigint_stream = signal(SignalKind::interrupt()).context("watch SIGINT failed")?;
    let mut sigterm_stream = signal(SignalKind::terminate()).context("watch SIGTERM failed")?;
    let summary = tokio::select! {
        summary = jobs.wait(&job_ref) => summary,
        _ = sigint_stream.recv() => {
            tracing::info!("SIGINT received, cancelling {}", job_ref);
            jobs.cancel_all();
            jobs.wait(&job_ref).await
        }
        _ = sigterm_stream.recv() => {
            tracing::info!("SIGTERM received, cancelling {}", job_ref);
            jobs.cancel_all();
            jobs.wait(&job_ref).await
        }
    };
    jobs.shutdown().await;

    let summary = summary.with_context(|| format!("{} disappeared from the queue", job_ref))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    match summary.state {
        JobState::Completed => Ok(0),
        state => {
            tracing::warn!("{} ended {}", job_ref, state);
            Ok(1)
        }
    }
}

// Joins the --file block and the positional URLs into one `\n`-delimited block.
fn read_url_block(file: Option<&Path>, urls: &[String]) -> Result<String> {
    let mut lines = Vec::new();

    match file {
        Some(path) if path == Path::new("-") => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read URLs from stdin")?;
            lines.push(content);
        }
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read URL file: {}", path.display()))?;
            lines.push(content);
        }
        None => {}
    }
    lines.extend(urls.iter().cloned());

    Ok(lines.join("\n"))
}
