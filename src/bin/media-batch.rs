//! media-batch - command-line front end
//!
//! Reads links from a table file, a text file or stdin, downloads each one as
//! audio or video into the destination directory and prints a summary.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use media_batch_dl::{
    BatchRunner, BatchSource, BatchTally, ChannelReporter, Config, Error, Event, ItemOutcome,
    OutputKind, Result, prepare_batch, wait_with_cancel_on_signal,
};

#[derive(Parser)]
#[command(name = "media-batch")]
#[command(about = "Download a batch of media links as audio or video")]
struct Cli {
    /// Table file; the first field of each row is a link
    #[arg(long, value_name = "FILE", conflicts_with = "text_file")]
    table: Option<PathBuf>,

    /// Text file with one link per line (stdin is read when neither source is given)
    #[arg(long, value_name = "FILE")]
    text_file: Option<PathBuf>,

    /// Existing directory that receives the downloaded files
    #[arg(long, short = 'd', value_name = "DIR")]
    dest: PathBuf,

    /// Output kind: audio (mp3) or video (mp4)
    #[arg(long, short = 'k', default_value = "audio")]
    kind: OutputKind,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the yt-dlp executable (searched on PATH otherwise)
    #[arg(long, value_name = "PATH")]
    ytdlp: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(tally) if tally.failed == 0 && !tally.cancelled => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "Batch did not start");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<BatchTally> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(path) = cli.ytdlp {
        if !path.is_file() {
            return Err(Error::ExternalTool(format!(
                "yt-dlp not found at '{}'",
                path.display()
            )));
        }
        config.tools.ytdlp_path = Some(path);
    }

    let source = match (cli.table, cli.text_file) {
        (Some(table), _) => BatchSource::Table(table),
        (None, Some(path)) => BatchSource::TextFile(path),
        (None, None) => BatchSource::Stdin,
    };

    // File and stdin sources are read after the destination check, and both block
    let kind = cli.kind;
    let dest = cli.dest.clone();
    let prepare_config = config.clone();
    let batch = tokio::task::spawn_blocking(move || {
        prepare_batch(&source, kind, &dest, &prepare_config)
    })
    .await
    .map_err(|e| Error::Worker(e.to_string()))??;

    let runner = BatchRunner::from_config(&config);
    let (reporter, events) = ChannelReporter::channel();
    let handle = runner.start(batch.entries, batch.job, Arc::new(reporter))?;

    // Both futures run on this task; the channel closes when the worker drops the reporter
    let (tally, ()) = tokio::join!(wait_with_cancel_on_signal(handle), print_events(events));
    let tally = tally?;

    print_summary(&tally, &cli.dest);
    Ok(tally)
}

async fn print_events(mut events: UnboundedReceiver<Event>) {
    while let Some(event) = events.recv().await {
        match event {
            Event::BatchStarted { total, kind } => {
                println!("Downloading {total} item(s) as {kind}");
            }
            Event::ItemStarted { .. } | Event::BatchComplete(_) => {}
            Event::ItemSkipped { entry, .. } => {
                println!("  skipped {entry:?} (not a link)");
            }
            Event::ItemFinished { url, outcome, .. } => match outcome {
                ItemOutcome::Success => println!("  ok      {url}"),
                ItemOutcome::Failure(reason) => println!("  failed  {url}: {reason}"),
                ItemOutcome::Invalid => println!("  skipped {url:?} (not a link)"),
            },
            Event::Progress(progress) => {
                println!(
                    "[{}/{}] {:.0}%",
                    progress.completed,
                    progress.total,
                    progress.percent()
                );
            }
        }
    }
}

fn print_summary(tally: &BatchTally, destination: &Path) {
    if tally.cancelled {
        println!(
            "Cancelled after {} of {} item(s)",
            tally.processed(),
            tally.total
        );
    }
    println!(
        "Done: {} succeeded, {} failed, {} invalid",
        tally.succeeded, tally.failed, tally.invalid
    );
    println!("Files saved to {}", destination.display());
}
