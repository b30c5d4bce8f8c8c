use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, visibility, Clock, FixedClock, PhotoUpload, RsvpController, RsvpForm,
    SystemClock, VisibilityWatcher,
};
use shared::{
    domain::Visibility,
    error::{Notice, NoticeLevel},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "RSVP form controller for the wedding site")]
struct Cli {
    /// Settings file; `rsvp.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the lifecycle state and which sections are shown.
    Status {
        /// Evaluate at this RFC 3339 instant instead of now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Re-evaluate visibility on the configured interval until interrupted.
    Watch,
    /// Print the fields a saved form draft would render.
    Derive {
        #[arg(long)]
        form: PathBuf,
    },
    /// Validate a saved form draft and send it to the delivery endpoint.
    Submit {
        #[arg(long)]
        form: PathBuf,
    },
    /// Report the photos that would be uploaded.
    Photos { files: Vec<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    info!(
        event_date = %settings.event_date,
        endpoint = %settings.delivery_endpoint,
        "loaded settings"
    );

    match cli.command {
        Command::Status { at } => {
            let clock: Arc<dyn Clock> = match at {
                Some(at) => Arc::new(FixedClock(at)),
                None => Arc::new(SystemClock),
            };
            let current = visibility::visibility(&settings.event_config(), clock.now());
            print_visibility(&current)?;
        }
        Command::Watch => {
            let watcher = VisibilityWatcher::new(
                settings.event_config(),
                Arc::new(SystemClock),
                settings.refresh_interval,
            );
            let (mut rx, handle) = watcher.spawn();
            print_visibility(&rx.borrow_and_update())?;
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = *rx.borrow_and_update();
                        print_visibility(&current)?;
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            drop(rx);
            handle.await.context("visibility watcher panicked")?;
        }
        Command::Derive { form } => {
            let mut controller = RsvpController::new(&settings)?;
            let view = controller.load_draft(read_draft(&form)?)?;
            println!("{}", serde_json::to_string_pretty(view)?);
        }
        Command::Submit { form } => {
            let mut controller = RsvpController::new(&settings)?;
            controller.load_draft(read_draft(&form)?)?;
            let notice = match controller.submit().await {
                Ok(notice) => notice,
                Err(err) => {
                    print_notice(&err.notice());
                    anyhow::bail!(err);
                }
            };
            print_notice(&notice);
        }
        Command::Photos { files } => {
            let mut upload = PhotoUpload::default();
            upload.select(files);
            print_notice(&upload.prepare());
        }
    }

    Ok(())
}

fn read_draft(path: &Path) -> Result<RsvpForm> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read form draft '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("form draft '{}' is not valid JSON", path.display()))
}

fn print_visibility(visibility: &Visibility) -> Result<()> {
    println!("{}", serde_json::to_string(visibility)?);
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Error => eprintln!("{}", notice.message),
        NoticeLevel::Success | NoticeLevel::Info => println!("{}", notice.message),
    }
}
