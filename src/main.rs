use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod classify;
mod cli;
mod constants;
mod feed;
mod html_template;
mod legend;
mod map;
mod marker;
mod pipeline;
mod server;
mod settings;

use cli::{Cli, Command};
use feed::FeedClient;
use map::MapStatus;
use server::{start_server, AppState};
use settings::Settings;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakemap=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Fetches once and writes the standalone page. An unavailable feed still
/// produces a page; it shows the error banner over the base map.
async fn render_to_file(settings: &Settings) -> Result<()> {
    let feed = FeedClient::new(&settings.query(), settings.timeout())?;
    let payload = pipeline::load_payload(&feed).await;
    let html = html_template::render_standalone_html(&payload)?;

    if let Some(parent) = settings.output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Creating output directory {}", parent.display()))?;
        }
    }
    tokio::fs::write(&settings.output, html)
        .await
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;

    match payload.status {
        MapStatus::Ready => println!(
            "🎉 Map written to {} ({} earthquakes, {} skipped)",
            settings.output.display(),
            payload.markers.len(),
            payload.skipped
        ),
        MapStatus::Unavailable => println!(
            "⚠️  Map written to {} without earthquake data",
            settings.output.display()
        ),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Cli::parse();
    let mut settings = Settings::load(args.config.as_deref())?;

    match args.cmd {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.port = port;
            }
            println!("🗺️  QuakeMap v{} starting...", env!("CARGO_PKG_VERSION"));
            let feed = FeedClient::new(&settings.query(), settings.timeout())?;
            info!(url = %feed.url(), "Earthquake feed configured");
            start_server(AppState { feed }, settings.port).await?;
        }
        Command::Render { output } => {
            if let Some(output) = output {
                settings.output = output;
            }
            render_to_file(&settings).await?;
        }
        Command::Url => {
            println!("{}", settings.query().url()?);
        }
        Command::InitConfig => {
            let path = args.config.unwrap_or_else(Settings::config_path);
            settings.save(&path)?;
            println!("✅ Settings written to {}", path.display());
        }
    }

    Ok(())
}
