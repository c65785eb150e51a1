use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use clap::Parser;
use resumerrr_core::{AnalyzerClient, Config};
use tracing_subscriber::EnvFilter;

mod app;
mod composer;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

const LOG_ENV: &str = "RESUMERRR_LOG";

#[derive(Parser)]
#[command(name = "resumerrr", version)]
#[command(about = "Chat with an AI résumé reviewer from your terminal")]
struct Cli {
    /// Analysis endpoint (overrides RESUMERRR_ENDPOINT and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// PDF résumé to attach to the first message
    #[arg(short, long)]
    resume: Option<PathBuf>,

    /// Remember the endpoint in the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(e) => {
            eprintln!("WARN: logging disabled: {}", e);
            None
        }
    };

    let mut config = Config::load_or_default();
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
    if cli.save_config {
        config.endpoint = Some(endpoint.clone());
        config.save()?;
    }
    tracing::info!(%endpoint, log = ?log_path, "starting resumerrr");

    tui::install_panic_hook();
    let (mut terminal, keyboard_enhanced) = tui::init()?;

    let mut app = App::new(AnalyzerClient::new(&endpoint), keyboard_enhanced);
    if let Some(path) = cli.resume {
        app.attach_path(path).await;
    }

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event).await?;
        if app.is_waiting_for_reply() {
            app.poll_reply().await;
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> Result<PathBuf> {
    let log_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?
        .join("resumerrr");
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("resumerrr.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(log_path)
}
