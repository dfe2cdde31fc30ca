use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use camview::app::{App, Boot};
use camview::config::{Config, MemorySource};
use camview::display::FileDisplay;
use camview::fetch::{AlwaysConnected, HttpTransport};
use camview::input::InputEvent;
use camview::worker::Cadence;

use crate::cli::RunArgs;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostCommand {
    Input(InputEvent),
    Pause,
    Resume,
    Quit,
}

fn parse_command(line: &str) -> Option<HostCommand> {
    let command = match line.trim().to_lowercase().as_str() {
        "n" | "next" => HostCommand::Input(InputEvent::ChannelNext),
        "p" | "prev" | "previous" => HostCommand::Input(InputEvent::ChannelPrevious),
        "pause" => HostCommand::Pause,
        "resume" => HostCommand::Resume,
        "q" | "quit" | "exit" => HostCommand::Quit,
        _ => return None,
    };
    Some(command)
}

pub async fn run(args: RunArgs) -> Result<(), AnyError> {
    let mut config = match args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(output) = args.output {
        config.display.output_path = output;
    }

    let transport = HttpTransport::new(&config.fetch)?;
    let mut app = App::on_boot(Boot {
        source: Arc::new(MemorySource::from_channels(&config.channels)),
        display: Arc::new(FileDisplay::new(config.display.output_path.clone())),
        transport: Arc::new(transport),
        connectivity: Arc::new(AlwaysConnected),
        cadence: Cadence::from(&config.cadence),
    });

    app.on_start()?;
    app.on_resume().await?;
    info!(
        output = %config.display.output_path.display(),
        "camview running (commands: next, prev, pause, resume, quit)"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Keep running headless until a signal arrives
                    stdin_open = false;
                    continue;
                };
                match parse_command(&line) {
                    Some(HostCommand::Quit) => break,
                    Some(HostCommand::Pause) => app.on_pause(),
                    Some(HostCommand::Resume) => app.on_resume().await?,
                    Some(HostCommand::Input(event)) => {
                        app.on_input(event);
                    }
                    None => warn!(command = line.trim(), "Unknown command"),
                }
            }
        }
    }

    app.on_stop().await;

    let metrics = app.metrics();
    info!(
        fetch_succeeded = metrics.fetch_succeeded,
        fetch_failed = metrics.fetch_failed,
        stale_discarded = metrics.stale_discarded,
        workers_started = metrics.workers_started,
        "camview stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
