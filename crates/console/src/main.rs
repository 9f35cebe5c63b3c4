//! `staffdesk` -- operator console for service-request approval and
//! artist assignment.
//!
//! Lists requests pending approval, approves one, shows the artists the
//! owner API ranks for it, and assigns one. Commands are read from stdin,
//! one per line; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                              | Description               |
//! |------------------------|----------|--------------------------------------|---------------------------|
//! | `STAFFDESK_API_URL`    | no       | `https://core-4dme.onrender.com/api` | Owner API base URL        |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                                 | Per-request HTTP timeout  |
//! | `RUST_LOG`             | no       | `staffdesk_console=info,staffdesk_client=info` | Log filter      |

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staffdesk_client::{ClientConfig, OwnerApi, Session, SessionEvent};
use staffdesk_console::app::{spawn_action, Screen};
use staffdesk_console::commands::{Command, HELP};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staffdesk_console=info,staffdesk_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let api = OwnerApi::new(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout_secs,
        "Starting staffdesk console",
    );

    let session = Session::new(Arc::new(api));
    let mut events = session.subscribe();
    let mut screen = Screen::default();
    draw(&mut screen, &session, true).await;
    println!("{HELP}");

    let loader = session.clone();
    tokio::spawn(async move { loader.load_pending().await });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_line(&session, &mut screen, &line).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read stdin");
                        break;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(SessionEvent::Updated) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        draw(&mut screen, &session, false).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    session.shutdown();
    tracing::info!("Console closed");
}

/// Run one input line. Returns `false` when the operator quits.
///
/// Session actions run in the background; their frames arrive as events.
async fn handle_line(session: &Session, screen: &mut Screen, line: &str) -> bool {
    let command = match Command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            println!("{e}\n{HELP}");
            return true;
        }
    };

    match command {
        Command::Show => draw(screen, session, true).await,
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
        Command::Approve(_) | Command::Assign(_) | Command::ViewOtherRequests => {
            spawn_action(session, command);
        }
    }
    true
}

async fn draw(screen: &mut Screen, session: &Session, force: bool) {
    if let Some(frame) = screen.frame(session, force).await {
        println!("\n{frame}");
    }
}
