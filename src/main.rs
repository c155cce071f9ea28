use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use qa_moderator::config::Config;
use qa_moderator::handlers::{Console, Reply};
use qa_moderator::routes::{dispatch, parse_command};
use qa_moderator::{HttpBackend, ModerationController};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!(api = %config.api_base_url, origin = %config.join_origin, "Configuration loaded");

    let backend = HttpBackend::new(config.api_base_url.clone(), config.request_timeout)
        .expect("Failed to build HTTP client");

    let controller = Arc::new(ModerationController::new(Arc::new(backend), config));
    controller.start();

    let mut console = Console::new(Arc::clone(&controller));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Organizer console. Type 'help' for commands.");
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to read stdin");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("error: {}", message);
                continue;
            }
        };

        match dispatch(&mut console, command).await {
            Reply::Output(text) => println!("{}", text),
            Reply::Quit => break,
        }
    }

    controller.shutdown().await;
}
