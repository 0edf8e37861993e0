use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::command::{ChatCommand, CommandHandler};
use crate::print_stdout;

/// Interactive session: one command per stdin line, replies on stdout.
///
/// Ends on `/quit`, EOF, SIGINT or SIGTERM.
pub(crate) async fn run(handler: CommandHandler) -> Result<()> {
    let search = Arc::clone(handler.search());
    let files = {
        let engine = Arc::clone(&search);
        tokio::task::spawn_blocking(move || engine.list_files())
            .await?
            .context("Failed to enumerate corpus at startup")?
    };

    print_stdout("Started")?;
    print_stdout(&format!("Found {} files", files.len()))?;
    print_stdout(&format!("Search output limit is {} lines", search.limit()))?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let mut input = String::new();

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                log::info!("Received shutdown signal");
                break;
            }

            read = reader.read_line(&mut input) => {
                if read.context("Failed to read stdin")? == 0 {
                    log::info!("EOF received, shutting down");
                    break;
                }

                let Some(command) = ChatCommand::parse(&input) else {
                    continue;
                };
                let reply = handler.handle(command).await?;
                for message in &reply.messages {
                    print_stdout(message)?;
                }
                if reply.quit {
                    break;
                }
            }
        }
    }

    print_stdout("Exiting")
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            log::warn!("Failed to install SIGTERM handler: {err}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
