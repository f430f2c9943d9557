//! OS signal handling: SIGINT/SIGTERM become `Message::Quit`

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::message::Message;
use podwatch_core::prelude::*;

/// Spawn a task that turns the first termination signal into a quit message.
///
/// The task also exits, without sending anything, once `shutdown_rx` flips.
pub fn spawn_signal_handler(
    tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_requested(&mut shutdown_rx) => {
                debug!("Signal handler exiting on shutdown");
            }
            signal = wait_for_signal() => match signal {
                Ok(name) => {
                    info!("Received {}, quitting", name);
                    let _ = tx.send(Message::Quit).await;
                }
                Err(e) => error!("Signal handler error: {}", e),
            },
        }
    })
}

async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|done| *done).await;
}

/// Wait for a termination signal, returning its name
async fn wait_for_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::terminal(format!("Failed to create SIGINT handler: {}", e)))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::terminal(format!("Failed to create SIGTERM handler: {}", e)))?;

        tokio::select! {
            _ = sigint.recv() => Ok("SIGINT"),
            _ = sigterm.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::terminal(format!("Failed to listen for Ctrl+C: {}", e)))?;
        Ok("Ctrl+C")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_no_message_without_signal() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let _handle = spawn_signal_handler(tx, shutdown_rx);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_exits_on_shutdown() {
        let (tx, _rx) = mpsc::channel::<Message>(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_signal_handler(tx, shutdown_rx);
        shutdown_tx.send_replace(true);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("signal handler should exit on shutdown")
            .unwrap();
    }
}
