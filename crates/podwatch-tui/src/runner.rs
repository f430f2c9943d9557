//! Main TUI runner - entry point and controller loop
//!
//! The loop draws, then blocks on the intake channel for exactly one
//! message (a key press, a resize, a feed event or a signal), processes it,
//! and draws again. Quitting draws one last frame before the loop ends.

use std::sync::Arc;

use podwatch_app::config::Settings;
use podwatch_app::{signals, Engine};
use podwatch_core::prelude::*;
use podwatch_source::WatchSource;

use super::{event, render, terminal};

/// Run the dashboard until the user quits
pub async fn run(source: Arc<dyn WatchSource>, settings: Settings) -> Result<()> {
    // Install panic hook for terminal restoration
    terminal::install_panic_hook();

    info!(
        "Starting dashboard: source={}, auto_start={}",
        source.name(),
        settings.behavior.auto_start
    );

    let mut term = terminal::init()?;
    let mut engine = Engine::new(source, settings);

    // Spawn signal handler (sends Message::Quit on SIGINT/SIGTERM)
    let signal_task =
        signals::spawn_signal_handler(engine.msg_tx.clone(), engine.shutdown_rx.clone());
    let input_task = event::spawn_input_pump(engine.msg_tx.clone(), engine.shutdown_rx.clone());

    engine.start();

    let result = run_loop(&mut term, &mut engine).await;
    match &result {
        Err(e) if e.is_fatal() => error!("Controller loop failed: {}", e),
        Err(e) => warn!("Controller loop ended with error: {}", e),
        Ok(()) => {}
    }

    // Stop the feed (bounded) and the background tasks
    engine.shutdown().await;

    let input_result = match input_task.await {
        Ok(res) => res,
        Err(e) => {
            warn!("Input pump task failed: {}", e);
            Ok(())
        }
    };
    if let Err(e) = signal_task.await {
        debug!("Signal handler task ended abnormally: {}", e);
    }

    terminal::restore();
    info!("Dashboard exited");

    result.and(input_result)
}

async fn run_loop(term: &mut ratatui::DefaultTerminal, engine: &mut Engine) -> Result<()> {
    let show_status_bar = engine.settings.ui.show_status_bar;

    loop {
        let snapshot = engine.snapshot();
        term.draw(|frame| render::view(frame, &snapshot, show_status_bar))
            .map_err(|e| Error::terminal(format!("draw failed: {}", e)))?;

        if engine.should_quit() {
            break;
        }

        match engine.next_message().await {
            Some(msg) => engine.process_message(msg),
            None => return Err(Error::ChannelClosed),
        }
    }

    Ok(())
}
