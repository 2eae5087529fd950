//! Background keyboard reader.
//!
//! crossterm's event reader blocks, so it runs on its own thread and forwards mapped
//! actions to the session through a bounded tokio channel. Polling with a short timeout
//! lets the thread notice the stop flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::sync::mpsc;

use crate::map::handle_key_event;
use crate::types::GameAction;

/// How long one `event::poll` waits before rechecking the stop flag.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Default capacity of the action channel.
pub const INPUT_CHANNEL_CAPACITY: usize = 64;

/// Spawn the reader thread.
///
/// The thread exits when `stop` is raised, when the receiver is dropped or when reading
/// the terminal fails. Keys pressed while the channel is full are dropped.
pub fn spawn_input_thread(
    stop: Arc<AtomicBool>,
    tx: mpsc::Sender<GameAction>,
) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                match event::poll(POLL_TIMEOUT) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(err) => {
                        log::warn!("terminal poll failed: {}", err);
                        break;
                    }
                }
                let key = match event::read() {
                    Ok(Event::Key(key)) => key,
                    Ok(_) => continue,
                    Err(err) => {
                        log::warn!("terminal read failed: {}", err);
                        break;
                    }
                };
                let Some(action) = handle_key_event(key) else {
                    continue;
                };
                match tx.try_send(action) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        log::debug!("input channel full, dropped {}", action.as_str());
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            log::debug!("input thread stopped");
        })
        .context("failed to spawn input thread")
}
