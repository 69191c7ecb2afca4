use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use crossterm::event::Event;
use tokio::sync::mpsc;
use tracing::{debug, error};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Reads terminal events on a dedicated thread, since crossterm's reader
/// blocks. Dropping the handle stops the thread at its next poll.
pub struct TerminalEvents {
    rx: mpsc::UnboundedReceiver<Event>,
    stop: Arc<AtomicBool>,
}

impl TerminalEvents {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                match crossterm::event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => match crossterm::event::read() {
                        Ok(ev) => {
                            if tx.send(ev).is_err() {
                                break;
                            }
                        }
                        Err(err) => error!(error = %err, "failed to read terminal event"),
                    },
                    Err(err) => {
                        error!(error = %err, "terminal event poll failed");
                        break;
                    }
                }
            }
            debug!("terminal event thread stopped");
        });
        Self { rx, stop }
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for TerminalEvents {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
