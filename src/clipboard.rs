use std::io;

use crossterm::{clipboard::CopyToClipboard, execute};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    System(#[from] arboard::Error),
    #[error("terminal clipboard write failed: {0}")]
    Terminal(#[from] io::Error),
}

pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard. The handle is kept for the lifetime of the app because
/// on X11 the copied text disappears once its owner is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            if let Err(err) = clipboard.set_text(text.to_owned()) {
                self.inner = None;
                return Err(err.into());
            }
        }
        Ok(())
    }
}

/// Asks the terminal emulator to set the clipboard with an OSC 52 sequence.
/// Works over SSH; terminals that ignore the sequence fail silently.
#[derive(Default)]
pub struct TerminalClipboard;

impl ClipboardSink for TerminalClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        execute!(io::stdout(), CopyToClipboard::to_clipboard_from(text))?;
        Ok(())
    }
}
