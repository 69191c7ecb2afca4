use std::{sync::Arc, time::Instant};

use anyhow::Result;
use tracing::{debug, warn};

use crate::service::{ConvertError, ResultKind};

use super::{
    ConversionMode,
    action::Action,
    effect::Effect,
    state::{App, COPY_FEEDBACK},
};

impl App {
    pub fn run_effect(&mut self, effect: Effect, now: Instant) -> Result<Vec<Action>> {
        match effect {
            Effect::Convert {
                request,
                mode,
                input,
            } => {
                self.spawn_conversion(request, mode, input);
            }
            Effect::CopyResult => {
                self.copy_result(now);
            }
            Effect::OpenResult => {
                self.open_result(now);
            }
            Effect::PersistTheme(theme) => match self.services.themes.save(&theme) {
                Ok(()) => {
                    debug!(theme = %theme, "theme saved");
                    self.status = format!("Theme: {theme}");
                }
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "failed to save theme");
                    self.status = format!("Theme not saved: {err}");
                }
            },
        }
        Ok(Vec::new())
    }

    /// The conversion runs off the event loop; its outcome comes back as
    /// `Action::ConversionFinished` tagged with `request`, also when the
    /// conversion task itself panics.
    fn spawn_conversion(&self, request: u64, mode: ConversionMode, input: String) {
        let converter = Arc::clone(&self.services.converter);
        let actions = self.actions.clone();
        let task = tokio::spawn(async move {
            match mode {
                ConversionMode::TorrentToMagnet => converter.torrent_to_magnet(&input).await,
                ConversionMode::MagnetToTorrent => converter.magnet_to_torrent(&input).await,
            }
        });
        tokio::spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(ConvertError::Task(err.to_string())),
            };
            if actions
                .send(Action::ConversionFinished { request, outcome })
                .is_err()
            {
                debug!(request, "conversion finished after shutdown");
            }
        });
    }

    fn copy_result(&mut self, now: Instant) {
        let Some(result) = self.result() else {
            return;
        };
        let text = result.value.clone();
        let kind = result.kind;

        match self.services.clipboard.copy_text(&text) {
            Ok(()) => {
                self.copied_until = Some(now + COPY_FEEDBACK);
                self.status = "Copied to clipboard".to_string();
            }
            Err(err) => {
                warn!(error = %err, "clipboard write failed, trying terminal fallback");
                let message = match self.services.fallback_clipboard.copy_text(&text) {
                    Ok(()) => match kind {
                        ResultKind::MagnetUri => "Magnet link copied to clipboard!",
                        ResultKind::TorrentLink => "Torrent link copied to clipboard!",
                    },
                    Err(err) => {
                        warn!(error = %err, "terminal clipboard fallback failed");
                        "Unable to access the clipboard"
                    }
                };
                self.show_toast(message, now);
            }
        }
    }

    /// A failed launch leaves the result in place so it can still be copied.
    fn open_result(&mut self, now: Instant) {
        let Some(result) = self.result() else {
            return;
        };
        let target = result.value.clone();
        let status = match result.kind {
            ResultKind::MagnetUri => "Handed magnet link to torrent client",
            ResultKind::TorrentLink => "Opened torrent link in browser",
        };
        match self.services.launcher.launch(&target) {
            Ok(()) => {
                debug!(%target, "launched");
                self.status = status.to_string();
            }
            Err(err) => {
                warn!(error = %err, %target, "launch failed");
                self.status = "Open failed".to_string();
                self.show_toast(format!("Failed to open link: {err}"), now);
            }
        }
    }
}
