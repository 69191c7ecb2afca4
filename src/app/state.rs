use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    clipboard::ClipboardSink,
    launch::Launcher,
    service::{ConversionResult, ConversionService},
    theme::{Palette, ThemeStore},
};

use super::action::Action;

pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);
pub const TOAST_DURATION: Duration = Duration::from_secs(3);
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    #[default]
    TorrentToMagnet,
    MagnetToTorrent,
}

impl ConversionMode {
    pub fn other(self) -> Self {
        match self {
            Self::TorrentToMagnet => Self::MagnetToTorrent,
            Self::MagnetToTorrent => Self::TorrentToMagnet,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::TorrentToMagnet => "torrent-to-magnet",
            Self::MagnetToTorrent => "magnet-to-torrent",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::TorrentToMagnet => "Torrent → Magnet",
            Self::MagnetToTorrent => "Magnet → Torrent",
        }
    }

    pub fn input_label(self) -> &'static str {
        match self {
            Self::TorrentToMagnet => "Torrent URL",
            Self::MagnetToTorrent => "Magnet link",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::TorrentToMagnet => "https://example.com/file.torrent",
            Self::MagnetToTorrent => "magnet:?xt=urn:btih:...",
        }
    }

    pub fn open_label(self) -> &'static str {
        match self {
            Self::TorrentToMagnet => "Open in torrent client",
            Self::MagnetToTorrent => "Download .torrent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Actions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Loading { request: u64 },
    Success(ConversionResult),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub until: Instant,
}

pub struct Services {
    pub converter: Arc<dyn ConversionService>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub fallback_clipboard: Box<dyn ClipboardSink>,
    pub launcher: Box<dyn Launcher>,
    pub themes: Box<dyn ThemeStore>,
}

pub struct App {
    pub(crate) services: Services,
    pub(crate) actions: UnboundedSender<Action>,
    pub(crate) mode: ConversionMode,
    pub(crate) phase: Phase,
    pub(crate) next_request: u64,
    pub(crate) input: String,
    pub(crate) input_cursor: usize,
    pub(crate) focus: Focus,
    pub(crate) status: String,
    pub(crate) theme: String,
    pub(crate) copied_until: Option<Instant>,
    pub(crate) toast: Option<Toast>,
    pub(crate) show_help: bool,
    pub(crate) help_scroll: u16,
}

impl App {
    /// `actions` is where finished background work is delivered; the owner
    /// of the receiving end feeds those actions back through `dispatch`.
    pub fn new(services: Services, theme: String, actions: UnboundedSender<Action>) -> Self {
        Self {
            services,
            actions,
            mode: ConversionMode::default(),
            phase: Phase::Idle,
            next_request: 0,
            input: String::new(),
            input_cursor: 0,
            focus: Focus::Input,
            status: "Ready".to_string(),
            theme,
            copied_until: None,
            toast: None,
            show_help: false,
            help_scroll: 0,
        }
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    pub fn ui_state(&self) -> UiState {
        match self.phase {
            Phase::Idle => UiState::Idle,
            Phase::Loading { .. } => UiState::Loading,
            Phase::Success(_) => UiState::Success,
            Phase::Error(_) => UiState::Error,
        }
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        match &self.phase {
            Phase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_cursor(&self) -> usize {
        self.input_cursor
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(&self.theme)
    }

    pub fn copied(&self) -> bool {
        self.copied_until.is_some()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn help_scroll(&self) -> u16 {
        self.help_scroll
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Drops transient confirmations whose time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.copied_until.is_some_and(|until| now >= until) {
            self.copied_until = None;
        }
        if self.toast.as_ref().is_some_and(|toast| now >= toast.until) {
            self.toast = None;
        }
    }

    pub(crate) fn show_toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            message: message.into(),
            until: now + TOAST_DURATION,
        });
    }

    pub(crate) fn show_result(&mut self, result: ConversionResult) {
        self.status = match self.mode {
            ConversionMode::TorrentToMagnet => "Magnet link ready".to_string(),
            ConversionMode::MagnetToTorrent => "Torrent link ready".to_string(),
        };
        self.phase = Phase::Success(result);
        self.copied_until = None;
        self.focus = Focus::Actions;
    }

    pub fn set_error(&mut self, err: impl ToString) {
        self.phase = Phase::Error(err.to_string());
        self.status = "Error".to_string();
        self.copied_until = None;
    }

    /// Catch-all for failures nothing else handled. The detail goes to the
    /// log, the user gets a generic message and a usable form.
    pub fn report_unexpected(&mut self, err: anyhow::Error) {
        tracing::error!(error = %format!("{err:#}"), "unexpected error");
        self.show_help = false;
        self.set_error(UNEXPECTED_ERROR);
    }

    pub(crate) fn reset(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
        self.phase = Phase::Idle;
        self.copied_until = None;
        self.focus = Focus::Input;
        self.status = "Ready".to_string();
    }

    pub(crate) fn set_input(&mut self, text: &str) {
        self.input = text
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string();
        self.input_cursor = self.input.chars().count();
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        let idx = super::util::cursor_to_byte_index(&self.input, self.input_cursor);
        self.input.insert(idx, c);
        self.input_cursor += 1;
    }

    pub(crate) fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let end = super::util::cursor_to_byte_index(&self.input, self.input_cursor);
        let start = super::util::cursor_to_byte_index(&self.input, self.input_cursor - 1);
        self.input.replace_range(start..end, "");
        self.input_cursor -= 1;
    }

    pub(crate) fn delete(&mut self) {
        let len = self.input.chars().count();
        if self.input_cursor >= len {
            return;
        }
        let start = super::util::cursor_to_byte_index(&self.input, self.input_cursor);
        let end = super::util::cursor_to_byte_index(&self.input, self.input_cursor + 1);
        self.input.replace_range(start..end, "");
    }

    pub(crate) fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub(crate) fn move_cursor_right(&mut self) {
        let len = self.input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(len);
    }
}
