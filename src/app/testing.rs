//! Fake services and a harness for driving `App` in tests.

use std::{
    cell::RefCell,
    io,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::{Action, App, Services, UiState};
use crate::{
    clipboard::{ClipboardError, ClipboardSink},
    launch::Launcher,
    service::{ConversionResult, ConversionService, ConvertError, ResultKind, TorrentMetadata},
    theme::ThemeStore,
};

pub(crate) const TORRENT_URL: &str = "https://example.com/file.torrent";
pub(crate) const MAGNET: &str = "magnet:?xt=urn:btih:ABC123";

#[derive(Clone, Default)]
pub(crate) struct FakeConverter {
    pub(crate) status: Option<u16>,
    pub(crate) metadata: Option<TorrentMetadata>,
    pub(crate) panic: bool,
    pub(crate) calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ConversionService for FakeConverter {
    async fn torrent_to_magnet(&self, _url: &str) -> Result<ConversionResult, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("converter blew up");
        }
        if let Some(status) = self.status {
            return Err(ConvertError::Server(status));
        }
        Ok(ConversionResult {
            kind: ResultKind::MagnetUri,
            value: MAGNET.to_string(),
            metadata: self.metadata.clone(),
        })
    }

    async fn magnet_to_torrent(&self, magnet: &str) -> Result<ConversionResult, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hash = crate::magnet::parse_info_hash(magnet)?;
        Ok(ConversionResult {
            kind: ResultKind::TorrentLink,
            value: format!("https://host/{hash}.torrent"),
            metadata: None,
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeClipboard {
    pub(crate) fail: bool,
    pub(crate) copied: Rc<RefCell<Vec<String>>>,
}

impl ClipboardSink for FakeClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Terminal(io::Error::other("no clipboard")));
        }
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeLauncher {
    pub(crate) fail: bool,
    pub(crate) launched: Rc<RefCell<Vec<String>>>,
}

impl Launcher for FakeLauncher {
    fn launch(&self, target: &str) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::other("no handler"));
        }
        self.launched.borrow_mut().push(target.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryThemes {
    pub(crate) saved: Rc<RefCell<Vec<String>>>,
}

impl ThemeStore for MemoryThemes {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.saved.borrow().last().cloned())
    }

    fn save(&mut self, theme: &str) -> anyhow::Result<()> {
        self.saved.borrow_mut().push(theme.to_string());
        Ok(())
    }
}

pub(crate) struct Harness {
    pub(crate) app: App,
    pub(crate) rx: UnboundedReceiver<Action>,
    pub(crate) calls: Arc<AtomicUsize>,
    pub(crate) clipboard: FakeClipboard,
    pub(crate) fallback: FakeClipboard,
    pub(crate) launcher: FakeLauncher,
    pub(crate) themes: MemoryThemes,
}

impl Harness {
    pub(crate) fn new(converter: FakeConverter) -> Self {
        Self::with(
            converter,
            FakeClipboard::default(),
            FakeClipboard::default(),
            FakeLauncher::default(),
        )
    }

    pub(crate) fn with(
        converter: FakeConverter,
        clipboard: FakeClipboard,
        fallback: FakeClipboard,
        launcher: FakeLauncher,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let themes = MemoryThemes::default();
        let calls = Arc::clone(&converter.calls);
        let services = Services {
            converter: Arc::new(converter),
            clipboard: Box::new(clipboard.clone()),
            fallback_clipboard: Box::new(fallback.clone()),
            launcher: Box::new(launcher.clone()),
            themes: Box::new(themes.clone()),
        };
        Self {
            app: App::new(services, "dark".to_string(), tx),
            rx,
            calls,
            clipboard,
            fallback,
            launcher,
            themes,
        }
    }

    pub(crate) fn submit(&mut self, input: &str) {
        self.app.dispatch(Action::Paste(input.to_string())).unwrap();
        self.app.dispatch(Action::Submit).unwrap();
    }

    pub(crate) async fn finish(&mut self) {
        let action = self.rx.recv().await.expect("conversion result");
        self.app.dispatch(action).unwrap();
    }

    pub(crate) async fn convert(&mut self, input: &str) {
        self.submit(input);
        assert_eq!(self.app.ui_state(), UiState::Loading);
        self.finish().await;
    }
}
