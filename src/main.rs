use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{select, sync::mpsc};
use tracing::info;

use magnetbit::{
    app::{Action, App, Services},
    clipboard::{SystemClipboard, TerminalClipboard},
    config::{Args, Config},
    events::TerminalEvents,
    launch::SystemLauncher,
    logging,
    service::HttpConversionService,
    theme::{FileThemeStore, load_theme},
    tui, ui,
};

const TICK: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    logging::init(&config.log_file, &config.log_level)?;
    info!(service_url = %config.service.service_url, "starting");

    let converter = HttpConversionService::new(config.service.clone())
        .context("failed to build HTTP client")?;
    let themes = FileThemeStore::new(config.theme_file.clone());
    let theme = load_theme(&themes);

    let (actions_tx, mut actions) = mpsc::unbounded_channel();
    let mut app = App::new(
        Services {
            converter: Arc::new(converter),
            clipboard: Box::new(SystemClipboard::default()),
            fallback_clipboard: Box::new(TerminalClipboard),
            launcher: Box::new(SystemLauncher),
            themes: Box::new(themes),
        },
        theme,
        actions_tx,
    );

    tui::install_panic_hook();
    let mut terminal = tui::setup_terminal()?;
    let outcome = run(&mut terminal, &mut app, &mut actions).await;
    tui::restore_terminal()?;
    info!("exiting");
    outcome
}

async fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    actions: &mut mpsc::UnboundedReceiver<Action>,
) -> Result<()> {
    let mut events = TerminalEvents::start();
    let mut tick = tokio::time::interval(TICK);

    let mut should_quit = false;

    while !should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;

        select! {
            _ = tick.tick() => {
                app.tick(Instant::now());
            }
            Some(ev) = events.recv() => {
                match app.handle_event(ev) {
                    Ok(quit) => should_quit = quit,
                    Err(err) => app.report_unexpected(err),
                }
            }
            Some(action) = actions.recv() => {
                if let Err(err) = app.dispatch(action) {
                    app.report_unexpected(err);
                }
            }
        }
    }
    Ok(())
}
