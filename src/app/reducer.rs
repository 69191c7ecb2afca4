use std::{collections::VecDeque, time::Instant};

use anyhow::{Result, anyhow};
use tracing::{debug, info, warn};

use crate::{service::ConvertError, theme::next_theme};

use super::{
    Focus,
    action::Action,
    effect::Effect,
    state::{App, Phase},
    validate::validate_input,
};

impl App {
    /// Returns `true` when the app should quit.
    pub fn handle_event(&mut self, ev: crossterm::event::Event) -> Result<bool> {
        let actions = self.actions_from_event(ev);
        self.dispatch_all(actions)
    }

    pub fn dispatch(&mut self, action: Action) -> Result<bool> {
        self.dispatch_all(vec![action])
    }

    fn dispatch_all(&mut self, actions: Vec<Action>) -> Result<bool> {
        let mut queue: VecDeque<Action> = actions.into();
        while let Some(action) = queue.pop_front() {
            if let Some(quit) = self.apply_action(action, &mut queue)? {
                return Ok(quit);
            }
        }
        Ok(false)
    }

    fn apply_action(
        &mut self,
        action: Action,
        queue: &mut VecDeque<Action>,
    ) -> Result<Option<bool>> {
        match action {
            Action::Paste(text) => {
                self.set_input(&text);
                self.focus = Focus::Input;
            }
            Action::InputChar(c) => {
                self.insert_char(c);
            }
            Action::InputBackspace => {
                self.backspace();
            }
            Action::InputDelete => {
                self.delete();
            }
            Action::InputLeft => {
                self.move_cursor_left();
            }
            Action::InputRight => {
                self.move_cursor_right();
            }
            Action::InputHome => {
                self.input_cursor = 0;
            }
            Action::InputEnd => {
                self.input_cursor = self.input.chars().count();
            }
            Action::Submit => {
                if self.is_loading() {
                    debug!("submit ignored, a conversion is already running");
                    return Ok(None);
                }
                let value = self.input.trim().to_string();
                if let Err(err) = validate_input(&value, self.mode) {
                    debug!(reason = %err, "input rejected");
                    self.set_error(err);
                    return Ok(None);
                }
                self.next_request += 1;
                let request = self.next_request;
                self.phase = Phase::Loading { request };
                self.copied_until = None;
                self.status = "Converting...".to_string();
                info!(request, mode = self.mode.slug(), "conversion started");
                queue.push_back(Action::RunEffect(Effect::Convert {
                    request,
                    mode: self.mode,
                    input: value,
                }));
            }
            Action::ConversionFinished { request, outcome } => {
                let current = matches!(self.phase, Phase::Loading { request: r } if r == request);
                if !current {
                    debug!(request, "discarding stale conversion result");
                    return Ok(None);
                }
                match outcome {
                    Ok(result) if !result.value.is_empty() => {
                        info!(request, "conversion finished");
                        self.show_result(result);
                    }
                    Ok(_) => {
                        warn!(request, "conversion returned an empty result");
                        self.set_error(ConvertError::MissingResult);
                    }
                    Err(ConvertError::Task(detail)) => {
                        self.report_unexpected(anyhow!(detail).context("conversion task"));
                    }
                    Err(err) => {
                        warn!(request, error = %err, "conversion failed");
                        self.set_error(err);
                    }
                }
            }
            Action::FocusInput => {
                self.focus = Focus::Input;
            }
            Action::FocusActions => {
                self.focus = Focus::Actions;
            }
            Action::Copy => {
                if self.result().is_some() {
                    queue.push_back(Action::RunEffect(Effect::CopyResult));
                }
            }
            Action::Open => {
                if self.result().is_some() {
                    queue.push_back(Action::RunEffect(Effect::OpenResult));
                }
            }
            Action::Reset => {
                self.reset();
            }
            Action::SwitchMode => {
                let mode = self.mode.other();
                queue.push_back(Action::SetMode(mode));
            }
            Action::SetMode(mode) => {
                self.mode = mode;
                self.reset();
                self.status = format!("Mode: {}", mode.title());
                debug!(mode = mode.slug(), "mode switched");
            }
            Action::CycleTheme => {
                let theme = next_theme(&self.theme).to_string();
                self.theme = theme.clone();
                queue.push_back(Action::RunEffect(Effect::PersistTheme(theme)));
            }
            Action::HelpOpen => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            Action::HelpClose => {
                self.show_help = false;
                self.help_scroll = 0;
            }
            Action::HelpScroll(delta) => {
                if delta.is_negative() {
                    self.help_scroll = self.help_scroll.saturating_sub(delta.unsigned_abs());
                } else {
                    self.help_scroll = self.help_scroll.saturating_add(delta as u16);
                }
            }
            Action::Quit => {
                return Ok(Some(true));
            }
            Action::RunEffect(effect) => {
                let next = self.run_effect(effect, Instant::now())?;
                queue.extend(next);
            }
        }
        Ok(None)
    }
}
