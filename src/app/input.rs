use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{ConversionMode, Focus, action::Action, state::App};

impl App {
    pub fn actions_from_event(&self, ev: Event) -> Vec<Action> {
        match ev {
            Event::Key(key) => self.actions_from_key(key),
            Event::Paste(text) => vec![Action::Paste(text)],
            _ => Vec::new(),
        }
    }

    pub fn actions_from_key(&self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Repeat {
            let repeat_ok = matches!(
                key.code,
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Backspace
            ) || (self.focus == Focus::Input && matches!(key.code, KeyCode::Char(_)));
            if !repeat_ok {
                return Vec::new();
            }
        } else if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => vec![Action::Quit],
                _ => Vec::new(),
            };
        }
        if self.show_help {
            return match key.code {
                KeyCode::Char('?') | KeyCode::Char('x') | KeyCode::Esc => {
                    vec![Action::HelpClose]
                }
                KeyCode::Up | KeyCode::Char('k') => vec![Action::HelpScroll(-1)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::HelpScroll(1)],
                _ => Vec::new(),
            };
        }
        match self.focus {
            Focus::Input => match key.code {
                KeyCode::Enter => vec![Action::Submit],
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => vec![Action::FocusActions],
                KeyCode::Backspace => vec![Action::InputBackspace],
                KeyCode::Delete => vec![Action::InputDelete],
                KeyCode::Left => vec![Action::InputLeft],
                KeyCode::Right => vec![Action::InputRight],
                KeyCode::Home => vec![Action::InputHome],
                KeyCode::End => vec![Action::InputEnd],
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                    vec![Action::InputChar(c)]
                }
                _ => Vec::new(),
            },
            Focus::Actions => match key.code {
                KeyCode::Char('c') | KeyCode::Char('y') => vec![Action::Copy],
                KeyCode::Char('o') => vec![Action::Open],
                KeyCode::Char('r') => vec![Action::Reset],
                KeyCode::Char('m') => vec![Action::SwitchMode],
                KeyCode::Char('1') => vec![Action::SetMode(ConversionMode::TorrentToMagnet)],
                KeyCode::Char('2') => vec![Action::SetMode(ConversionMode::MagnetToTorrent)],
                KeyCode::Char('t') => vec![Action::CycleTheme],
                KeyCode::Char('i') | KeyCode::Tab | KeyCode::BackTab | KeyCode::Enter => {
                    vec![Action::FocusInput]
                }
                KeyCode::Char('?') => vec![Action::HelpOpen],
                KeyCode::Char('q') => vec![Action::Quit],
                _ => Vec::new(),
            },
        }
    }
}
