use crate::service::{ConversionResult, ConvertError};

use super::{ConversionMode, effect::Effect};

#[derive(Debug)]
pub enum Action {
    Paste(String),
    InputChar(char),
    InputBackspace,
    InputDelete,
    InputLeft,
    InputRight,
    InputHome,
    InputEnd,
    Submit,
    FocusInput,
    FocusActions,
    Copy,
    Open,
    Reset,
    SwitchMode,
    SetMode(ConversionMode),
    CycleTheme,
    HelpOpen,
    HelpClose,
    HelpScroll(i16),
    Quit,
    RunEffect(Effect),
    ConversionFinished {
        request: u64,
        outcome: Result<ConversionResult, ConvertError>,
    },
}
