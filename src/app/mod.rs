mod action;
mod details;
mod effect;
mod effects;
mod input;
mod reducer;
mod state;
mod util;
mod validate;

pub use action::Action;
pub use details::{DetailField, NOT_AVAILABLE, detail_fields};
pub use effect::Effect;
pub use state::{
    App, COPY_FEEDBACK, ConversionMode, Focus, Services, TOAST_DURATION, Toast, UNEXPECTED_ERROR,
    UiState,
};
pub use validate::{ValidationError, validate_input};

#[cfg(test)]
pub(crate) mod testing;
