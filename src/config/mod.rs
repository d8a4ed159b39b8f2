//! Configuration system
//!
//! Trial strings and emission switches, optionally loaded from
//! ~/.config/manifest-yml/config.yaml. Defaults are applied here,
//! never inside the conversion core.

mod converter_config;
mod options;

pub use converter_config::{ConverterConfig, TrialSettings};
pub use options::{
    EmitOptions, EmptyCollections, TrialConfig, DEFAULT_TRIAL_ALLOWANCE, DEFAULT_TRIAL_WINDOW,
};
