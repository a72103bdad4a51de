/// Configuration, types, and shared structures for rfpulse.
///
/// This crate contains the shared types, traits, timing utilities, and the
/// `.rfdat` wire format used across the rfpulse workspace.

pub mod config;
pub mod error;
pub mod pattern;
pub mod rfdat;
pub mod timing;
pub mod traits;

pub use config::{AppConfig, PlayConfig, RecordConfig};
pub use error::CoreError;
pub use pattern::Pattern;
pub use traits::{Gpio, LevelSample, LevelSampler, PinMode};

/// Re-exports pour accès par chemin sémantique.
pub mod tolerance {
    pub use crate::timing::{MATCH_TOLERANCE_US, near_match, near_match_blob, near_match_pair};
}
