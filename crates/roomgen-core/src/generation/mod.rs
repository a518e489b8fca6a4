//! Generation - procedural creation of the room layout and its decorations.
//!
//! Two passes, each driven by its own seeded PRNG:
//!   1. `build_layout`       -- floors, walls, doors, windows
//!   2. `place_decorations`  -- wall decorations and free-standing props
//!
//! Both take the PRNG explicitly, so a pass is reproducible from its seed
//! and the draws of its sub-stages are order-dependent.

mod decoration;
mod layout;

pub use decoration::*;
pub use layout::*;

use crate::config::ConfigError;

/// Retry budget shared by every rejection-sampling loop.
pub const MAX_ATTEMPTS: u32 = 30;

/// Errors that can occur when asking for a room or its decorations.
#[derive(Debug)]
pub enum GenerationError {
    /// Settings failed validation; every problem found is listed.
    InvalidConfig(Vec<ConfigError>),
    /// A room already exists and must be cleared before generating again.
    RoomNotCleared,
    /// Decorations already exist and must be cleared before generating again.
    DecorationsNotCleared,
    /// Decorations were requested before a room was generated.
    NoRoom,
    /// A preset could not be parsed.
    Json(serde_json::Error),
}

impl From<Vec<ConfigError>> for GenerationError {
    fn from(errors: Vec<ConfigError>) -> Self {
        GenerationError::InvalidConfig(errors)
    }
}

impl From<ConfigError> for GenerationError {
    fn from(error: ConfigError) -> Self {
        GenerationError::InvalidConfig(vec![error])
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::Json(e)
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidConfig(errors) => {
                write!(f, "invalid configuration: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
            GenerationError::RoomNotCleared => {
                write!(f, "room already generated; clear it before regenerating")
            }
            GenerationError::DecorationsNotCleared => {
                write!(f, "decorations already generated; clear them before regenerating")
            }
            GenerationError::NoRoom => write!(f, "no room generated to decorate"),
            GenerationError::Json(e) => write!(f, "preset parse error: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Json(e) => Some(e),
            _ => None,
        }
    }
}
