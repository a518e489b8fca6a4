//! Room and decoration settings, and their validation.
//!
//! The host fills these in (usually from a JSON preset) before asking the
//! generator for a room. Validation returns every problem found so a
//! settings screen can show them all at once.
//!
//! ```
//! use roomgen_core::config::{validate_room_config, RoomConfig};
//!
//! let config = RoomConfig {
//!     width: 6,
//!     depth: 4,
//!     door_count: 2,
//!     ..RoomConfig::default()
//! };
//! assert!(validate_room_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{DecorationSpec, RoomCatalog};
use crate::components::Vec3;

/// Rule used to reject a candidate wall when placing a door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorRule {
    /// Skip walls bordering a corner cell of the grid.
    #[default]
    AvoidCorners,
    /// Skip walls whose cell neighbours an already placed door's cell.
    AvoidAdjacentDoors,
}

/// Geometry and tile counts of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Cells along x.
    pub width: u32,
    /// Cell layers along y. 1 for a flat room.
    pub height: u32,
    /// Cells along z.
    pub depth: u32,
    /// World size of one cell edge.
    pub cell_size: f32,
    /// World position of cell (0, 0, 0).
    pub origin: Vec3,
    pub door_count: u32,
    pub window_count: u32,
    pub door_rule: DoorRule,
    /// Seed for floors, walls, doors and windows.
    pub seed: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 4,
            height: 1,
            depth: 4,
            cell_size: 1.0,
            origin: Vec3::ZERO,
            door_count: 1,
            window_count: 0,
            door_rule: DoorRule::AvoidCorners,
            seed: 0,
        }
    }
}

impl RoomConfig {
    /// Number of wall segments a full perimeter has.
    pub fn perimeter_walls(&self) -> usize {
        2 * (self.width as usize + self.depth as usize)
    }
}

/// Decoration quotas and placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Seed for both decoration categories.
    pub seed: u64,
    /// Cells trimmed from each side of the floor before sampling props.
    pub safe_area: u32,
    pub wall_quota: u32,
    pub prop_quota: u32,
    /// Keep placing wall decorations past the quota until none fit.
    pub allow_wall_overflow: bool,
    /// Keep placing props past the quota until none fit.
    pub allow_prop_overflow: bool,
    /// Distance wall decorations are pushed along the wall's facing.
    pub wall_offset: f32,
    /// Height props are lifted above the floor.
    pub prop_offset: f32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            safe_area: 0,
            wall_quota: 4,
            prop_quota: 4,
            allow_wall_overflow: false,
            allow_prop_overflow: false,
            wall_offset: 0.0,
            prop_offset: 0.0,
        }
    }
}

/// Everything needed to build and decorate one room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPreset {
    pub name: String,
    pub room: RoomConfig,
    pub decorations: DecorationConfig,
    pub catalog: RoomCatalog,
}

impl RoomPreset {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse a JSON array of presets.
pub fn presets_from_json(json: &str) -> Result<Vec<RoomPreset>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A grid axis has no cells.
    EmptyGrid { width: u32, height: u32, depth: u32 },
    /// A grid axis does not fit signed cell coordinates.
    GridTooLarge { width: u32, height: u32, depth: u32 },
    /// Rooms need at least two cells along each horizontal axis.
    RoomTooSmall { width: u32, depth: u32 },
    /// Cell size must be finite and positive.
    InvalidCellSize(f32),
    /// Origin has a NaN or infinite component.
    NonFiniteOrigin,
    /// Safe area leaves no interior for props.
    SafeAreaTooLarge { safe_area: u32, width: u32, depth: u32 },
    /// Decoration offsets must be finite.
    NonFiniteOffset,
    /// Exclusion sizes must be finite and non-negative.
    InvalidExclusionSize { kind: String, size: f32 },
    /// Overflow placement never reaches a fixed point with zero-size decorations.
    UnboundedOverflow { kind: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyGrid {
                width,
                height,
                depth,
            } => write!(f, "grid has an empty axis: {}×{}×{}", width, height, depth),
            ConfigError::GridTooLarge {
                width,
                height,
                depth,
            } => write!(f, "grid too large: {}×{}×{}", width, height, depth),
            ConfigError::RoomTooSmall { width, depth } => {
                write!(f, "room must be at least 2×2 cells, got {}×{}", width, depth)
            }
            ConfigError::InvalidCellSize(size) => {
                write!(f, "cell size must be positive and finite, got {}", size)
            }
            ConfigError::NonFiniteOrigin => write!(f, "grid origin is not finite"),
            ConfigError::SafeAreaTooLarge {
                safe_area,
                width,
                depth,
            } => write!(
                f,
                "safe area {} leaves no interior in a {}×{} room",
                safe_area, width, depth
            ),
            ConfigError::NonFiniteOffset => write!(f, "decoration offsets must be finite"),
            ConfigError::InvalidExclusionSize { kind, size } => {
                write!(f, "decoration '{}' has invalid exclusion size {}", kind, size)
            }
            ConfigError::UnboundedOverflow { kind } => write!(
                f,
                "overflow enabled but decoration '{}' has no exclusion size",
                kind
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate room geometry, returning all errors found.
pub fn validate_room_config(config: &RoomConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.width == 0 || config.height == 0 || config.depth == 0 {
        errors.push(ConfigError::EmptyGrid {
            width: config.width,
            height: config.height,
            depth: config.depth,
        });
    } else if config.width < 2 || config.depth < 2 {
        errors.push(ConfigError::RoomTooSmall {
            width: config.width,
            depth: config.depth,
        });
    }
    let max = i32::MAX as u32;
    if config.width > max || config.height > max || config.depth > max {
        errors.push(ConfigError::GridTooLarge {
            width: config.width,
            height: config.height,
            depth: config.depth,
        });
    }
    if !(config.cell_size.is_finite() && config.cell_size > 0.0) {
        errors.push(ConfigError::InvalidCellSize(config.cell_size));
    }
    if !config.origin.is_finite() {
        errors.push(ConfigError::NonFiniteOrigin);
    }

    errors
}

/// Validate decoration settings against the room they will decorate.
pub fn validate_decoration_config(
    config: &DecorationConfig,
    room: &RoomConfig,
    catalog: &RoomCatalog,
) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let interior = room.width.min(room.depth);
    if u64::from(config.safe_area) * 2 >= u64::from(interior) {
        errors.push(ConfigError::SafeAreaTooLarge {
            safe_area: config.safe_area,
            width: room.width,
            depth: room.depth,
        });
    }
    if !(config.wall_offset.is_finite() && config.prop_offset.is_finite()) {
        errors.push(ConfigError::NonFiniteOffset);
    }

    check_specs(
        &catalog.wall_decorations,
        config.allow_wall_overflow,
        &mut errors,
    );
    check_specs(
        &catalog.prop_decorations,
        config.allow_prop_overflow,
        &mut errors,
    );

    errors
}

fn check_specs(specs: &[DecorationSpec], overflow: bool, errors: &mut Vec<ConfigError>) {
    for spec in specs {
        if !(spec.exclusion_size.is_finite() && spec.exclusion_size >= 0.0) {
            errors.push(ConfigError::InvalidExclusionSize {
                kind: spec.kind.clone(),
                size: spec.exclusion_size,
            });
        } else if overflow && spec.exclusion_size == 0.0 {
            errors.push(ConfigError::UnboundedOverflow {
                kind: spec.kind.clone(),
            });
        }
        if !(spec.position_offset.is_finite() && spec.rotation_offset.is_finite()) {
            errors.push(ConfigError::NonFiniteOffset);
        }
    }
}
