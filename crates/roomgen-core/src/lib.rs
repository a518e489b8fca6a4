//! Roomgen Core - Procedural Room Generation
//!
//! Builds a rectangular room on a uniform grid (floors, perimeter walls,
//! doors, windows), then scatters wall decorations and free-standing props
//! with rejection sampling so no two decorations crowd each other.
//!
//! # Architecture
//!
//! | Module       | Purpose                                              |
//! |--------------|------------------------------------------------------|
//! | `grid`       | Generic 3-D cell container, world/grid conversions   |
//! | `catalog`    | Prefab kinds and decoration specs to draw from       |
//! | `config`     | Room/decoration settings, presets, validation        |
//! | `components` | ECS components attached to spawned entities          |
//! | `spawn`      | Seam to the host scene (`hecs::World` built in)      |
//! | `generation` | Layout builder and decoration placer                 |
//! | `engine`     | `RoomGenerator` facade owning world and results      |
//!
//! Every random draw comes from a `StdRng` seeded per phase, so a room and
//! its decorations are reproducible from two seeds.
//!
//! # Example
//!
//! ```rust
//! use roomgen_core::prelude::*;
//!
//! let mut generator = RoomGenerator::new(RoomCatalog::basic());
//! generator
//!     .generate_room(RoomConfig {
//!         width: 4,
//!         depth: 4,
//!         door_count: 1,
//!         seed: 42,
//!         ..RoomConfig::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(generator.floor_count(), 16);
//! assert_eq!(generator.wall_count() + generator.door_count(), 16);
//! ```

pub mod catalog;
pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod grid;
pub mod spawn;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::catalog::{DecorationSpec, KindId, RoomCatalog};
    pub use crate::components::*;
    pub use crate::config::{DecorationConfig, DoorRule, RoomConfig, RoomPreset};
    pub use crate::engine::RoomGenerator;
    pub use crate::generation::{DecorationSet, GenerationError, RoomLayout};
    pub use crate::grid::{GridCell, GridCoord, SpatialGrid};
    pub use crate::spawn::SpawnService;
}
