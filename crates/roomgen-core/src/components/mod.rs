//! Component definitions attached to spawned entities in the host scene.
//!
//! Components are pure data structs. Placement logic lives in `generation`.

mod common;
mod room;

pub use common::*;
pub use room::*;
