//! Room structure components: what role a spawned entity plays in the layout.

use serde::{Deserialize, Serialize};

/// Role of a spawned entity within the generated room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Floor,
    Wall,
    Door,
    Window,
    WallDecoration,
    PropDecoration,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Floor => "floor",
            Role::Wall => "wall",
            Role::Door => "door",
            Role::Window => "window",
            Role::WallDecoration => "wall decoration",
            Role::PropDecoration => "prop decoration",
        }
    }
}
