//! Room layout - floors, perimeter walls, doors and windows.
//!
//! Stages run strictly in order and each reads what the previous one
//! produced: floors fill the grid, walls ring the ground layer, then doors
//! and windows each consume wall segments. Nothing is revisited.

use hecs::Entity;
use rand::Rng;

use super::{GenerationError, MAX_ATTEMPTS};
use crate::catalog::{pick, KindId, RoomCatalog};
use crate::components::{Role, Transform, Vec3};
use crate::config::{validate_room_config, DoorRule, RoomConfig};
use crate::grid::{GridCell, GridCoord, SpatialGrid};
use crate::spawn::{SpawnRequest, SpawnService};

/// A floor, wall, door or window placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedEntity {
    pub entity: Entity,
    pub kind: KindId,
    pub transform: Transform,
    /// Floors: their own cell. Walls, doors, windows: the floor cell they border.
    pub cell: GridCoord,
}

/// Result of the layout pass.
#[derive(Debug, Clone)]
pub struct RoomLayout {
    pub grid: SpatialGrid<GridCell>,
    pub floors: Vec<SpawnedEntity>,
    /// Walls still standing; doors and windows remove theirs from here.
    pub walls: Vec<SpawnedEntity>,
    pub doors: Vec<SpawnedEntity>,
    pub windows: Vec<SpawnedEntity>,
}

/// Tile counts of a layout, requested vs placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    pub floors: usize,
    pub walls: usize,
    pub doors: usize,
    pub windows: usize,
    pub doors_requested: u32,
    pub windows_requested: u32,
}

impl RoomLayout {
    fn new(grid: SpatialGrid<GridCell>) -> Self {
        Self {
            grid,
            floors: Vec::new(),
            walls: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
        }
    }

    /// World position of the floor tile a wall, door or window borders.
    pub fn anchor(&self, tile: &SpawnedEntity) -> Vec3 {
        self.grid.world_position(tile.cell)
    }

    /// True if the wall borders one of the grid's corner cells.
    pub fn is_corner_wall(&self, wall: &SpawnedEntity) -> bool {
        self.grid.is_corner_cell(self.anchor(wall))
    }

    pub fn stats(&self, config: &RoomConfig) -> LayoutStats {
        LayoutStats {
            floors: self.floors.len(),
            walls: self.walls.len(),
            doors: self.doors.len(),
            windows: self.windows.len(),
            doors_requested: config.door_count,
            windows_requested: config.window_count,
        }
    }

    /// Destroy every spawned tile and empty the lists. Safe to call twice.
    pub fn clear(&mut self, spawner: &mut impl SpawnService) {
        for tile in self
            .floors
            .drain(..)
            .chain(self.walls.drain(..))
            .chain(self.doors.drain(..))
            .chain(self.windows.drain(..))
        {
            spawner.destroy(tile.entity);
        }
        let coords: Vec<GridCoord> = self.grid.coords().collect();
        for coord in coords {
            if let Some(cell) = self.grid.get_mut(coord) {
                cell.occupant = None;
            }
        }
    }
}

/// Deterministic floor → wall → door → window pass.
pub struct LayoutBuilder<'a> {
    config: &'a RoomConfig,
    catalog: &'a RoomCatalog,
}

impl<'a> LayoutBuilder<'a> {
    /// Validate the room settings up front; degenerate rooms are rejected here.
    pub fn new(config: &'a RoomConfig, catalog: &'a RoomCatalog) -> Result<Self, GenerationError> {
        let errors = validate_room_config(config);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(Self { config, catalog })
    }

    /// Run every stage and return the finished layout.
    pub fn build(
        &self,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) -> Result<RoomLayout, GenerationError> {
        let grid = SpatialGrid::from_fn(
            self.config.width,
            self.config.height,
            self.config.depth,
            self.config.cell_size,
            self.config.origin,
            GridCell::new,
        )?;
        let mut layout = RoomLayout::new(grid);

        self.spawn_floors(&mut layout, spawner, rng);
        self.spawn_walls(&mut layout, spawner, rng);
        self.place_doors(&mut layout, spawner, rng);
        self.place_windows(&mut layout, spawner, rng);

        Ok(layout)
    }

    /// One floor per cell of the full extent, recorded as the cell's occupant.
    pub fn spawn_floors(
        &self,
        layout: &mut RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) {
        if self.catalog.floors.is_empty() {
            return;
        }

        let coords: Vec<GridCoord> = layout.grid.coords().collect();
        for coord in coords {
            let Some(kind) = pick(&self.catalog.floors, rng) else {
                return;
            };
            let transform = Transform::at(layout.grid.world_position(coord));
            let entity = spawner.spawn(SpawnRequest {
                kind,
                role: Role::Floor,
                transform,
                parent: None,
            });
            if let Some(cell) = layout.grid.get_mut(coord) {
                cell.occupant = Some(entity);
            }
            layout.floors.push(SpawnedEntity {
                entity,
                kind: kind.clone(),
                transform,
                cell: coord,
            });
        }
    }

    /// Ring the ground layer: two walls per column along x, then two per row
    /// along z, each half a cell outside its tile and facing it.
    pub fn spawn_walls(
        &self,
        layout: &mut RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) {
        if self.catalog.walls.is_empty() {
            return;
        }

        let width = layout.grid.width() as i32;
        let depth = layout.grid.depth() as i32;

        for x in 0..width {
            self.spawn_wall(layout, spawner, rng, GridCoord::flat(x, 0), -Vec3::FORWARD);
            self.spawn_wall(layout, spawner, rng, GridCoord::flat(x, depth - 1), Vec3::FORWARD);
        }
        for z in 0..depth {
            self.spawn_wall(layout, spawner, rng, GridCoord::flat(0, z), -Vec3::RIGHT);
            self.spawn_wall(layout, spawner, rng, GridCoord::flat(width - 1, z), Vec3::RIGHT);
        }
    }

    fn spawn_wall(
        &self,
        layout: &mut RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
        cell: GridCoord,
        outward: Vec3,
    ) {
        let Some(kind) = pick(&self.catalog.walls, rng) else {
            return;
        };
        let tile = layout.grid.world_position(cell);
        let position = tile + outward * (layout.grid.cell_size() * 0.5);
        let transform = Transform::looking_at(position, tile);
        let entity = spawner.spawn(SpawnRequest {
            kind,
            role: Role::Wall,
            transform,
            parent: None,
        });
        layout.walls.push(SpawnedEntity {
            entity,
            kind: kind.clone(),
            transform,
            cell,
        });
    }

    /// Replace up to `door_count` walls with doors. A run of more than
    /// `MAX_ATTEMPTS` rejected candidates ends the stage early.
    pub fn place_doors(
        &self,
        layout: &mut RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) {
        if self.catalog.doors.is_empty() || layout.walls.is_empty() {
            return;
        }

        for _ in 0..self.config.door_count {
            if layout.walls.is_empty() {
                return;
            }
            let mut index = rng.gen_range(0..layout.walls.len());
            let mut attempts = MAX_ATTEMPTS;
            while self.rejects_door(layout, &layout.walls[index]) {
                index = rng.gen_range(0..layout.walls.len());
                attempts -= 1;
                if attempts == 0 {
                    return;
                }
            }
            let Some(kind) = pick(&self.catalog.doors, rng) else {
                return;
            };
            let door = replace_wall(layout, spawner, index, kind, Role::Door);
            layout.doors.push(door);
        }
    }

    fn rejects_door(&self, layout: &RoomLayout, wall: &SpawnedEntity) -> bool {
        match self.config.door_rule {
            DoorRule::AvoidCorners => layout.is_corner_wall(wall),
            DoorRule::AvoidAdjacentDoors => {
                let cell = layout.grid.get_at(layout.anchor(wall)).coord;
                layout
                    .doors
                    .iter()
                    .any(|door| layout.grid.are_neighbors(cell, door.cell))
            }
        }
    }

    /// Replace up to `window_count` random walls with windows.
    pub fn place_windows(
        &self,
        layout: &mut RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) {
        if self.catalog.windows.is_empty() {
            return;
        }

        for _ in 0..self.config.window_count {
            if layout.walls.is_empty() {
                return;
            }
            let index = rng.gen_range(0..layout.walls.len());
            let Some(kind) = pick(&self.catalog.windows, rng) else {
                return;
            };
            let window = replace_wall(layout, spawner, index, kind, Role::Window);
            layout.windows.push(window);
        }
    }
}

/// Swap the wall at `index` for a new tile with the same transform. The wall
/// leaves the active list and the scene.
fn replace_wall(
    layout: &mut RoomLayout,
    spawner: &mut impl SpawnService,
    index: usize,
    kind: &KindId,
    role: Role,
) -> SpawnedEntity {
    let wall = layout.walls.remove(index);
    let entity = spawner.spawn(SpawnRequest {
        kind,
        role,
        transform: wall.transform,
        parent: None,
    });
    spawner.destroy(wall.entity);
    SpawnedEntity {
        entity,
        kind: kind.clone(),
        transform: wall.transform,
        cell: wall.cell,
    }
}

/// Validate, build and return a layout in one call.
pub fn build_layout(
    spawner: &mut impl SpawnService,
    config: &RoomConfig,
    catalog: &RoomCatalog,
    rng: &mut impl Rng,
) -> Result<RoomLayout, GenerationError> {
    LayoutBuilder::new(config, catalog)?.build(spawner, rng)
}
