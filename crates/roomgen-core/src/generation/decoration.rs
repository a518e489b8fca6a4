//! Decoration placement - wall-mounted pieces and free-standing props.
//!
//! Each round tries one prop and one wall decoration. Rounds repeat while at
//! least one of the two attempts succeeds, so the pass stops at the first
//! round that places nothing (quotas met, or every candidate rejected
//! `MAX_ATTEMPTS` times in a row).
//!
//! Every candidate must clear the separation rule against all decorations
//! already placed, in both categories:
//! `distance(candidate, placed) >= max(placed.size, candidate.size)`.

use hecs::Entity;
use rand::Rng;

use super::{GenerationError, RoomLayout, MAX_ATTEMPTS};
use crate::catalog::{pick, DecorationSpec, KindId, RoomCatalog};
use crate::components::{BoundingBox, Role, Transform, Vec3};
use crate::config::{validate_decoration_config, DecorationConfig, RoomConfig};
use crate::grid::GridCoord;
use crate::spawn::{SpawnRequest, SpawnService};

/// A decoration placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedDecoration {
    pub entity: Entity,
    pub kind: KindId,
    pub transform: Transform,
    pub exclusion_size: f32,
    /// Wall the decoration hangs on; `None` for props.
    pub wall: Option<Entity>,
}

impl SpawnedDecoration {
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// The two decoration lists of a room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecorationSet {
    pub wall: Vec<SpawnedDecoration>,
    pub prop: Vec<SpawnedDecoration>,
}

impl DecorationSet {
    pub fn len(&self) -> usize {
        self.wall.len() + self.prop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wall.is_empty() && self.prop.is_empty()
    }

    /// Wall decorations first, then props.
    pub fn iter(&self) -> impl Iterator<Item = &SpawnedDecoration> {
        self.wall.iter().chain(self.prop.iter())
    }

    /// True if a decoration of `size` at `candidate` keeps its distance from
    /// every placed decoration.
    pub fn has_room_for(&self, candidate: Vec3, size: f32) -> bool {
        self.iter()
            .all(|placed| candidate.distance(&placed.position()) >= placed.exclusion_size.max(size))
    }

    /// Destroy every decoration and empty both lists. Safe to call twice.
    pub fn clear(&mut self, spawner: &mut impl SpawnService) {
        for decoration in self.wall.drain(..).chain(self.prop.drain(..)) {
            spawner.destroy(decoration.entity);
        }
    }
}

/// Stochastic wall-decoration and prop pass over a finished layout.
pub struct DecorationPlacer<'a> {
    config: &'a DecorationConfig,
    catalog: &'a RoomCatalog,
    prop_area: BoundingBox,
}

impl<'a> DecorationPlacer<'a> {
    pub fn new(
        config: &'a DecorationConfig,
        room: &RoomConfig,
        catalog: &'a RoomCatalog,
        layout: &RoomLayout,
    ) -> Result<Self, GenerationError> {
        let errors = validate_decoration_config(config, room, catalog);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(Self {
            config,
            catalog,
            prop_area: prop_area(layout, config.safe_area),
        })
    }

    /// Run rounds until one places nothing.
    pub fn place(
        &self,
        layout: &RoomLayout,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) -> DecorationSet {
        let mut placed = DecorationSet::default();
        loop {
            let prop_spawned = self.try_place_prop(&mut placed, spawner, rng);
            let wall_spawned = self.try_place_wall(layout, &mut placed, spawner, rng);
            if !prop_spawned && !wall_spawned {
                break;
            }
        }
        placed
    }

    /// One wall-decoration attempt: up to `MAX_ATTEMPTS` random spec/wall
    /// pairs until one clears the separation rule.
    pub fn try_place_wall(
        &self,
        layout: &RoomLayout,
        placed: &mut DecorationSet,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) -> bool {
        let specs = &self.catalog.wall_decorations;
        if specs.is_empty() || layout.walls.is_empty() {
            return false;
        }
        if quota_met(placed.wall.len(), self.config.wall_quota, self.config.allow_wall_overflow) {
            return false;
        }

        for _ in 0..MAX_ATTEMPTS {
            let Some(spec) = pick(specs, rng) else {
                return false;
            };
            let wall = &layout.walls[rng.gen_range(0..layout.walls.len())];
            let position = wall.transform.local_to_world(spec.position_offset)
                + wall.transform.forward() * self.config.wall_offset;

            if !placed.has_room_for(position, spec.exclusion_size) {
                continue;
            }

            let transform =
                Transform::new(position, wall.transform.rotation).rotated(spec.rotation_offset);
            let decoration = spawn_decoration(
                spawner,
                spec,
                transform,
                Role::WallDecoration,
                Some(wall.entity),
            );
            placed.wall.push(decoration);
            return true;
        }
        false
    }

    /// One prop attempt: up to `MAX_ATTEMPTS` uniform samples inside the
    /// prop area until one clears the separation rule.
    pub fn try_place_prop(
        &self,
        placed: &mut DecorationSet,
        spawner: &mut impl SpawnService,
        rng: &mut impl Rng,
    ) -> bool {
        let specs = &self.catalog.prop_decorations;
        if specs.is_empty() {
            return false;
        }
        if quota_met(placed.prop.len(), self.config.prop_quota, self.config.allow_prop_overflow) {
            return false;
        }

        let area = self.prop_area;
        for _ in 0..MAX_ATTEMPTS {
            let Some(spec) = pick(specs, rng) else {
                return false;
            };
            let x = rng.gen_range(area.min.x..=area.max.x);
            let z = rng.gen_range(area.min.z..=area.max.z);
            let position = Vec3::new(x, area.min.y + self.config.prop_offset, z) + spec.position_offset;

            if !placed.has_room_for(position, spec.exclusion_size) {
                continue;
            }

            let mut transform = Transform::at(position);
            if spec.allow_random_rotation {
                let yaw: f32 = rng.gen_range(0.0..360.0);
                transform = transform.rotated(Vec3::new(0.0, yaw, 0.0));
            }
            let decoration = spawn_decoration(spawner, spec, transform, Role::PropDecoration, None);
            placed.prop.push(decoration);
            return true;
        }
        false
    }
}

fn quota_met(count: usize, quota: u32, allow_overflow: bool) -> bool {
    count >= quota as usize && !allow_overflow
}

/// Rectangle between the floor cells `safe_area` in from opposite corners.
fn prop_area(layout: &RoomLayout, safe_area: u32) -> BoundingBox {
    let grid = &layout.grid;
    let safe = safe_area as i32;
    let far_x = grid.width() as i32 - 1 - safe;
    let far_z = grid.depth() as i32 - 1 - safe;
    BoundingBox::new(
        grid.world_position(GridCoord::flat(safe, safe)),
        grid.world_position(GridCoord::flat(far_x, far_z)),
    )
}

fn spawn_decoration(
    spawner: &mut impl SpawnService,
    spec: &DecorationSpec,
    transform: Transform,
    role: Role,
    wall: Option<Entity>,
) -> SpawnedDecoration {
    let entity = spawner.spawn(SpawnRequest {
        kind: &spec.kind,
        role,
        transform,
        parent: wall,
    });
    SpawnedDecoration {
        entity,
        kind: spec.kind.clone(),
        transform,
        exclusion_size: spec.exclusion_size,
        wall,
    }
}

/// Validate settings and decorate `layout` in one call.
pub fn place_decorations(
    spawner: &mut impl SpawnService,
    layout: &RoomLayout,
    room: &RoomConfig,
    config: &DecorationConfig,
    catalog: &RoomCatalog,
    rng: &mut impl Rng,
) -> Result<DecorationSet, GenerationError> {
    let placer = DecorationPlacer::new(config, room, catalog, layout)?;
    Ok(placer.place(layout, spawner, rng))
}
