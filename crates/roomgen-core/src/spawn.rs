//! Spawn service - the seam between generation and the host scene.
//!
//! Generation never touches the scene directly; it asks a [`SpawnService`]
//! to create or destroy entities. `hecs::World` is the stock implementation:
//! each spawned entity gets a [`Prefab`], a [`Role`], a [`Transform`] and,
//! when attached to something, a [`Parent`].

use hecs::{Entity, EntityBuilder, World};

use crate::catalog::KindId;
use crate::components::{Parent, Prefab, Role, Transform};

/// Everything the host needs to instantiate one prefab.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest<'a> {
    pub kind: &'a KindId,
    pub role: Role,
    pub transform: Transform,
    pub parent: Option<Entity>,
}

/// Creates and destroys entities in the host scene.
pub trait SpawnService {
    fn spawn(&mut self, request: SpawnRequest<'_>) -> Entity;

    /// Remove an entity and everything attached to it. Unknown or already
    /// destroyed handles are ignored.
    fn destroy(&mut self, entity: Entity);
}

impl SpawnService for World {
    fn spawn(&mut self, request: SpawnRequest<'_>) -> Entity {
        let mut builder = EntityBuilder::new();
        builder
            .add(Prefab(request.kind.clone()))
            .add(request.role)
            .add(request.transform);
        if let Some(parent) = request.parent {
            builder.add(Parent(parent));
        }
        World::spawn(self, builder.build())
    }

    fn destroy(&mut self, entity: Entity) {
        let children: Vec<Entity> = self
            .query::<&Parent>()
            .iter()
            .filter(|(_, parent)| parent.0 == entity)
            .map(|(child, _)| child)
            .collect();
        for child in children {
            SpawnService::destroy(self, child);
        }
        // Already gone is fine: teardown is idempotent
        let _ = self.despawn(entity);
    }
}

/// Number of live entities in `world` with the given role.
pub fn count_role(world: &World, role: Role) -> usize {
    world
        .query::<&Role>()
        .iter()
        .filter(|(_, r)| **r == role)
        .count()
}
