//! Room generator - main entry point for building and decorating a room

use hecs::World;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::RoomCatalog;
use crate::components::Role;
use crate::config::{DecorationConfig, RoomConfig, RoomPreset};
use crate::generation::{
    build_layout, place_decorations, DecorationSet, GenerationError, LayoutStats, RoomLayout,
};
use crate::spawn::count_role;

/// Owns the scene and everything generated into it
pub struct RoomGenerator {
    /// ECS world holding every spawned tile and decoration
    pub world: World,
    /// Settings of the last requested room
    pub room_config: RoomConfig,
    /// Settings of the last requested decoration pass
    pub decoration_config: DecorationConfig,
    /// Kinds and decoration specs to draw from
    pub catalog: RoomCatalog,

    layout: Option<RoomLayout>,
    decorations: Option<DecorationSet>,
}

impl RoomGenerator {
    /// Create an empty generator drawing from `catalog`
    pub fn new(catalog: RoomCatalog) -> Self {
        Self {
            world: World::new(),
            room_config: RoomConfig::default(),
            decoration_config: DecorationConfig::default(),
            catalog,
            layout: None,
            decorations: None,
        }
    }

    /// Create a generator with a preset's settings; nothing is generated yet
    pub fn from_preset(preset: RoomPreset) -> Self {
        let mut generator = Self::new(preset.catalog);
        generator.room_config = preset.room;
        generator.decoration_config = preset.decorations;
        generator
    }

    pub fn from_json(json: &str) -> Result<Self, GenerationError> {
        Ok(Self::from_preset(RoomPreset::from_json(json)?))
    }

    /// Build grid, floors, walls, doors and windows.
    ///
    /// Refused while a room exists; call [`clear_room`](Self::clear_room) first.
    pub fn generate_room(&mut self, config: RoomConfig) -> Result<&RoomLayout, GenerationError> {
        if self.layout.is_some() {
            return Err(GenerationError::RoomNotCleared);
        }

        info!(
            "Generating {}x{}x{} room (seed {})",
            config.width, config.height, config.depth, config.seed
        );
        let mut rng = StdRng::seed_from_u64(config.seed);
        let layout = build_layout(&mut self.world, &config, &self.catalog, &mut rng)?;

        let stats = layout.stats(&config);
        info!(
            "Room ready: {} floors, {} walls, {}/{} doors, {}/{} windows",
            stats.floors,
            stats.walls,
            stats.doors,
            stats.doors_requested,
            stats.windows,
            stats.windows_requested
        );

        self.room_config = config;
        Ok(&*self.layout.insert(layout))
    }

    /// Place wall decorations and props into the current room.
    pub fn generate_decorations(
        &mut self,
        config: DecorationConfig,
    ) -> Result<&DecorationSet, GenerationError> {
        let Some(layout) = self.layout.as_ref() else {
            return Err(GenerationError::NoRoom);
        };
        if self.decorations.is_some() {
            return Err(GenerationError::DecorationsNotCleared);
        }

        debug!(
            "Decorating room (seed {}, quotas {}/{})",
            config.seed, config.wall_quota, config.prop_quota
        );
        let mut rng = StdRng::seed_from_u64(config.seed);
        let decorations = place_decorations(
            &mut self.world,
            layout,
            &self.room_config,
            &config,
            &self.catalog,
            &mut rng,
        )?;
        info!(
            "Placed {} wall decorations and {} props",
            decorations.wall.len(),
            decorations.prop.len()
        );

        self.decoration_config = config;
        Ok(&*self.decorations.insert(decorations))
    }

    /// Destroy the room. Decorations go with it since they hang on its walls.
    pub fn clear_room(&mut self) {
        self.clear_decorations();
        if let Some(mut layout) = self.layout.take() {
            layout.clear(&mut self.world);
            debug!("Room cleared");
        }
    }

    pub fn clear_decorations(&mut self) {
        if let Some(mut decorations) = self.decorations.take() {
            decorations.clear(&mut self.world);
            debug!("Decorations cleared");
        }
    }

    /// Clear everything, then rebuild both phases from the stored settings.
    pub fn regenerate(&mut self) -> Result<(), GenerationError> {
        self.clear_room();
        self.generate_room(self.room_config.clone())?;
        self.generate_decorations(self.decoration_config.clone())?;
        Ok(())
    }

    pub fn layout(&self) -> Option<&RoomLayout> {
        self.layout.as_ref()
    }

    pub fn decorations(&self) -> Option<&DecorationSet> {
        self.decorations.as_ref()
    }

    pub fn stats(&self) -> Option<LayoutStats> {
        self.layout.as_ref().map(|l| l.stats(&self.room_config))
    }

    /// Get floor count
    pub fn floor_count(&self) -> usize {
        count_role(&self.world, Role::Floor)
    }

    /// Get wall count (walls replaced by doors or windows excluded)
    pub fn wall_count(&self) -> usize {
        count_role(&self.world, Role::Wall)
    }

    pub fn door_count(&self) -> usize {
        count_role(&self.world, Role::Door)
    }

    pub fn window_count(&self) -> usize {
        count_role(&self.world, Role::Window)
    }

    /// Get decoration count across both categories
    pub fn decoration_count(&self) -> usize {
        count_role(&self.world, Role::WallDecoration) + count_role(&self.world, Role::PropDecoration)
    }
}

impl Default for RoomGenerator {
    fn default() -> Self {
        Self::new(RoomCatalog::basic())
    }
}
