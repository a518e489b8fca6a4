//! Spawnable kinds supplied by the host.
//!
//! Kinds are opaque identifiers; the host maps them to its own prefabs when
//! the spawn service is asked to create one.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Vec3;

/// Identifier of a spawnable prefab in the host's asset catalog.
pub type KindId = String;

/// A decoration prefab and how it is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationSpec {
    pub kind: KindId,
    /// Minimum center-to-center distance kept from every other decoration.
    #[serde(default)]
    pub exclusion_size: f32,
    /// Wall decorations: offset in the wall's local frame (x right, y up,
    /// z forward). Props: world-space offset added to the sampled point.
    #[serde(default)]
    pub position_offset: Vec3,
    /// Euler degrees added to the decoration's rotation once placed.
    #[serde(default)]
    pub rotation_offset: Vec3,
    /// Props only: spin around the up axis by a random yaw in `[0, 360)`.
    #[serde(default)]
    pub allow_random_rotation: bool,
}

impl DecorationSpec {
    pub fn new(kind: impl Into<KindId>, exclusion_size: f32) -> Self {
        Self {
            kind: kind.into(),
            exclusion_size,
            position_offset: Vec3::ZERO,
            rotation_offset: Vec3::ZERO,
            allow_random_rotation: false,
        }
    }

    pub fn with_position_offset(mut self, offset: Vec3) -> Self {
        self.position_offset = offset;
        self
    }

    pub fn with_rotation_offset(mut self, offset: Vec3) -> Self {
        self.rotation_offset = offset;
        self
    }

    pub fn with_random_rotation(mut self) -> Self {
        self.allow_random_rotation = true;
        self
    }
}

/// Every kind list a room generation run draws from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomCatalog {
    #[serde(default)]
    pub floors: Vec<KindId>,
    #[serde(default)]
    pub walls: Vec<KindId>,
    #[serde(default)]
    pub doors: Vec<KindId>,
    #[serde(default)]
    pub windows: Vec<KindId>,
    #[serde(default)]
    pub wall_decorations: Vec<DecorationSpec>,
    #[serde(default)]
    pub prop_decorations: Vec<DecorationSpec>,
}

impl RoomCatalog {
    /// Catalog with one kind per tile list and no decorations.
    pub fn basic() -> Self {
        Self {
            floors: vec!["floor".into()],
            walls: vec!["wall".into()],
            doors: vec!["door".into()],
            windows: vec!["window".into()],
            wall_decorations: Vec::new(),
            prop_decorations: Vec::new(),
        }
    }
}

/// Uniform choice from a catalog list. `None` for an empty list, which
/// callers treat as "skip this stage" without drawing from `rng`.
pub fn pick<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_empty_draws_nothing() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let empty: Vec<KindId> = Vec::new();
        assert!(pick(&empty, &mut a).is_none());
        // Stream untouched
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn test_pick_covers_all_entries() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec!["a", "b", "c"];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pick(&items, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_decoration_spec_from_json_defaults() {
        let spec: DecorationSpec = serde_json::from_str(r#"{ "kind": "painting" }"#).unwrap();
        assert_eq!(spec.kind, "painting");
        assert_eq!(spec.exclusion_size, 0.0);
        assert_eq!(spec.position_offset, Vec3::ZERO);
        assert!(!spec.allow_random_rotation);
    }

    #[test]
    fn test_builder_helpers() {
        let spec = DecorationSpec::new("lamp", 1.5)
            .with_position_offset(Vec3::new(0.0, 1.0, 0.0))
            .with_rotation_offset(Vec3::new(0.0, 45.0, 0.0))
            .with_random_rotation();
        assert_eq!(spec.exclusion_size, 1.5);
        assert_eq!(spec.position_offset.y, 1.0);
        assert_eq!(spec.rotation_offset.y, 45.0);
        assert!(spec.allow_random_rotation);
    }
}
