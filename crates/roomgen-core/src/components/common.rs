//! Common components shared by every spawned tile and decoration.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::catalog::KindId;

/// 3D position vector. `y` is up; `x` and `z` are the horizontal axes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    pub const FORWARD: Self = Self { x: 0.0, y: 0.0, z: 1.0 };
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// World transform of a spawned entity.
///
/// Rotation is stored as Euler angles in degrees. Only yaw (`rotation.y`,
/// clockwise seen from above, 0 = facing +z) affects the local frame used
/// for offsets; pitch and roll are carried through for the host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Transform at `position` turned to face `target` around the up axis.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let dx = target.x - position.x;
        let dz = target.z - position.z;
        let yaw = if dx == 0.0 && dz == 0.0 {
            0.0
        } else {
            normalize_degrees(dx.atan2(dz).to_degrees())
        };
        Self {
            position,
            rotation: Vec3::new(0.0, yaw, 0.0),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.yaw().to_radians().sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw().to_radians().sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    /// Convert a point in this transform's local frame to world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.right() * local.x + Vec3::UP * local.y + self.forward() * local.z
    }

    /// Add Euler angles on top of the current rotation.
    pub fn rotated(mut self, euler_degrees: Vec3) -> Self {
        self.rotation = Vec3::new(
            normalize_degrees(self.rotation.x + euler_degrees.x),
            normalize_degrees(self.rotation.y + euler_degrees.y),
            normalize_degrees(self.rotation.z + euler_degrees.z),
        );
        self
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Catalog kind an entity was spawned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefab(pub KindId);

/// Non-owning link to the entity this one is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);
