//! Dense 2-D / 3-D spatial grid.
//!
//! Maps integer cell coordinates to a payload and converts between grid and
//! world space. `x` is the width axis, `y` the height axis and `z` the depth
//! axis; a flat grid is simply one with `height == 1`, so every world
//! position it produces has `y == origin.y`.
//!
//! All accessors are total: reads outside the grid return `T::default()`
//! and writes outside the grid are ignored.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::Vec3;
use crate::config::ConfigError;

/// Tolerance (in cells) applied before flooring in [`SpatialGrid::grid_coordinate`],
/// so float error in `coord * cell_size + origin` cannot drop a coordinate
/// into the previous cell.
const SNAP_EPSILON: f32 = 1e-4;

/// Integer cell coordinate. Signed so out-of-range requests are representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate on the ground layer of a grid.
    pub fn flat(x: i32, z: i32) -> Self {
        Self { x, y: 0, z }
    }
}

/// Payload stored per cell of a room grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCell {
    pub coord: GridCoord,
    /// Floor tile occupying the cell, once spawned.
    pub occupant: Option<Entity>,
    /// Reserved for occupancy rules; `true` for every created cell. The
    /// out-of-range sentinel (`GridCell::default()`) is unavailable.
    pub available: bool,
}

impl GridCell {
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            occupant: None,
            available: true,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// Fixed-size grid of `T` anchored at a world-space origin.
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    width: i32,
    height: i32,
    depth: i32,
    cell_size: f32,
    origin: Vec3,
    cells: Vec<T>,
}

impl<T: Clone + Default> SpatialGrid<T> {
    /// Build a grid filled with `T::default()`.
    pub fn new(
        width: u32,
        height: u32,
        depth: u32,
        cell_size: f32,
        origin: Vec3,
    ) -> Result<Self, ConfigError> {
        Self::from_fn(width, height, depth, cell_size, origin, |_| T::default())
    }

    /// Build a single-layer grid (`height == 1`).
    pub fn flat(width: u32, depth: u32, cell_size: f32, origin: Vec3) -> Result<Self, ConfigError> {
        Self::new(width, 1, depth, cell_size, origin)
    }

    /// Build a grid whose cells are produced by `init` for each coordinate.
    pub fn from_fn(
        width: u32,
        height: u32,
        depth: u32,
        cell_size: f32,
        origin: Vec3,
        mut init: impl FnMut(GridCoord) -> T,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(ConfigError::EmptyGrid {
                width,
                height,
                depth,
            });
        }
        let max = i32::MAX as u32;
        let cell_count = if width > max || height > max || depth > max {
            None
        } else {
            checked_cell_count::<T>(width, height, depth)
        };
        let Some(cell_count) = cell_count else {
            return Err(ConfigError::GridTooLarge {
                width,
                height,
                depth,
            });
        };
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        if !origin.is_finite() {
            return Err(ConfigError::NonFiniteOrigin);
        }

        let mut grid = Self {
            width: width as i32,
            height: height as i32,
            depth: depth as i32,
            cell_size,
            origin,
            cells: Vec::with_capacity(cell_count),
        };
        // Index layout matches `index()`: x fastest, then z, then y.
        for y in 0..grid.height {
            for z in 0..grid.depth {
                for x in 0..grid.width {
                    grid.cells.push(init(GridCoord::new(x, y, z)));
                }
            }
        }
        Ok(grid)
    }

    /// Bound-checked read; `T::default()` outside the grid.
    pub fn get(&self, coord: GridCoord) -> T {
        self.get_ref(coord).cloned().unwrap_or_default()
    }

    /// Bound-checked write; ignored outside the grid.
    pub fn set(&mut self, coord: GridCoord, value: T) {
        if let Some(cell) = self.get_mut(coord) {
            *cell = value;
        }
    }

    /// Read the cell containing a world position.
    pub fn get_at(&self, point: Vec3) -> T {
        self.get(self.grid_coordinate(point))
    }

    /// Write the cell containing a world position.
    pub fn set_at(&mut self, point: Vec3, value: T) {
        let coord = self.grid_coordinate(point);
        self.set(coord, value);
    }
}

impl<T> SpatialGrid<T> {
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn depth(&self) -> u32 {
        self.depth as u32
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        (0..self.width).contains(&coord.x)
            && (0..self.height).contains(&coord.y)
            && (0..self.depth).contains(&coord.z)
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let (w, d) = (self.width as usize, self.depth as usize);
        Some(coord.x as usize + w * (coord.z as usize + d * coord.y as usize))
    }

    pub fn get_ref(&self, coord: GridCoord) -> Option<&T> {
        self.index(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    /// Every in-range coordinate, x outermost then y then z.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> {
        let (w, h, d) = (self.width, self.height, self.depth);
        (0..w).flat_map(move |x| {
            (0..h).flat_map(move |y| (0..d).map(move |z| GridCoord::new(x, y, z)))
        })
    }

    /// `coord * cell_size + origin`, component-wise.
    pub fn world_position(&self, coord: GridCoord) -> Vec3 {
        Vec3::new(coord.x as f32, coord.y as f32, coord.z as f32) * self.cell_size + self.origin
    }

    /// Cell containing `point` (floor division). Not clamped to the grid.
    pub fn grid_coordinate(&self, point: Vec3) -> GridCoord {
        let local = point - self.origin;
        let axis = |v: f32| (v / self.cell_size + SNAP_EPSILON).floor() as i32;
        GridCoord::new(axis(local.x), axis(local.y), axis(local.z))
    }

    /// Extreme corner coordinates. Duplicates collapse on a flat grid, so
    /// this yields 4 distinct corners in 2-D and 8 in 3-D.
    pub fn corner_coords(&self) -> Vec<GridCoord> {
        let xs = [0, self.width - 1];
        let ys = [0, self.height - 1];
        let zs = [0, self.depth - 1];
        let mut corners = Vec::with_capacity(8);
        for &x in &xs {
            for &y in &ys {
                for &z in &zs {
                    let c = GridCoord::new(x, y, z);
                    if !corners.contains(&c) {
                        corners.push(c);
                    }
                }
            }
        }
        corners
    }

    /// True iff `point` is exactly the world position of a corner cell.
    pub fn is_corner_cell(&self, point: Vec3) -> bool {
        self.corner_coords()
            .into_iter()
            .any(|c| self.world_position(c) == point)
    }

    /// Horizontal adjacency as seen from `a`.
    ///
    /// The cells must differ by exactly one step along x or z (and not at all
    /// along the other horizontal axis), and `a` must have room for a
    /// neighbour on both sides of that axis. A reference cell on the boundary
    /// of the compared axis therefore never reports a neighbour along it, and
    /// the test is not symmetric. Callers rely on this tolerance.
    pub fn are_neighbors(&self, a: GridCoord, b: GridCoord) -> bool {
        let dx = (i64::from(a.x) - i64::from(b.x)).abs();
        let dz = (i64::from(a.z) - i64::from(b.z)).abs();
        let interior_x = a.x >= 1 && a.x < self.width - 1;
        let interior_z = a.z >= 1 && a.z < self.depth - 1;

        (dx == 1 && dz == 0 && interior_x) || (dz == 1 && dx == 0 && interior_z)
    }
}

/// Number of cells in a grid, `None` if it or its size in bytes overflows.
fn checked_cell_count<T>(width: u32, height: u32, depth: u32) -> Option<usize> {
    let cells = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(depth as usize)?;
    let bytes = cells.checked_mul(std::mem::size_of::<T>())?;
    (bytes <= isize::MAX as usize).then_some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat5() -> SpatialGrid<u32> {
        SpatialGrid::flat(5, 5, 1.0, Vec3::ZERO).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(matches!(
            SpatialGrid::<u32>::new(0, 1, 3, 1.0, Vec3::ZERO),
            Err(ConfigError::EmptyGrid { .. })
        ));
        assert!(matches!(
            SpatialGrid::<u32>::flat(3, 3, 0.0, Vec3::ZERO),
            Err(ConfigError::InvalidCellSize(_))
        ));
        assert!(matches!(
            SpatialGrid::<u32>::flat(3, 3, f32::NAN, Vec3::ZERO),
            Err(ConfigError::InvalidCellSize(_))
        ));
        assert!(matches!(
            SpatialGrid::<u32>::flat(3, 3, 1.0, Vec3::new(f32::INFINITY, 0.0, 0.0)),
            Err(ConfigError::NonFiniteOrigin)
        ));
    }

    #[test]
    fn test_rejects_grid_too_large_to_allocate() {
        let side = i32::MAX as u32;
        assert!(matches!(
            SpatialGrid::<u32>::new(side, side, 4, 1.0, Vec3::ZERO),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            SpatialGrid::<u32>::new(side, 1, side, 1.0, Vec3::ZERO),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert_eq!(checked_cell_count::<u32>(3, 2, 4), Some(24));
        assert_eq!(checked_cell_count::<u32>(side, side, side), None);
    }

    #[test]
    fn test_round_trip_all_coords() {
        let cases = [
            (1.0, Vec3::ZERO),
            (1.5, Vec3::new(0.5, 0.0, -2.25)),
            (0.1, Vec3::new(0.1, 0.3, 0.7)),
            (2.7, Vec3::new(-13.3, 4.1, 99.9)),
        ];
        for (cell_size, origin) in cases {
            let grid: SpatialGrid<u8> = SpatialGrid::new(7, 3, 9, cell_size, origin).unwrap();
            for c in grid.coords() {
                let p = grid.world_position(c);
                assert_eq!(grid.grid_coordinate(p), c, "cell {:?} size {}", c, cell_size);
            }
        }
    }

    #[test]
    fn test_grid_coordinate_floors() {
        let grid = flat5();
        assert_eq!(grid.grid_coordinate(Vec3::new(2.6, 0.0, 3.2)), GridCoord::flat(2, 3));
        assert_eq!(grid.grid_coordinate(Vec3::new(-0.5, 0.0, 0.0)), GridCoord::flat(-1, 0));
        // Just short of a boundary stays in the lower cell
        assert_eq!(grid.grid_coordinate(Vec3::new(0.9995, 0.0, 1.999)), GridCoord::flat(0, 1));
        let mut grid = grid;
        grid.set(GridCoord::flat(0, 0), 3);
        assert_eq!(grid.get_at(Vec3::new(0.9995, 0.0, 0.0)), 3);
    }

    #[test]
    fn test_out_of_range_get_returns_default() {
        let mut grid = flat5();
        grid.set(GridCoord::flat(1, 1), 7);
        assert_eq!(grid.get(GridCoord::flat(1, 1)), 7);
        assert_eq!(grid.get(GridCoord::flat(-1, 1)), 0);
        assert_eq!(grid.get(GridCoord::flat(5, 0)), 0);
        assert_eq!(grid.get(GridCoord::new(0, 1, 0)), 0);
        assert_eq!(grid.get(GridCoord::new(i32::MIN, i32::MAX, 0)), 0);
    }

    #[test]
    fn test_out_of_range_set_is_noop() {
        let mut grid = flat5();
        let before = grid.cells.clone();
        grid.set(GridCoord::flat(5, 5), 9);
        grid.set(GridCoord::flat(-1, 0), 9);
        grid.set(GridCoord::new(0, -1, 0), 9);
        grid.set_at(Vec3::new(100.0, 0.0, 0.0), 9);
        assert_eq!(grid.cells, before);
    }

    #[test]
    fn test_world_position_access() {
        let mut grid: SpatialGrid<u32> =
            SpatialGrid::flat(4, 4, 2.0, Vec3::new(10.0, 0.0, 10.0)).unwrap();
        grid.set_at(Vec3::new(13.0, 0.0, 15.9), 3);
        assert_eq!(grid.get(GridCoord::flat(1, 2)), 3);
        assert_eq!(grid.get_at(Vec3::new(12.0, 0.0, 14.0)), 3);
    }

    #[test]
    fn test_flat_world_positions_on_ground() {
        let grid = flat5();
        for c in grid.coords() {
            assert_eq!(grid.world_position(c).y, 0.0);
        }
        assert_eq!(grid.coords().count(), 25);
    }

    #[test]
    fn test_corner_exactness_flat() {
        let grid = flat5();
        let corners: Vec<_> = grid
            .coords()
            .filter(|&c| grid.is_corner_cell(grid.world_position(c)))
            .collect();
        assert_eq!(corners.len(), 4);
        for c in [
            GridCoord::flat(0, 0),
            GridCoord::flat(4, 0),
            GridCoord::flat(0, 4),
            GridCoord::flat(4, 4),
        ] {
            assert!(corners.contains(&c));
        }
        // Near misses are not corners
        assert!(!grid.is_corner_cell(Vec3::new(0.0001, 0.0, 0.0)));
    }

    #[test]
    fn test_corner_exactness_boxed() {
        let grid: SpatialGrid<u8> = SpatialGrid::new(3, 4, 5, 1.25, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let corners = grid
            .coords()
            .filter(|&c| grid.is_corner_cell(grid.world_position(c)))
            .count();
        assert_eq!(corners, 8);
    }

    #[test]
    fn test_neighbors_interior() {
        let grid = flat5();
        let a = GridCoord::flat(2, 2);
        assert!(grid.are_neighbors(a, GridCoord::flat(1, 2)));
        assert!(grid.are_neighbors(a, GridCoord::flat(3, 2)));
        assert!(grid.are_neighbors(a, GridCoord::flat(2, 1)));
        assert!(grid.are_neighbors(a, GridCoord::flat(2, 3)));
        assert!(!grid.are_neighbors(a, GridCoord::flat(3, 3)));
        assert!(!grid.are_neighbors(a, a));
        assert!(!grid.are_neighbors(a, GridCoord::flat(4, 2)));
    }

    #[test]
    fn test_neighbors_boundary_quirk() {
        let grid = flat5();
        // Reference on the x edge never sees an x neighbour...
        assert!(!grid.are_neighbors(GridCoord::flat(0, 2), GridCoord::flat(1, 2)));
        // ...while the reverse query succeeds.
        assert!(grid.are_neighbors(GridCoord::flat(1, 2), GridCoord::flat(0, 2)));
        // Along z the same cell is interior, so z neighbours still count.
        assert!(grid.are_neighbors(GridCoord::flat(0, 2), GridCoord::flat(0, 3)));
    }

    #[test]
    fn test_grid_cell_sentinel() {
        let grid: SpatialGrid<GridCell> =
            SpatialGrid::from_fn(2, 1, 2, 1.0, Vec3::ZERO, GridCell::new).unwrap();
        let inside = grid.get(GridCoord::flat(1, 1));
        assert!(inside.available);
        assert_eq!(inside.coord, GridCoord::flat(1, 1));
        assert!(!inside.is_occupied());

        let outside = grid.get(GridCoord::flat(2, 0));
        assert_eq!(outside, GridCell::default());
        assert!(!outside.available);
    }
}
