//! Equilateral triangle grid coordinates.
//!
//! Two integer axes at 60 degrees: `x` points right, `y` points 60 degrees
//! counter-clockwise from `x`. This is the axial layout of a hexagonal lattice,
//! so every grid point has the same six neighbor offsets and the implicit third
//! axis is `-x - y`.

use std::ops::{Add, Neg, Sub};

/// A point on the triangle grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    /// Position along the horizontal axis
    pub x: i64,
    /// Position along the 60-degree axis
    pub y: i64,
}

impl GridCoord {
    /// Origin of the grid.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new coordinate.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The six neighbor offsets.
    ///
    /// The first four match a square grid; the last two run along the `y = -x`
    /// diagonal, where the skewed `y` axis leaves room for an extra link.
    pub const DIRECTIONS: [Self; 6] = [
        Self { x: 1, y: 0 },
        Self { x: -1, y: 0 },
        Self { x: 0, y: 1 },
        Self { x: 0, y: -1 },
        Self { x: 1, y: -1 },
        Self { x: -1, y: 1 },
    ];

    /// All six neighboring grid points.
    pub fn neighbors(&self) -> [Self; 6] {
        Self::DIRECTIONS.map(|d| *self + d)
    }

    /// Check whether two grid points are one link apart.
    pub fn is_adjacent(&self, other: &Self) -> bool {
        let d = *other - *self;
        (d.x.abs() + d.y.abs() == 1) || (d.x * d.y == -1)
    }

    /// Number of grid links on the shortest lattice path between two points.
    pub fn grid_distance(&self, other: &Self) -> u64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.unsigned_abs()
            .max(dy.unsigned_abs())
            .max((dx + dy).unsigned_abs())
    }

    /// Cartesian position with unit link length, for drawing.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let x = self.x as f64;
        let y = self.y as f64;
        let (sin, cos) = std::f64::consts::FRAC_PI_6.sin_cos();
        (x + y * sin, y * cos)
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for GridCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_unique_neighbors_at_distance_one() {
        let neighbors = GridCoord::ORIGIN.neighbors();

        for n in neighbors {
            assert_eq!(n.grid_distance(&GridCoord::ORIGIN), 1);
            assert!(GridCoord::ORIGIN.is_adjacent(&n));
        }

        let mut sorted: Vec<_> = neighbors.iter().map(|c| (c.x, c.y)).collect();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 6);
    }

    #[test]
    fn directions_are_closed_under_negation() {
        for d in GridCoord::DIRECTIONS {
            assert!(GridCoord::DIRECTIONS.contains(&-d));
        }
    }

    #[test]
    fn main_diagonal_is_not_adjacent() {
        // (1, 1) is two links away on a triangle grid
        let a = GridCoord::ORIGIN;
        assert!(!a.is_adjacent(&GridCoord::new(1, 1)));
        assert_eq!(a.grid_distance(&GridCoord::new(1, 1)), 2);
        assert!(!a.is_adjacent(&a));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let a = GridCoord::new(3, -2);
        let b = GridCoord::new(2, -1);
        assert!(a.is_adjacent(&b));
        assert!(b.is_adjacent(&a));
    }

    #[test]
    fn cartesian_links_have_unit_length() {
        let origin = GridCoord::ORIGIN.to_cartesian();
        for n in GridCoord::ORIGIN.neighbors() {
            let (x, y) = n.to_cartesian();
            let len = ((x - origin.0).powi(2) + (y - origin.1).powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-9, "link to {} has length {}", n, len);
        }
    }

    #[test]
    fn addition_subtraction() {
        let a = GridCoord::new(1, 2);
        let b = GridCoord::new(4, -1);

        assert_eq!(a + b, GridCoord::new(5, 1));
        assert_eq!(a - b, GridCoord::new(-3, 3));
        assert_eq!(a + (-b), a - b);
    }
}
