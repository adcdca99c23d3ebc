//! Axis-aligned collision primitives
//!
//! Everything in this core collides as axis-aligned boxes, checked
//! brute-force pairwise; at tens of entities there is no need for a
//! broad phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{H, W};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The whole play area
    pub fn play_area() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(W, H))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Grow (or shrink, with a negative margin) by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_separation() {
        let a = Aabb::from_center_size(Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0));
        let b = Aabb::from_center_size(Vec2::new(12.0, 10.0), Vec2::new(4.0, 4.0));
        let c = Aabb::from_center_size(Vec2::new(20.0, 10.0), Vec2::new(4.0, 4.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_edges_count_as_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = Aabb::new(Vec2::new(2.0, 0.0), Vec2::new(4.0, 2.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_inflate_extends_reach() {
        let a = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = Aabb::from_center_size(Vec2::new(4.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(!a.intersects(&b));
        assert!(a.inflate(1.0).intersects(&b));
    }

    #[test]
    fn test_contains_point_boundary() {
        let area = Aabb::play_area();
        assert!(area.contains_point(Vec2::new(0.0, 0.0)));
        assert!(area.contains_point(Vec2::new(W, H)));
        assert!(!area.contains_point(Vec2::new(-1.0, 0.0)));
        assert!(!area.inflate(10.0).contains_point(Vec2::new(W + 11.0, 0.0)));
        assert!(area.inflate(10.0).contains_point(Vec2::new(W + 9.0, 0.0)));
    }
}
