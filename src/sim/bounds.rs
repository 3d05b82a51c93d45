//! Axis-aligned bounding boxes for entity collision
//!
//! Every entity is a rectangle centred on its position. Overlap is strict:
//! boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// True once the box lies entirely outside `[0, arena.x] x [0, arena.y]`
    pub fn is_outside(&self, arena: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        max.x < 0.0 || min.x > arena.x || max.y < 0.0 || min.y > arena.y
    }

    /// Clamp a center so the whole box stays inside the arena
    pub fn clamp_center(center: Vec2, size: Vec2, arena: Vec2) -> Vec2 {
        let half = size / 2.0;
        let upper = (arena - half).max(half);
        center.clamp(half, upper)
    }
}
