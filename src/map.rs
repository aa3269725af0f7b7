//! Playfield extents used for boundary correction.

use bevy::prelude::*;

use crate::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

/// Map size in pixels. The playable area spans `[0, width] × [0, height]`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns `true` when `point` lies inside the map, edges included.
    ///
    /// # Examples
    /// ```
    /// use bevy::math::Vec2;
    /// use warband::map::MapBounds;
    /// let bounds = MapBounds::new(100.0, 50.0);
    /// assert!(bounds.contains(Vec2::new(100.0, 0.0)));
    /// assert!(!bounds.contains(Vec2::new(-1.0, 10.0)));
    /// ```
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Nearest in-bounds point to `point`.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(0.0, self.width.max(0.0)),
            point.y.clamp(0.0, self.height.max(0.0)),
        )
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT)
    }
}
