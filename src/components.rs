//! ECS component types shared between the behaviour systems.
//! Includes motion state, melee combat stats, and the transient markers
//! applied by external status effects.
use bevy::prelude::*;
use serde::Serialize;

/// Position, velocity intent and facing of an entity.
///
/// The velocity is an intent: an external integrator applies it to the
/// position. `scale.x` doubles as the facing sign (positive faces right).
/// Presence of `Motion` is what marks an entity as alive to the AI.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: Vec2,
}

impl Motion {
    /// Creates a stationary, right-facing motion record at `position`.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }

    /// Points the facing sign along the horizontal component of `heading`.
    ///
    /// A zero horizontal component leaves the facing untouched.
    pub fn face_towards(&mut self, heading: Vec2) {
        if heading.x > 0.0 {
            self.scale.x = self.scale.x.abs();
        } else if heading.x < 0.0 {
            self.scale.x = -self.scale.x.abs();
        }
    }

    /// Returns `true` when the entity is facing right.
    #[must_use]
    pub fn faces_right(&self) -> bool {
        self.scale.x >= 0.0
    }

    /// Zeroes the velocity intent.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Marker for the single player-controlled entity.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Player;

/// Marker for defensive structures archers prefer to shoot at.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tower;

/// Melee chaser stats.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Enemy {
    pub health: f32,
    pub speed: f32,
}

/// Speed multiplier applied to a melee chaser until `remaining_ms` runs out.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Slow {
    pub multiplier: f32,
    pub remaining_ms: f32,
}

/// Reach and damage of an attacker.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attack {
    pub range: f32,
    pub damage: f32,
}

/// Re-attack gate; removed once `remaining_ms` elapses.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    pub remaining_ms: f32,
}

/// Present while the entity is in hit-stun; freezes its facing.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HitReaction;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vec2::new(1.0, 0.0), true)]
    #[case(Vec2::new(-0.5, 3.0), false)]
    fn face_towards_follows_horizontal_sign(#[case] heading: Vec2, #[case] right: bool) {
        let mut motion = Motion::default();
        motion.scale.x = if right { -2.0 } else { 2.0 };
        motion.face_towards(heading);
        assert_eq!(motion.faces_right(), right);
        assert!((motion.scale.x.abs() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn vertical_heading_keeps_facing() {
        let mut motion = Motion::default();
        motion.scale.x = -1.0;
        motion.face_towards(Vec2::new(0.0, 10.0));
        assert!(!motion.faces_right());
    }
}
