//! Arrow projectiles loosed by archers.
//!
//! Archers only spawn arrows; hit detection belongs to the physics layer.
//! Arrows that never hit anything are culled by [`arrow_flight_system`]
//! once their lifetime runs out.

use bevy::prelude::*;
use log::trace;

use crate::components::Motion;
use crate::{ARROW_LIFETIME_MS, ARROW_SPEED};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub source: Entity,
    pub damage: f32,
    pub remaining_ms: f32,
    pub speed: f32,
    pub direction: Vec2,
}

/// Spawns an arrow at `position` flying along `direction`.
///
/// `direction` is expected to be a unit vector; the arrow's velocity intent
/// is `direction * ARROW_SPEED`.
pub fn spawn_arrow(
    commands: &mut Commands,
    position: Vec2,
    direction: Vec2,
    source: Entity,
    damage: f32,
) -> Entity {
    let mut motion = Motion::at(position);
    motion.velocity = direction * ARROW_SPEED;
    motion.face_towards(direction);
    let arrow = commands
        .spawn((
            Arrow {
                source,
                damage,
                remaining_ms: ARROW_LIFETIME_MS,
                speed: ARROW_SPEED,
                direction,
            },
            motion,
        ))
        .id();
    trace!("{source:?} loosed {arrow:?} along {direction:?}");
    arrow
}

/// Counts arrow lifetimes down and despawns expired arrows.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn arrow_flight_system(
    mut commands: Commands,
    time: Res<Time>,
    mut arrows: Query<(Entity, &mut Arrow)>,
) {
    let elapsed_ms = time.delta_secs() * 1000.0;
    for (entity, mut arrow) in &mut arrows {
        arrow.remaining_ms -= elapsed_ms;
        if arrow.remaining_ms <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn world_with_time() -> World {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world
    }

    fn run_tick(world: &mut World, elapsed_ms: u64) {
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(elapsed_ms));
        let mut schedule = Schedule::default();
        schedule.add_systems(arrow_flight_system);
        schedule.run(world);
    }

    #[test]
    fn spawned_arrow_flies_along_direction() {
        let mut world = world_with_time();
        let source = world.spawn_empty().id();
        let arrow = {
            let mut commands = world.commands();
            spawn_arrow(&mut commands, Vec2::new(5.0, 5.0), Vec2::NEG_X, source, 4.0)
        };
        world.flush();

        let motion = world.get::<Motion>(arrow).copied().unwrap_or_default();
        assert_eq!(motion.position, Vec2::new(5.0, 5.0));
        assert_eq!(motion.velocity, Vec2::NEG_X * ARROW_SPEED);
        assert!(!motion.faces_right());
        assert_eq!(world.get::<Arrow>(arrow).map(|a| a.source), Some(source));
    }

    #[test]
    fn arrows_expire_after_lifetime() {
        let mut world = world_with_time();
        let source = world.spawn_empty().id();
        let arrow = {
            let mut commands = world.commands();
            spawn_arrow(&mut commands, Vec2::ZERO, Vec2::X, source, 1.0)
        };
        world.flush();

        run_tick(&mut world, 1500);
        assert!(world.get_entity(arrow).is_ok());
        run_tick(&mut world, 600);
        assert!(world.get_entity(arrow).is_err());
    }
}
