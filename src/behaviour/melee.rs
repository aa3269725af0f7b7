//! Melee chaser behaviour.
//!
//! Chasers steer by accumulating velocity towards the player and damping it
//! every tick, which gives them momentum instead of instant turns. A
//! separate system bites the player when in reach and off cooldown.

use bevy::prelude::*;
use log::debug;

use super::{elapsed_ms, sole_player};
use crate::audio::{AudioChannel, AudioQueue, Sound};
use crate::components::{Attack, Cooldown, Enemy, HitReaction, Motion, Player, Slow};
use crate::spatial::{direction, distance};
use crate::status::{StatusEffect, StatusInbox};
use crate::{MELEE_ATTACK_COOLDOWN_MS, MELEE_ATTACK_RANGE, MELEE_DAMPING};

type ChaserRow<'w> = (
    Entity,
    &'w mut Motion,
    &'w Enemy,
    Option<&'w mut Slow>,
    Has<HitReaction>,
);

type BiterRow<'w> = (
    Entity,
    &'w Motion,
    &'w mut Attack,
    Option<&'w mut Cooldown>,
);

/// Applies one tick of pursuit to a chaser's motion.
///
/// The heading is added to the velocity at `speed`, then the whole velocity
/// is damped. Facing follows the resulting horizontal velocity unless the
/// chaser is in hit-stun.
pub fn chase_step(motion: &mut Motion, heading: Vec2, speed: f32, stunned: bool) {
    motion.velocity += heading * speed;
    motion.velocity *= MELEE_DAMPING;
    if !stunned {
        let velocity = motion.velocity;
        motion.face_towards(velocity);
    }
}

/// Counts a slow effect down, returning the multiplier to apply this tick.
///
/// An effect that runs out no longer applies and is removed.
fn slow_multiplier(
    effect: Option<Mut<'_, Slow>>,
    entity: Entity,
    elapsed_ms: f32,
    commands: &mut Commands,
) -> f32 {
    let Some(mut slow) = effect else {
        return 1.0;
    };
    slow.remaining_ms -= elapsed_ms;
    if slow.remaining_ms <= 0.0 {
        commands.entity(entity).remove::<Slow>();
        1.0
    } else {
        slow.multiplier
    }
}

/// Steers every melee chaser towards the player.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn melee_chase_system(
    mut commands: Commands,
    time: Res<Time>,
    players: Query<(Entity, &Motion), With<Player>>,
    mut chasers: Query<ChaserRow<'_>, Without<Player>>,
) {
    let Some(player) = sole_player(players.single(), &mut commands) else {
        return;
    };
    let elapsed = elapsed_ms(&time);

    for (entity, mut motion, enemy, slow, stunned) in &mut chasers {
        let heading = direction(motion.position, player.position);
        let speed = enemy.speed * slow_multiplier(slow, entity, elapsed, &mut commands);
        chase_step(&mut motion, heading, speed, stunned);
    }
}

/// Bites the player when a chaser is within reach and off cooldown.
///
/// Reach is reset to [`MELEE_ATTACK_RANGE`] on every evaluation, so any
/// per-entity range is ignored.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn melee_attack_system(
    mut commands: Commands,
    time: Res<Time>,
    players: Query<(Entity, &Motion), With<Player>>,
    mut biters: Query<BiterRow<'_>, (With<Enemy>, Without<Player>)>,
    mut inbox: ResMut<StatusInbox>,
    mut audio: ResMut<AudioQueue>,
) {
    let Some(player) = sole_player(players.single(), &mut commands) else {
        return;
    };
    let elapsed = elapsed_ms(&time);

    for (entity, motion, mut attack, cooldown) in &mut biters {
        let cooling = cooldown.is_some_and(|mut timer| {
            timer.remaining_ms -= elapsed;
            let spent = timer.remaining_ms <= 0.0;
            if spent {
                commands.entity(entity).remove::<Cooldown>();
            }
            !spent
        });

        attack.range = MELEE_ATTACK_RANGE;
        if cooling || distance(motion.position, player.position) > attack.range {
            continue;
        }

        inbox.enqueue(player.entity, StatusEffect::attack(attack.damage));
        audio.play(AudioChannel::Enemy, Sound::ZombieBite);
        commands.entity(entity).insert(Cooldown {
            remaining_ms: MELEE_ATTACK_COOLDOWN_MS,
        });
        debug!("{entity:?} bit {:?} for {}", player.entity, attack.damage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn chase_step_accumulates_then_damps() {
        let mut motion = Motion::at(Vec2::new(100.0, 0.0));
        motion.scale.x = -1.0;
        chase_step(&mut motion, Vec2::X, 50.0, false);
        assert_relative_eq!(motion.velocity.x, 45.0);
        assert!(motion.faces_right());

        chase_step(&mut motion, Vec2::X, 50.0, false);
        assert_relative_eq!(motion.velocity.x, (45.0 + 50.0) * 0.9);
    }

    #[rstest]
    fn hit_stun_freezes_facing() {
        let mut motion = Motion::at(Vec2::ZERO);
        motion.scale.x = -1.0;
        chase_step(&mut motion, Vec2::X, 50.0, true);
        assert!(motion.velocity.x > 0.0);
        assert!(!motion.faces_right());
    }

    #[rstest]
    fn zero_heading_only_damps() {
        let mut motion = Motion::at(Vec2::ZERO);
        motion.velocity = Vec2::new(0.0, 10.0);
        chase_step(&mut motion, Vec2::ZERO, 50.0, false);
        assert_relative_eq!(motion.velocity.y, 9.0);
        assert!(motion.faces_right());
    }
}
