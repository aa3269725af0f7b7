//! Archer ring around the squad target.
//!
//! Slots are spread evenly on a circle of [`SQUAD_OPTIMAL_RADIUS`] and are
//! recomputed from the current roster every tick, so the ring closes up as
//! archers fall. Squad archers swing exactly like lone skeletons but never
//! idle: between swings they stand in the walk pose.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::{SquadMembers, SquadTick};
use crate::animation::{AnimationClip, AnimationPlayer, AnimationRequest};
use crate::audio::{AudioChannel, AudioQueue, Sound};
use crate::behaviour::{ArcherState, Swing};
use crate::components::{Attack, Motion};
use crate::projectile::spawn_arrow;
use crate::spatial::{direction, distance, point_on_circle};
use crate::{SQUAD_ARCHER_SPEED, SQUAD_MIN_RADIUS_RATIO, SQUAD_OPTIMAL_RADIUS, SQUAD_SLOT_TOLERANCE};

/// Archer bound to a squad ring.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SquadArcher {
    pub swing: Swing,
    pub state: ArcherState,
}

impl SquadArcher {
    #[must_use]
    pub const fn new(attack_cooldown_ms: f32) -> Self {
        Self {
            swing: Swing::new(attack_cooldown_ms),
            state: ArcherState::Walk,
        }
    }
}

/// Ring slot for archer `index` of `count` around `target`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use warband::squad::formation_slot;
/// let slot = formation_slot(Vec2::ZERO, 0, 4);
/// assert!((slot - Vec2::new(250.0, 0.0)).length() < 1e-3);
/// ```
#[must_use]
pub fn formation_slot(target: Vec2, index: usize, count: usize) -> Vec2 {
    if count == 0 {
        return target;
    }
    let angle = TAU * index as f32 / count as f32;
    point_on_circle(target, SQUAD_OPTIMAL_RADIUS, angle)
}

/// Moves or shoots one ring archer, returning the direction of an arrow to
/// loose this tick.
pub(crate) fn station_archer(
    motion: &mut Motion,
    archer: &mut SquadArcher,
    attack: Attack,
    animation: &mut AnimationPlayer,
    slot: Vec2,
    tick: &SquadTick,
) -> Option<Vec2> {
    let previous = archer.state;
    let position = motion.position;
    let target = tick.target.position;

    let loose = archer
        .swing
        .advance(tick.elapsed_ms)
        .loose
        .then(|| direction(position, target))
        .filter(|heading| *heading != Vec2::ZERO);

    let to_target = distance(position, target);
    let out_of_range = to_target > attack.range;
    let off_station = distance(position, slot) > SQUAD_SLOT_TOLERANCE;
    let badly_spaced =
        to_target < SQUAD_OPTIMAL_RADIUS * SQUAD_MIN_RADIUS_RATIO || out_of_range;
    let moving = !archer.swing.is_attacking
        && (off_station || (tick.reposition && badly_spaced) || out_of_range);

    if moving {
        let heading = direction(position, slot);
        motion.velocity = heading * SQUAD_ARCHER_SPEED;
        motion.face_towards(heading);
        archer.state = ArcherState::Walk;
    } else {
        motion.halt();
        motion.face_towards(target - position);
        if !out_of_range && archer.swing.ready() {
            archer.swing.begin();
            archer.state = ArcherState::Attack;
            animation.request(archer.swing.animation(AnimationClip::SkeletonAttack));
        } else if !archer.swing.is_attacking {
            archer.state = ArcherState::Walk;
        }
    }

    let walking = archer.state == ArcherState::Walk;
    if walking && (previous != ArcherState::Walk || animation.is_empty()) {
        animation.request(AnimationRequest::looping(AnimationClip::SkeletonWalk));
    }
    loose
}

pub(super) fn drive_archers(
    squad: &super::Squad,
    tick: &SquadTick,
    members: &mut SquadMembers,
    commands: &mut Commands,
    audio: &mut AudioQueue,
) {
    let count = squad.archers.len();
    for (index, &entity) in squad.archers.iter().enumerate() {
        let Ok(mut motion) = members.motions.get_mut(entity) else {
            continue;
        };
        let Ok((mut archer, attack, mut animation)) = members.archers.get_mut(entity) else {
            continue;
        };
        let slot = formation_slot(tick.target.position, index, count);
        let shot = station_archer(&mut motion, &mut archer, *attack, &mut animation, slot, tick);
        if let Some(heading) = shot {
            spawn_arrow(commands, motion.position, heading, entity, attack.damage);
            audio.play(AudioChannel::Projectile, Sound::ArrowLoose);
        }
    }
}
