//! Protector orcs.
//!
//! Each protector shadows the archer at the same roster index, standing on
//! the line from that archer to the threat. Once in position it holds, and
//! only charges when the threat comes close to the protector itself.

use bevy::prelude::*;

use super::{Squad, SquadMembers, SquadTick};
use crate::animation::{AnimationClip, AnimationPlayer, AnimationRequest};
use crate::components::Motion;
use crate::spatial::{direction, distance};
use crate::{
    PROTECTOR_ENGAGE_RADIUS, PROTECTOR_MAX_OFFSET, PROTECTOR_OFFSET_RATIO,
    PROTECTOR_SLOT_TOLERANCE,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Guard,
    Move,
    Engage,
}

impl GuardState {
    const fn clip(self) -> AnimationClip {
        match self {
            Self::Guard => AnimationClip::OrcIdle,
            Self::Move | Self::Engage => AnimationClip::OrcWalk,
        }
    }
}

/// Bodyguard paired with one squad archer.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Protector {
    pub speed: f32,
    pub charge_speed: f32,
    pub state: GuardState,
}

impl Protector {
    #[must_use]
    pub const fn new(speed: f32, charge_speed: f32) -> Self {
        Self {
            speed,
            charge_speed,
            state: GuardState::Guard,
        }
    }
}

/// Where a protector stands to cover the archer at `archer` from `threat`.
///
/// The offset towards the threat is `0.7` of the gap, capped at
/// [`PROTECTOR_MAX_OFFSET`].
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use warband::squad::protector_slot;
/// let near = protector_slot(Vec2::ZERO, Vec2::new(100.0, 0.0));
/// assert!((near.x - 70.0).abs() < 1e-3);
/// let far = protector_slot(Vec2::ZERO, Vec2::new(1000.0, 0.0));
/// assert!((far.x - 80.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn protector_slot(archer: Vec2, threat: Vec2) -> Vec2 {
    let offset = (PROTECTOR_OFFSET_RATIO * distance(archer, threat)).min(PROTECTOR_MAX_OFFSET);
    archer + direction(archer, threat) * offset
}

/// Moves one protector for the tick. `slot` is `None` for a protector
/// without a living archer to pair with; it holds where it stands.
///
/// A protector only engages from its slot, but once engaged it keeps
/// charging until the threat leaves [`PROTECTOR_ENGAGE_RADIUS`].
pub(crate) fn guard(
    motion: &mut Motion,
    protector: &mut Protector,
    animation: &mut AnimationPlayer,
    slot: Option<Vec2>,
    threat: Vec2,
) {
    let previous = protector.state.clip();
    let position = motion.position;

    let destination = slot.filter(|spot| distance(position, *spot) > PROTECTOR_SLOT_TOLERANCE);
    let threat_close = distance(position, threat) < PROTECTOR_ENGAGE_RADIUS;
    let engaged = protector.state == GuardState::Engage || destination.is_none();
    if threat_close && engaged {
        motion.velocity = direction(position, threat) * protector.charge_speed;
        protector.state = GuardState::Engage;
    } else if let Some(spot) = destination {
        motion.velocity = direction(position, spot) * protector.speed;
        protector.state = GuardState::Move;
    } else {
        motion.halt();
        protector.state = GuardState::Guard;
    }
    motion.face_towards(threat - position);

    if protector.state.clip() != previous || animation.is_empty() {
        animation.request(AnimationRequest::looping(protector.state.clip()));
    }
}

pub(super) fn drive_protectors(squad: &Squad, tick: &SquadTick, members: &mut SquadMembers) {
    let threat = tick.target.position;
    for (index, &entity) in squad.protectors.iter().enumerate() {
        let slot = squad
            .archers
            .get(index)
            .and_then(|archer| members.motions.get(*archer).ok())
            .map(|archer| protector_slot(archer.position, threat));

        let Ok(mut motion) = members.motions.get_mut(entity) else {
            continue;
        };
        let Ok((mut protector, mut animation)) = members.protectors.get_mut(entity) else {
            continue;
        };
        guard(&mut motion, &mut protector, &mut animation, slot, threat);
    }
}
