//! Squad knight.
//!
//! The knight patrols a circle around the squad's centre of mass and charges
//! the target as soon as it comes near any ally. Its hunt and charge phases
//! are the ones every [`OrcRider`] uses.

use std::f32::consts::TAU;

use bevy::prelude::*;
use log::debug;

use super::{Squad, SquadMembers, SquadTick};
use crate::animation::AnimationPlayer;
use crate::audio::AudioQueue;
use crate::behaviour::charger::land_charge;
use crate::behaviour::{OrcRider, RiderPhase, RiderState};
use crate::components::Motion;
use crate::spatial::{direction, distance, point_on_circle};
use crate::status::StatusInbox;
use crate::{
    KNIGHT_MIN_SEPARATION, KNIGHT_PATROL_PERIOD_SECS, KNIGHT_PATROL_RADIUS, KNIGHT_THREAT_RADIUS,
};

/// Marks an [`OrcRider`] as a squad knight and carries its patrol clock.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Knight {
    /// Angle around the patrol circle, in radians within `[0, 2π)`.
    pub patrol_phase: f32,
}

impl Knight {
    /// Moves the patrol angle on by `elapsed_ms`.
    pub fn advance_patrol(&mut self, elapsed_ms: f32) -> f32 {
        let step = TAU * elapsed_ms / (KNIGHT_PATROL_PERIOD_SECS * 1000.0);
        self.patrol_phase = (self.patrol_phase + step).rem_euclid(TAU);
        self.patrol_phase
    }
}

/// Positions of the living allies the knight watches over.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Allies {
    pub(crate) archers: Vec<Vec2>,
    pub(crate) orcs: Vec<Vec2>,
}

impl Allies {
    fn all(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.archers.iter().chain(self.orcs.iter()).copied()
    }

    /// Returns `true` when `target` is close to any ally, archers first.
    pub(crate) fn threatened_by(&self, target: Vec2) -> bool {
        self.all().any(|ally| distance(ally, target) < KNIGHT_THREAT_RADIUS)
    }

    fn centroid(&self) -> Option<Vec2> {
        let count = self.archers.len() + self.orcs.len();
        (count > 0).then(|| self.all().sum::<Vec2>() / count as f32)
    }

    /// Push away from every ally closer than [`KNIGHT_MIN_SEPARATION`],
    /// stronger the closer it is.
    fn repulsion(&self, from: Vec2) -> Vec2 {
        self.all()
            .filter_map(|ally| {
                let gap = distance(ally, from);
                let strength = (KNIGHT_MIN_SEPARATION - gap) / KNIGHT_MIN_SEPARATION;
                (gap < KNIGHT_MIN_SEPARATION).then(|| direction(ally, from) * strength)
            })
            .sum()
    }
}

/// Unit heading for a patrolling knight at `position`, or zero when there
/// is nothing to patrol around.
pub(crate) fn patrol_heading(position: Vec2, allies: &Allies, phase: f32) -> Vec2 {
    let Some(centre) = allies.centroid() else {
        return Vec2::ZERO;
    };
    let waypoint = point_on_circle(centre, KNIGHT_PATROL_RADIUS, phase);
    (direction(position, waypoint) + allies.repulsion(position)).normalize_or_zero()
}

/// Runs one knight tick, returning `true` when its charge struck the target.
pub(crate) fn command_knight(
    motion: &mut Motion,
    rider: &mut OrcRider,
    knight: &mut Knight,
    animation: &mut AnimationPlayer,
    allies: &Allies,
    tick: &SquadTick,
) -> bool {
    let target = tick.target.position;
    rider.target = Some(tick.target.entity);

    match rider.phase {
        RiderPhase::Charging => {
            return rider.tick_charge(motion, Some(target), tick.elapsed_ms, animation);
        }
        RiderPhase::Hunting => rider.tick_hunt(motion, Some(target), tick.elapsed_ms, animation),
        RiderPhase::Regular => {
            if rider.tick_cooldown(motion, tick.elapsed_ms) {
                return false;
            }
            if allies.threatened_by(target) {
                debug!("knight sees the target among its allies");
                rider.begin_hunt(motion, animation);
            } else {
                patrol(motion, rider, knight, animation, allies, tick.elapsed_ms);
            }
        }
    }
    if !rider.is_charging() {
        motion.face_towards(target - motion.position);
    }
    false
}

fn patrol(
    motion: &mut Motion,
    rider: &mut OrcRider,
    knight: &mut Knight,
    animation: &mut AnimationPlayer,
    allies: &Allies,
    elapsed_ms: f32,
) {
    let previous = rider.state;
    let phase = knight.advance_patrol(elapsed_ms);
    let heading = patrol_heading(motion.position, allies, phase);
    if heading == Vec2::ZERO {
        motion.halt();
        rider.state = RiderState::Idle;
    } else {
        motion.velocity = heading * rider.walk_speed;
        rider.state = RiderState::Walk;
    }
    if rider.state != previous {
        rider.show(animation, rider.state);
    }
}

pub(super) fn drive_knight(
    squad: &Squad,
    tick: &SquadTick,
    members: &mut SquadMembers,
    inbox: &mut StatusInbox,
    audio: &mut AudioQueue,
) {
    let Some(entity) = squad.knight else {
        return;
    };
    let locate = |roster: &[Entity]| -> Vec<Vec2> {
        roster
            .iter()
            .filter(|member| **member != entity)
            .filter_map(|member| members.motions.get(*member).ok())
            .map(|motion| motion.position)
            .collect()
    };
    let allies = Allies {
        archers: locate(&squad.archers),
        orcs: locate(&squad.protectors),
    };

    let Ok(mut motion) = members.motions.get_mut(entity) else {
        return;
    };
    let Ok((mut rider, mut knight, mut animation)) = members.knights.get_mut(entity) else {
        return;
    };
    if command_knight(&mut motion, &mut rider, &mut knight, &mut animation, &allies, tick) {
        land_charge(&rider, tick.target.entity, inbox, audio);
    }
}
