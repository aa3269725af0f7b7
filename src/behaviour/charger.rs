//! Mounted charger behaviour.
//!
//! A rider walks towards the player once it is within `detection_range`.
//! Inside `hunt_range` it stops for a wind-up (the hunt), then charges in a
//! straight line fixed at the moment the wind-up ends. The charge lasts as
//! long as it takes to cover `charge_distance` and can hit its target at
//! most once. A short cooldown follows every charge.
//!
//! Priority each tick is charging, then hunting, then the regular
//! cooldown/idle/walk/hunt-range check. The knight in a squad reuses the
//! charging and hunting phases with its own trigger.

use bevy::prelude::*;
use log::debug;

use super::{elapsed_ms, sole_player, Target};
use crate::animation::{AnimationClip, AnimationPlayer, AnimationRequest};
use crate::audio::{AudioChannel, AudioQueue, Sound};
use crate::components::{Motion, Player};
use crate::config::RiderConfig;
use crate::spatial::{direction, distance};
use crate::squad::Knight;
use crate::status::{StatusEffect, StatusInbox};
use crate::{CHARGE_CONTACT_RADIUS, HUNT_WINDUP_MS, POST_CHARGE_COOLDOWN_MS};

/// Visible state of a rider. Charging reuses `Walk`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RiderState {
    #[default]
    Idle,
    Walk,
    Hunt,
}

/// Which sprite set and sound a rider uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RiderKind {
    #[default]
    Orc,
    Knight,
}

impl RiderKind {
    /// Clip shown while in `state`.
    #[must_use]
    pub const fn clip(self, state: RiderState) -> AnimationClip {
        match (self, state) {
            (Self::Orc, RiderState::Idle) => AnimationClip::OrcIdle,
            (Self::Orc, RiderState::Walk) => AnimationClip::OrcWalk,
            (Self::Orc, RiderState::Hunt) => AnimationClip::OrcHunt,
            (Self::Knight, RiderState::Idle) => AnimationClip::KnightIdle,
            (Self::Knight, RiderState::Walk) => AnimationClip::KnightWalk,
            (Self::Knight, RiderState::Hunt) => AnimationClip::KnightHunt,
        }
    }

    /// Cue played when a charge connects.
    #[must_use]
    pub const fn impact_sound(self) -> Sound {
        match self {
            Self::Orc => Sound::OrcCharge,
            Self::Knight => Sound::KnightCharge,
        }
    }
}

/// Attack phase layered over [`RiderState`].
///
/// Hunting and charging are exclusive by construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RiderPhase {
    #[default]
    Regular,
    Hunting,
    Charging,
}

/// Charger brain shared by orc riders and squad knights.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrcRider {
    pub kind: RiderKind,
    pub state: RiderState,
    pub phase: RiderPhase,
    pub target: Option<Entity>,
    pub detection_range: f32,
    pub hunt_range: f32,
    pub walk_speed: f32,
    pub charge_speed: f32,
    pub charge_distance: f32,
    pub damage: f32,
    /// Wind-up countdown while hunting, post-charge cooldown otherwise.
    pub hunt_timer_ms: f32,
    pub charge_timer_ms: f32,
    pub charge_direction: Vec2,
    pub has_hit_player: bool,
}

impl OrcRider {
    #[must_use]
    pub fn new(kind: RiderKind, config: &RiderConfig) -> Self {
        Self {
            kind,
            state: RiderState::Idle,
            phase: RiderPhase::Regular,
            target: None,
            detection_range: config.detection_range,
            hunt_range: config.hunt_range,
            walk_speed: config.walk_speed,
            charge_speed: config.charge_speed,
            charge_distance: config.charge_distance,
            damage: config.damage,
            hunt_timer_ms: 0.0,
            charge_timer_ms: 0.0,
            charge_direction: Vec2::ZERO,
            has_hit_player: false,
        }
    }

    #[must_use]
    pub fn is_hunting(&self) -> bool {
        self.phase == RiderPhase::Hunting
    }

    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.phase == RiderPhase::Charging
    }

    /// Time needed to cover `charge_distance` at `charge_speed`.
    #[must_use]
    pub fn charge_duration_ms(&self) -> f32 {
        if self.charge_speed > 0.0 {
            self.charge_distance / self.charge_speed * 1000.0
        } else {
            0.0
        }
    }

    /// Requests the clip for `state`. The hunt clip spans the whole wind-up.
    pub(crate) fn show(&self, animation: &mut AnimationPlayer, state: RiderState) {
        let clip = self.kind.clip(state);
        let request = if state == RiderState::Hunt {
            AnimationRequest::once(clip).spanning(HUNT_WINDUP_MS)
        } else {
            AnimationRequest::looping(clip)
        };
        animation.request(request);
    }

    /// Stops and starts the wind-up before a charge.
    pub fn begin_hunt(&mut self, motion: &mut Motion, animation: &mut AnimationPlayer) {
        motion.halt();
        self.phase = RiderPhase::Hunting;
        self.hunt_timer_ms = HUNT_WINDUP_MS;
        self.state = RiderState::Hunt;
        self.show(animation, RiderState::Hunt);
        debug!("{:?} rider starts hunting", self.kind);
    }

    /// Holds still through the wind-up, then launches the charge along the
    /// line to `target` as it stands right now.
    pub fn tick_hunt(
        &mut self,
        motion: &mut Motion,
        target: Option<Vec2>,
        elapsed_ms: f32,
        animation: &mut AnimationPlayer,
    ) {
        motion.halt();
        self.hunt_timer_ms -= elapsed_ms;
        if self.hunt_timer_ms > 0.0 {
            return;
        }

        self.phase = RiderPhase::Charging;
        self.hunt_timer_ms = 0.0;
        self.charge_timer_ms = 0.0;
        self.has_hit_player = false;
        self.charge_direction = target.map_or(Vec2::ZERO, |aim| direction(motion.position, aim));
        self.state = RiderState::Walk;
        motion.face_towards(self.charge_direction);
        self.show(animation, RiderState::Walk);
        debug!(
            "{:?} rider charges along {:?}",
            self.kind, self.charge_direction
        );
    }

    /// Advances a charge, returning `true` on the tick the target is struck.
    pub fn tick_charge(
        &mut self,
        motion: &mut Motion,
        target: Option<Vec2>,
        elapsed_ms: f32,
        animation: &mut AnimationPlayer,
    ) -> bool {
        self.charge_timer_ms += elapsed_ms;
        motion.velocity = self.charge_direction * self.charge_speed;

        let struck = !self.has_hit_player
            && target.is_some_and(|aim| distance(motion.position, aim) < CHARGE_CONTACT_RADIUS);
        if struck {
            self.has_hit_player = true;
        }

        if self.charge_timer_ms >= self.charge_duration_ms() {
            motion.halt();
            self.phase = RiderPhase::Regular;
            self.has_hit_player = false;
            self.hunt_timer_ms = POST_CHARGE_COOLDOWN_MS;
            self.state = RiderState::Idle;
            self.show(animation, RiderState::Idle);
            debug!("{:?} rider ends charge", self.kind);
        }
        struck
    }

    /// Counts the post-charge cooldown down, holding still while it runs.
    ///
    /// Returns `true` when the cooldown claimed this tick.
    pub fn tick_cooldown(&mut self, motion: &mut Motion, elapsed_ms: f32) -> bool {
        if self.hunt_timer_ms <= 0.0 {
            return false;
        }
        self.hunt_timer_ms -= elapsed_ms;
        motion.halt();
        true
    }

    /// Regular branch: hunt when close, walk when detected, idle otherwise.
    fn pursue(
        &mut self,
        motion: &mut Motion,
        target: Option<Vec2>,
        elapsed_ms: f32,
        animation: &mut AnimationPlayer,
    ) {
        if self.tick_cooldown(motion, elapsed_ms) {
            return;
        }
        let previous = self.state;
        let range = target.map(|aim| (aim, distance(motion.position, aim)));
        match range {
            Some((_, d)) if d <= self.hunt_range => {
                self.begin_hunt(motion, animation);
                return;
            }
            Some((aim, d)) if d <= self.detection_range => {
                let heading = direction(motion.position, aim);
                motion.velocity = heading * self.walk_speed;
                motion.face_towards(heading);
                self.state = RiderState::Walk;
            }
            _ => {
                motion.halt();
                self.state = RiderState::Idle;
            }
        }
        if self.state != previous {
            self.show(animation, self.state);
        }
    }

    /// Runs one tick of the full charger state machine against `target`.
    ///
    /// Returns `true` when a charge struck the target this tick.
    pub fn step(
        &mut self,
        motion: &mut Motion,
        target: Option<Vec2>,
        elapsed_ms: f32,
        animation: &mut AnimationPlayer,
    ) -> bool {
        match self.phase {
            RiderPhase::Charging => return self.tick_charge(motion, target, elapsed_ms, animation),
            RiderPhase::Hunting => self.tick_hunt(motion, target, elapsed_ms, animation),
            RiderPhase::Regular => self.pursue(motion, target, elapsed_ms, animation),
        }
        false
    }
}

/// Queues the damage and cue for a charge that connected.
pub(crate) fn land_charge(
    rider: &OrcRider,
    victim: Entity,
    inbox: &mut StatusInbox,
    audio: &mut AudioQueue,
) {
    inbox.enqueue(victim, StatusEffect::attack(rider.damage));
    audio.play(AudioChannel::Enemy, rider.kind.impact_sound());
    debug!("{:?} rider struck {victim:?} for {}", rider.kind, rider.damage);
}

type RiderRow<'w> = (&'w mut Motion, &'w mut OrcRider, &'w mut AnimationPlayer);

/// Drives every stand-alone orc rider for one tick. Squad knights are
/// driven by the squad coordinator instead.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn charger_system(
    mut commands: Commands,
    time: Res<Time>,
    players: Query<(Entity, &Motion), With<Player>>,
    mut riders: Query<RiderRow<'_>, (Without<Player>, Without<Knight>)>,
    mut inbox: ResMut<StatusInbox>,
    mut audio: ResMut<AudioQueue>,
) {
    let player: Option<Target> = sole_player(players.single(), &mut commands);
    let elapsed = elapsed_ms(&time);

    for (mut motion, mut rider, mut animation) in &mut riders {
        rider.target = player.map(|target| target.entity);
        let aim = player.map(|target| target.position);
        if rider.step(&mut motion, aim, elapsed, &mut animation) {
            if let Some(victim) = player {
                land_charge(&rider, victim.entity, &mut inbox, &mut audio);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rider() -> OrcRider {
        OrcRider::new(
            RiderKind::Orc,
            &RiderConfig {
                detection_range: 100_000.0,
                hunt_range: 500.0,
                walk_speed: 100.0,
                charge_speed: 600.0,
                charge_distance: 600.0,
                damage: 25.0,
            },
        )
    }

    fn assert_exclusive(rider: &OrcRider) {
        assert!(!(rider.is_hunting() && rider.is_charging()));
    }

    #[rstest]
    fn charge_duration_derives_from_distance_and_speed(rider: OrcRider) {
        assert!((rider.charge_duration_ms() - 1000.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn target_in_hunt_range_starts_hunt(mut rider: OrcRider) {
        let mut motion = Motion::at(Vec2::ZERO);
        motion.velocity = Vec2::new(30.0, 0.0);
        let mut animation = AnimationPlayer::default();

        rider.step(&mut motion, Some(Vec2::new(300.0, 0.0)), 16.0, &mut animation);

        assert_eq!(rider.state, RiderState::Hunt);
        assert!(rider.is_hunting());
        assert!((rider.hunt_timer_ms - HUNT_WINDUP_MS).abs() < f32::EPSILON);
        assert_eq!(motion.velocity, Vec2::ZERO);
        assert_eq!(animation.clip(), Some(AnimationClip::OrcHunt));
    }

    #[rstest]
    fn detected_target_is_walked_towards(mut rider: OrcRider) {
        let mut motion = Motion::at(Vec2::ZERO);
        motion.scale.x = 1.0;
        let mut animation = AnimationPlayer::default();

        rider.step(&mut motion, Some(Vec2::new(-1000.0, 0.0)), 16.0, &mut animation);

        assert_eq!(rider.state, RiderState::Walk);
        assert!((motion.velocity.x + 100.0).abs() < 1e-4);
        assert!(!motion.faces_right());
        assert_eq!(animation.clip(), Some(AnimationClip::OrcWalk));
    }

    #[rstest]
    fn no_target_idles(mut rider: OrcRider) {
        let mut motion = Motion::at(Vec2::ZERO);
        motion.velocity = Vec2::ONE;
        rider.state = RiderState::Walk;
        let mut animation = AnimationPlayer::default();

        rider.step(&mut motion, None, 16.0, &mut animation);

        assert_eq!(rider.state, RiderState::Idle);
        assert_eq!(motion.velocity, Vec2::ZERO);
        assert_eq!(animation.clip(), Some(AnimationClip::OrcIdle));
    }

    #[rstest]
    fn wind_up_freezes_charge_direction(mut rider: OrcRider) {
        let mut motion = Motion::at(Vec2::ZERO);
        let mut animation = AnimationPlayer::default();
        let mut aim = Vec2::new(300.0, 0.0);
        rider.step(&mut motion, Some(aim), 16.0, &mut animation);

        rider.step(&mut motion, Some(aim), HUNT_WINDUP_MS, &mut animation);
        assert!(rider.is_charging());
        assert_eq!(rider.charge_direction, Vec2::X);
        assert_eq!(animation.clip(), Some(AnimationClip::OrcWalk));

        aim = Vec2::new(0.0, 300.0);
        rider.step(&mut motion, Some(aim), 16.0, &mut animation);
        assert_eq!(motion.velocity, Vec2::X * rider.charge_speed);
        assert_exclusive(&rider);
    }

    #[rstest]
    fn charge_hits_once_per_charge(mut rider: OrcRider) {
        rider.phase = RiderPhase::Charging;
        rider.charge_direction = Vec2::X;
        rider.state = RiderState::Walk;
        let mut motion = Motion::at(Vec2::ZERO);
        let mut animation = AnimationPlayer::default();
        let aim = Some(Vec2::new(30.0, 0.0));

        assert!(rider.step(&mut motion, aim, 16.0, &mut animation));
        assert!(rider.has_hit_player);
        assert!(!rider.step(&mut motion, aim, 16.0, &mut animation));
        assert!(rider.has_hit_player);
    }

    #[rstest]
    fn charge_ends_into_cooldown(mut rider: OrcRider) {
        rider.phase = RiderPhase::Charging;
        rider.charge_direction = Vec2::X;
        rider.has_hit_player = true;
        let mut motion = Motion::at(Vec2::ZERO);
        let mut animation = AnimationPlayer::default();

        rider.step(&mut motion, None, 1000.0, &mut animation);

        assert_eq!(rider.phase, RiderPhase::Regular);
        assert_eq!(rider.state, RiderState::Idle);
        assert!(!rider.has_hit_player);
        assert_eq!(motion.velocity, Vec2::ZERO);
        assert!((rider.hunt_timer_ms - POST_CHARGE_COOLDOWN_MS).abs() < f32::EPSILON);
        assert_eq!(animation.clip(), Some(AnimationClip::OrcIdle));

        rider.step(&mut motion, Some(Vec2::new(100.0, 0.0)), 100.0, &mut animation);
        assert!(!rider.is_hunting());
        assert_eq!(motion.velocity, Vec2::ZERO);
    }

    #[rstest]
    #[case(16.0)]
    #[case(33.0)]
    #[case(250.0)]
    fn hunting_and_charging_stay_exclusive(mut rider: OrcRider, #[case] frame_ms: f32) {
        let mut motion = Motion::at(Vec2::ZERO);
        let mut animation = AnimationPlayer::default();
        for _ in 0..200 {
            rider.step(&mut motion, Some(Vec2::new(250.0, 40.0)), frame_ms, &mut animation);
            motion.position += motion.velocity * frame_ms / 1000.0;
            assert_exclusive(&rider);
        }
    }
}
