//! Skeleton archer behaviour.
//!
//! Archers walk towards their target until they are inside `stop_distance`,
//! then plant themselves and loose one arrow per swing. Towers are preferred
//! over the player. Each tick runs these rules in order, stopping at the
//! first one that claims the tick:
//!
//! 1. Out of bounds: walk back onto the map and do nothing else.
//! 2. Swing timing: count the cooldown down and loose the arrow when the
//!    swing passes [`ARCHER_FIRE_THRESHOLD_MS`].
//! 3. Stale target: drop a target that no longer exists and wait a tick.
//! 4. Acquisition: nearest tower, else the player, else idle.
//! 5. Range: walk when beyond `attack_range`, attack inside
//!    `stop_distance`. Between the two nothing changes.

use bevy::prelude::*;
use log::debug;

use super::{elapsed_ms, sole_player, Target};
use crate::animation::{AnimationClip, AnimationPlayer, AnimationRequest};
use crate::audio::{AudioChannel, AudioQueue, Sound};
use crate::components::{Motion, Player, Tower};
use crate::map::MapBounds;
use crate::projectile::spawn_arrow;
use crate::spatial::{direction, distance};
use crate::{ARCHER_FIRE_THRESHOLD_MS, ARCHER_SPEED, SKELETON_ARROW_DAMAGE};

/// Visible state of an archer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArcherState {
    #[default]
    Idle,
    Walk,
    Attack,
}

/// Timing of one ranged attack cycle.
///
/// A swing starts with both timers at `attack_cooldown_ms`. The arrow leaves
/// once the attack timer drops to [`ARCHER_FIRE_THRESHOLD_MS`], and the swing
/// ends when the cooldown reaches zero. `arrow_fired` guarantees a single
/// arrow per swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    pub attack_cooldown_ms: f32,
    pub cooldown_timer_ms: f32,
    pub attack_timer_ms: f32,
    pub is_attacking: bool,
    pub arrow_fired: bool,
}

/// What happened to a [`Swing`] during one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwingEvent {
    /// The arrow should leave the bow now.
    pub loose: bool,
    /// The swing finished and the archer may attack again.
    pub completed: bool,
}

impl Swing {
    #[must_use]
    pub const fn new(attack_cooldown_ms: f32) -> Self {
        Self {
            attack_cooldown_ms,
            cooldown_timer_ms: 0.0,
            attack_timer_ms: 0.0,
            is_attacking: false,
            arrow_fired: false,
        }
    }

    /// Returns `true` when the cooldown has elapsed and no swing is running.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.cooldown_timer_ms <= 0.0 && !self.is_attacking
    }

    /// Starts a new swing.
    pub fn begin(&mut self) {
        self.is_attacking = true;
        self.cooldown_timer_ms = self.attack_cooldown_ms;
        self.attack_timer_ms = self.attack_cooldown_ms;
        self.arrow_fired = false;
    }

    /// Counts the swing down by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: f32) -> SwingEvent {
        let mut event = SwingEvent::default();
        if self.cooldown_timer_ms > 0.0 {
            self.cooldown_timer_ms -= elapsed_ms;
            if self.is_attacking {
                self.attack_timer_ms -= elapsed_ms;
                if self.attack_timer_ms <= ARCHER_FIRE_THRESHOLD_MS && !self.arrow_fired {
                    self.arrow_fired = true;
                    event.loose = true;
                }
            }
        }
        if self.cooldown_timer_ms <= 0.0 && self.is_attacking {
            self.is_attacking = false;
            self.arrow_fired = false;
            event.completed = true;
        }
        event
    }

    /// Play-once, locked attack animation lasting exactly one swing.
    #[must_use]
    pub fn animation(&self, clip: AnimationClip) -> AnimationRequest {
        AnimationRequest::once(clip)
            .spanning(self.attack_cooldown_ms)
            .locked()
    }
}

/// Ranged archer brain.
///
/// `stop_distance` must stay below `attack_range`, otherwise the archer can
/// never plant itself to shoot.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Skeleton {
    pub attack_range: f32,
    pub stop_distance: f32,
    pub swing: Swing,
    pub target: Option<Entity>,
    pub state: ArcherState,
}

impl Skeleton {
    #[must_use]
    pub const fn new(attack_range: f32, stop_distance: f32, attack_cooldown_ms: f32) -> Self {
        Self {
            attack_range,
            stop_distance,
            swing: Swing::new(attack_cooldown_ms),
            target: None,
            state: ArcherState::Idle,
        }
    }
}

/// Everything an archer can see this tick.
struct Surroundings<'a> {
    bounds: MapBounds,
    towers: &'a [Target],
    player: Option<Target>,
    elapsed_ms: f32,
}

impl Surroundings<'_> {
    fn locate(&self, entity: Entity) -> Option<Vec2> {
        self.towers
            .iter()
            .chain(self.player.iter())
            .find(|candidate| candidate.entity == entity)
            .map(|candidate| candidate.position)
    }

    fn preferred_target(&self, from: Vec2) -> Option<Target> {
        self.towers
            .iter()
            .copied()
            .min_by(|a, b| {
                distance(from, a.position).total_cmp(&distance(from, b.position))
            })
            .or(self.player)
    }
}

/// An arrow an archer wants loosed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Loose {
    from: Vec2,
    direction: Vec2,
}

fn walk(motion: &mut Motion, heading: Vec2, state: &mut ArcherState) {
    motion.velocity = heading * ARCHER_SPEED;
    motion.face_towards(heading);
    *state = ArcherState::Walk;
}

/// Runs the archer rules for one entity, returning an arrow to loose.
fn think(
    motion: &mut Motion,
    skeleton: &mut Skeleton,
    animation: &mut AnimationPlayer,
    world: &Surroundings<'_>,
) -> Option<Loose> {
    let previous = skeleton.state;
    let position = motion.position;

    if !world.bounds.contains(position) {
        let heading = direction(position, world.bounds.clamp(position));
        walk(motion, heading, &mut skeleton.state);
        dispatch_animation(previous, skeleton, animation);
        return None;
    }

    let mut loose = None;
    if skeleton.swing.advance(world.elapsed_ms).loose {
        loose = skeleton
            .target
            .and_then(|target| world.locate(target))
            .map(|aim| Loose {
                from: position,
                direction: direction(position, aim),
            })
            .filter(|shot| shot.direction != Vec2::ZERO);
    }

    if let Some(cached) = skeleton.target {
        if world.locate(cached).is_none() {
            debug!("archer target {cached:?} vanished");
            skeleton.target = None;
            return loose;
        }
    }

    let Some(target) = world.preferred_target(position) else {
        motion.halt();
        skeleton.state = ArcherState::Idle;
        dispatch_animation(previous, skeleton, animation);
        return loose;
    };
    skeleton.target = Some(target.entity);

    let range = distance(position, target.position);
    if range > skeleton.attack_range {
        walk(motion, direction(position, target.position), &mut skeleton.state);
    } else if range < skeleton.stop_distance {
        motion.halt();
        motion.face_towards(target.position - position);
        skeleton.state = ArcherState::Attack;
        if skeleton.swing.ready() {
            skeleton.swing.begin();
            animation.request(skeleton.swing.animation(AnimationClip::SkeletonAttack));
        } else if !skeleton.swing.is_attacking && animation.is_empty() {
            animation.request(AnimationRequest::looping(AnimationClip::SkeletonWalk));
        }
    }

    dispatch_animation(previous, skeleton, animation);
    loose
}

/// Requests the clip matching a state change.
///
/// A running attack animation is never replaced, and an archer that is mid
/// swing without its attack animation gets it back.
fn dispatch_animation(previous: ArcherState, skeleton: &Skeleton, animation: &mut AnimationPlayer) {
    let attacking = skeleton.swing.is_attacking;
    if attacking && animation.is_playing(AnimationClip::SkeletonAttack) {
        return;
    }
    let state = skeleton.state;
    let missing_attack_clip = state == ArcherState::Attack && attacking;
    if state == previous && !missing_attack_clip {
        return;
    }
    let request = match state {
        ArcherState::Idle => AnimationRequest::looping(AnimationClip::SkeletonIdle),
        ArcherState::Walk => AnimationRequest::looping(AnimationClip::SkeletonWalk),
        ArcherState::Attack if attacking => {
            skeleton.swing.animation(AnimationClip::SkeletonAttack)
        }
        ArcherState::Attack => AnimationRequest::looping(AnimationClip::SkeletonWalk),
    };
    animation.request(request);
}

type ArcherRow<'w> = (
    Entity,
    &'w mut Motion,
    &'w mut Skeleton,
    &'w mut AnimationPlayer,
);

/// Drives every skeleton archer for one tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn archer_system(
    mut commands: Commands,
    time: Res<Time>,
    bounds: Res<MapBounds>,
    towers: Query<(Entity, &Motion), (With<Tower>, Without<Skeleton>)>,
    players: Query<(Entity, &Motion), (With<Player>, Without<Skeleton>)>,
    mut archers: Query<ArcherRow<'_>, (Without<Player>, Without<Tower>)>,
    mut audio: ResMut<AudioQueue>,
) {
    let tower_targets: Vec<Target> = towers
        .iter()
        .map(|(entity, motion)| Target {
            entity,
            position: motion.position,
        })
        .collect();
    let world = Surroundings {
        bounds: *bounds,
        towers: &tower_targets,
        player: sole_player(players.single(), &mut commands),
        elapsed_ms: elapsed_ms(&time),
    };

    for (entity, mut motion, mut skeleton, mut animation) in &mut archers {
        if let Some(shot) = think(&mut motion, &mut skeleton, &mut animation, &world) {
            spawn_arrow(
                &mut commands,
                shot.from,
                shot.direction,
                entity,
                SKELETON_ARROW_DAMAGE,
            );
            audio.play(AudioChannel::Projectile, Sound::ArrowLoose);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const RANGE: f32 = 400.0;
    const STOP: f32 = 200.0;
    const COOLDOWN: f32 = 1000.0;

    #[fixture]
    fn skeleton() -> Skeleton {
        Skeleton::new(RANGE, STOP, COOLDOWN)
    }

    fn entity(index: u32) -> Entity {
        Entity::from_bits(u64::from(index))
    }

    fn surroundings(
        towers: &[Target],
        player: Option<Target>,
        elapsed_ms: f32,
    ) -> Surroundings<'_> {
        Surroundings {
            bounds: MapBounds::new(2000.0, 2000.0),
            towers,
            player,
            elapsed_ms,
        }
    }

    fn player_at(x: f32, y: f32) -> Option<Target> {
        Some(Target {
            entity: entity(1),
            position: Vec2::new(x, y),
        })
    }

    #[rstest]
    fn swing_resolves_in_one_cooldown(mut skeleton: Skeleton) {
        skeleton.swing.begin();
        let event = skeleton.swing.advance(COOLDOWN);
        assert!(skeleton.swing.cooldown_timer_ms <= 0.0);
        assert!(!skeleton.swing.is_attacking);
        assert!(!skeleton.swing.arrow_fired);
        assert_eq!(
            event,
            SwingEvent {
                loose: true,
                completed: true
            }
        );
    }

    #[rstest]
    fn swing_looses_exactly_once(mut skeleton: Skeleton) {
        skeleton.swing.begin();
        let looses = (0..10)
            .map(|_| skeleton.swing.advance(100.0))
            .filter(|event| event.loose)
            .count();
        assert_eq!(looses, 1);
    }

    #[rstest]
    fn swing_looses_at_threshold(mut skeleton: Skeleton) {
        skeleton.swing.begin();
        assert!(!skeleton.swing.advance(600.0).loose);
        assert!(skeleton.swing.advance(100.0).loose);
        assert!(skeleton.swing.arrow_fired);
    }

    #[rstest]
    fn out_of_bounds_walks_back_onto_map(mut skeleton: Skeleton) {
        let mut motion = Motion::at(Vec2::new(-10.0, 500.0));
        motion.velocity = Vec2::new(-30.0, 0.0);
        skeleton.state = ArcherState::Attack;
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], player_at(-500.0, 500.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert!(motion.velocity.x > 0.0);
        assert_eq!(skeleton.state, ArcherState::Walk);
        assert_eq!(animation.clip(), Some(AnimationClip::SkeletonWalk));
    }

    #[rstest]
    fn prefers_nearest_tower_over_player(mut skeleton: Skeleton) {
        let towers = [
            Target {
                entity: entity(10),
                position: Vec2::new(1500.0, 100.0),
            },
            Target {
                entity: entity(11),
                position: Vec2::new(900.0, 100.0),
            },
        ];
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&towers, player_at(150.0, 100.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert_eq!(skeleton.target, Some(entity(11)));
        assert_eq!(skeleton.state, ArcherState::Walk);
        assert!(motion.velocity.x > 0.0);
    }

    #[rstest]
    fn no_targets_means_idle(mut skeleton: Skeleton) {
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        motion.velocity = Vec2::new(5.0, 5.0);
        skeleton.state = ArcherState::Walk;
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], None, 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert_eq!(skeleton.state, ArcherState::Idle);
        assert_eq!(motion.velocity, Vec2::ZERO);
        assert_eq!(animation.clip(), Some(AnimationClip::SkeletonIdle));
    }

    #[rstest]
    fn stale_target_is_dropped_for_one_tick(mut skeleton: Skeleton) {
        skeleton.target = Some(entity(42));
        skeleton.state = ArcherState::Walk;
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        motion.velocity = Vec2::new(7.0, 0.0);
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], player_at(1000.0, 100.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);
        assert_eq!(skeleton.target, None);
        assert_eq!(motion.velocity, Vec2::new(7.0, 0.0));

        think(&mut motion, &mut skeleton, &mut animation, &world);
        assert_eq!(skeleton.target, Some(entity(1)));
    }

    #[rstest]
    fn inside_stop_distance_attacks(mut skeleton: Skeleton) {
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        motion.velocity = Vec2::new(80.0, 0.0);
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], player_at(100.0 + STOP * 0.5, 100.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert_eq!(skeleton.state, ArcherState::Attack);
        assert_eq!(motion.velocity, Vec2::ZERO);
        assert!(skeleton.swing.is_attacking);
        assert!(!skeleton.swing.arrow_fired);
        assert_eq!(animation.clip(), Some(AnimationClip::SkeletonAttack));
        assert!(animation.current_request().is_some_and(|r| !r.looping));
    }

    #[rstest]
    fn dead_zone_holds_previous_motion(mut skeleton: Skeleton) {
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        motion.velocity = Vec2::new(80.0, 0.0);
        skeleton.state = ArcherState::Walk;
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], player_at(400.0, 100.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert_eq!(skeleton.state, ArcherState::Walk);
        assert_eq!(motion.velocity, Vec2::new(80.0, 0.0));
    }

    #[rstest]
    fn one_arrow_per_swing_towards_target(mut skeleton: Skeleton) {
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        let mut animation = AnimationPlayer::default();
        let player = player_at(100.0, 200.0);
        let mut arrows = Vec::new();

        for _ in 0..10 {
            let world = surroundings(&[], player, 100.0);
            arrows.extend(think(&mut motion, &mut skeleton, &mut animation, &world));
        }

        assert_eq!(arrows.len(), 1);
        let shot = arrows.first().copied();
        assert_eq!(shot.map(|s| s.direction), Some(Vec2::Y));
    }

    #[rstest]
    fn idle_between_swings_falls_back_to_walk(mut skeleton: Skeleton) {
        skeleton.swing.cooldown_timer_ms = 500.0;
        skeleton.state = ArcherState::Attack;
        let mut motion = Motion::at(Vec2::new(100.0, 100.0));
        let mut animation = AnimationPlayer::default();
        let world = surroundings(&[], player_at(150.0, 100.0), 16.0);

        think(&mut motion, &mut skeleton, &mut animation, &world);

        assert!(!skeleton.swing.is_attacking);
        assert_eq!(animation.clip(), Some(AnimationClip::SkeletonWalk));
    }
}
