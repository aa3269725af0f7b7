//! Entity bundles for every archetype, and squad assembly.
//!
//! Bundles take their stats from the roster config so the headless runner
//! and the tests spawn identical entities.

use bevy::prelude::*;
use log::debug;

use crate::animation::{AnimationClip, AnimationPlayer, AnimationRequest};
use crate::behaviour::{OrcRider, RiderKind, Skeleton};
use crate::components::{Attack, Enemy, Motion, Player, Tower};
use crate::config::{RiderConfig, SkeletonConfig, SquadConfig, ZombieConfig};
use crate::squad::{formation_slot, protector_slot, Knight, Protector, Squad, SquadArcher};
use crate::status::StatusEffects;
use crate::MELEE_ATTACK_RANGE;

fn playing(request: AnimationRequest) -> AnimationPlayer {
    let mut animation = AnimationPlayer::default();
    animation.request(request);
    animation
}

/// Bundle of components for the player entity.
#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub name: Name,
    pub motion: Motion,
    /// Receives every damage effect the AI enqueues.
    pub statuses: StatusEffects,
}

impl PlayerBundle {
    /// Creates a player standing at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy::prelude::*;
    /// use warband::spawn::PlayerBundle;
    ///
    /// let bundle = PlayerBundle::new(Vec2::new(100.0, 200.0));
    /// assert_eq!(bundle.name.as_str(), "Player");
    /// assert_eq!(bundle.motion.position, Vec2::new(100.0, 200.0));
    /// ```
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            player: Player,
            name: Name::new("Player"),
            motion: Motion::at(position),
            statuses: StatusEffects::default(),
        }
    }
}

/// Bundle of components for a tower.
#[derive(Bundle)]
pub struct TowerBundle {
    pub tower: Tower,
    pub name: Name,
    pub motion: Motion,
    pub statuses: StatusEffects,
}

impl TowerBundle {
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            tower: Tower,
            name: Name::new("Tower"),
            motion: Motion::at(position),
            statuses: StatusEffects::default(),
        }
    }
}

/// Bundle of components for a melee chaser.
#[derive(Bundle)]
pub struct ZombieBundle {
    pub name: Name,
    pub motion: Motion,
    pub enemy: Enemy,
    pub attack: Attack,
    pub animation: AnimationPlayer,
}

impl ZombieBundle {
    #[must_use]
    pub fn new(position: Vec2, config: &ZombieConfig) -> Self {
        Self {
            name: Name::new("Zombie"),
            motion: Motion::at(position),
            enemy: Enemy {
                health: config.health,
                speed: config.speed,
            },
            attack: Attack {
                range: MELEE_ATTACK_RANGE,
                damage: config.damage,
            },
            animation: playing(AnimationRequest::looping(AnimationClip::ZombieWalk)),
        }
    }
}

/// Bundle of components for a lone skeleton archer.
#[derive(Bundle)]
pub struct SkeletonBundle {
    pub name: Name,
    pub motion: Motion,
    pub skeleton: Skeleton,
    pub animation: AnimationPlayer,
}

impl SkeletonBundle {
    #[must_use]
    pub fn new(position: Vec2, config: &SkeletonConfig) -> Self {
        Self {
            name: Name::new("Skeleton"),
            motion: Motion::at(position),
            skeleton: Skeleton::new(
                config.attack_range,
                config.stop_distance,
                config.attack_cooldown_ms,
            ),
            animation: playing(AnimationRequest::looping(AnimationClip::SkeletonIdle)),
        }
    }
}

/// Bundle of components for a mounted charger.
#[derive(Bundle)]
pub struct OrcRiderBundle {
    pub name: Name,
    pub motion: Motion,
    pub rider: OrcRider,
    pub animation: AnimationPlayer,
}

impl OrcRiderBundle {
    #[must_use]
    pub fn new(position: Vec2, kind: RiderKind, config: &RiderConfig) -> Self {
        let rider = OrcRider::new(kind, config);
        let name = match kind {
            RiderKind::Orc => "Orc rider",
            RiderKind::Knight => "Knight",
        };
        Self {
            name: Name::new(name),
            motion: Motion::at(position),
            rider,
            animation: playing(AnimationRequest::looping(kind.clip(rider.state))),
        }
    }
}

/// Bundle of components for an archer in a squad ring.
#[derive(Bundle)]
pub struct SquadArcherBundle {
    pub name: Name,
    pub motion: Motion,
    pub archer: SquadArcher,
    pub attack: Attack,
    pub animation: AnimationPlayer,
}

impl SquadArcherBundle {
    #[must_use]
    pub fn new(position: Vec2, config: &SquadConfig) -> Self {
        Self {
            name: Name::new("Squad archer"),
            motion: Motion::at(position),
            archer: SquadArcher::new(config.archer_cooldown_ms),
            attack: Attack {
                range: config.archer_range,
                damage: config.archer_damage,
            },
            animation: playing(AnimationRequest::looping(AnimationClip::SkeletonWalk)),
        }
    }
}

/// Bundle of components for a protector orc.
#[derive(Bundle)]
pub struct ProtectorBundle {
    pub name: Name,
    pub motion: Motion,
    pub protector: Protector,
    pub animation: AnimationPlayer,
}

impl ProtectorBundle {
    #[must_use]
    pub fn new(position: Vec2, config: &SquadConfig) -> Self {
        Self {
            name: Name::new("Protector"),
            motion: Motion::at(position),
            protector: Protector::new(config.protector_speed, config.protector_charge_speed),
            animation: playing(AnimationRequest::looping(AnimationClip::OrcIdle)),
        }
    }
}

/// Spawns a fully populated squad around `centre` and returns the entity
/// holding its [`Squad`] record.
///
/// Archers start on their ring slots, protectors between their archer and
/// the centre, and the knight at the centre.
pub fn spawn_squad(
    commands: &mut Commands,
    config: &SquadConfig,
    centre: Vec2,
    target: Option<Entity>,
) -> Entity {
    let archer_positions: Vec<Vec2> = (0..config.archers)
        .map(|index| formation_slot(centre, index, config.archers))
        .collect();
    let archers: Vec<Entity> = archer_positions
        .iter()
        .map(|position| commands.spawn(SquadArcherBundle::new(*position, config)).id())
        .collect();
    let protectors: Vec<Entity> = (0..config.protectors)
        .map(|index| {
            let position = archer_positions
                .get(index)
                .map_or(centre, |archer| protector_slot(*archer, centre));
            commands.spawn(ProtectorBundle::new(position, config)).id()
        })
        .collect();
    let knight = config.knight.then(|| {
        commands
            .spawn((
                OrcRiderBundle::new(centre, RiderKind::Knight, &config.knight_stats),
                Knight::default(),
            ))
            .id()
    });

    let mut squad = Squad::new(archers, protectors, knight);
    squad.target = target;
    let id = commands.spawn((Name::new("Squad"), squad)).id();
    debug!(
        "spawned squad {id:?}: {} archer(s), {} protector(s), knight: {}",
        config.archers,
        config.protectors,
        config.knight
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn zombie_bundle_copies_config() {
        let config = ZombieConfig::default();
        let bundle = ZombieBundle::new(Vec2::ONE, &config);
        assert!((bundle.enemy.speed - config.speed).abs() < f32::EPSILON);
        assert!((bundle.attack.range - MELEE_ATTACK_RANGE).abs() < f32::EPSILON);
        assert_eq!(bundle.animation.clip(), Some(AnimationClip::ZombieWalk));
    }

    #[rstest]
    #[case(RiderKind::Orc, AnimationClip::OrcIdle)]
    #[case(RiderKind::Knight, AnimationClip::KnightIdle)]
    fn rider_bundle_starts_idle(#[case] kind: RiderKind, #[case] clip: AnimationClip) {
        let bundle = OrcRiderBundle::new(Vec2::ZERO, kind, &RiderConfig::default());
        assert_eq!(bundle.animation.clip(), Some(clip));
        assert_eq!(bundle.rider.kind, kind);
    }

    #[rstest]
    fn spawn_squad_populates_every_role() {
        let mut world = World::new();
        let config = SquadConfig::default();
        let id = {
            let mut commands = world.commands();
            spawn_squad(&mut commands, &config, Vec2::new(800.0, 600.0), None)
        };
        world.flush();

        let record = world.get::<Squad>(id).cloned();
        let Some(squad) = record else {
            panic!("squad record missing");
        };
        assert_eq!(squad.archers.len(), config.archers);
        assert_eq!(squad.protectors.len(), config.protectors);
        assert!(squad.knight.is_some());
        assert!(squad.active);
        for archer in &squad.archers {
            assert!(world.get::<SquadArcher>(*archer).is_some());
        }
        for protector in &squad.protectors {
            assert!(world.get::<Protector>(*protector).is_some());
        }
        assert!(squad
            .knight
            .is_some_and(|knight| world.get::<Knight>(knight).is_some()));
    }
}
