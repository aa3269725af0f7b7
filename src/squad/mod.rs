//! Squad coordination.
//!
//! A squad binds archers, protector orcs and an optional knight to the
//! player. Each tick the coordinator prunes dead members, then drives the
//! archer ring, the protectors and the knight in that order. A squad whose
//! member lists all run empty is deactivated for good.

pub mod formation;
pub mod knight;
pub mod protector;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use log::{debug, info};

use crate::animation::AnimationPlayer;
use crate::audio::AudioQueue;
use crate::behaviour::{elapsed_ms, sole_player, OrcRider, Target};
use crate::components::{Attack, Motion, Player};
use crate::spatial::distance;
use crate::status::StatusInbox;
use crate::{SQUAD_GRACE_PERIOD_MS, SQUAD_REPOSITION_INTERVAL_MS, SQUAD_TARGET_MOVE_THRESHOLD};

pub use formation::{formation_slot, SquadArcher};
pub use knight::Knight;
pub use protector::{protector_slot, GuardState, Protector};

/// Arrangement of the archer ring. Only the defensive ring exists today.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    #[default]
    Defensive,
}

/// Coordination record for one squad, stored on its own entity.
///
/// `protectors[i]` guards `archers[i]`; members beyond the shorter list go
/// unpaired.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Squad {
    pub archers: Vec<Entity>,
    pub protectors: Vec<Entity>,
    pub knight: Option<Entity>,
    pub active: bool,
    pub target: Option<Entity>,
    pub last_target_position: Option<Vec2>,
    pub coordination_timer_ms: f32,
    pub formation: Formation,
}

impl Squad {
    #[must_use]
    pub fn new(archers: Vec<Entity>, protectors: Vec<Entity>, knight: Option<Entity>) -> Self {
        Self {
            archers,
            protectors,
            knight,
            active: true,
            target: None,
            last_target_position: None,
            coordination_timer_ms: 0.0,
            formation: Formation::Defensive,
        }
    }

    /// Drops every member for which `alive` is false, returning how many
    /// were removed.
    pub fn prune(&mut self, alive: impl Fn(Entity) -> bool) -> usize {
        let before = self.len();
        self.archers.retain(|member| alive(*member));
        self.protectors.retain(|member| alive(*member));
        self.knight = self.knight.filter(|member| alive(*member));
        before - self.len()
    }

    /// Number of living members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archers.len() + self.protectors.len() + usize::from(self.knight.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advances the coordination clock and reports whether the ring should
    /// re-form this tick.
    ///
    /// Re-forming is due when the target moved past
    /// [`SQUAD_TARGET_MOVE_THRESHOLD`] since it was last recorded, during the
    /// grace period after spawn, or once per
    /// [`SQUAD_REPOSITION_INTERVAL_MS`].
    pub fn reposition_due(&mut self, target: Vec2, elapsed_ms: f32) -> bool {
        self.coordination_timer_ms += elapsed_ms;

        let moved = self
            .last_target_position
            .is_none_or(|last| distance(last, target) > SQUAD_TARGET_MOVE_THRESHOLD);
        if moved {
            self.last_target_position = Some(target);
        }
        let grace = self.coordination_timer_ms < SQUAD_GRACE_PERIOD_MS;
        let periodic = self.coordination_timer_ms % SQUAD_REPOSITION_INTERVAL_MS < elapsed_ms;
        moved || grace || periodic
    }
}

/// Shared inputs for one squad tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SquadTick {
    pub(crate) target: Target,
    pub(crate) elapsed_ms: f32,
    pub(crate) reposition: bool,
}

type ArcherRow = (
    &'static mut SquadArcher,
    &'static Attack,
    &'static mut AnimationPlayer,
);
type ProtectorRow = (&'static mut Protector, &'static mut AnimationPlayer);
type KnightRow = (
    &'static mut OrcRider,
    &'static mut Knight,
    &'static mut AnimationPlayer,
);

#[derive(SystemParam)]
/// Queries over every kind of squad member.
pub struct SquadMembers<'w, 's> {
    /// Motion of any non-player entity; absence marks a member as dead.
    pub(crate) motions: Query<'w, 's, &'static mut Motion, Without<Player>>,
    pub(crate) archers: Query<'w, 's, ArcherRow>,
    pub(crate) protectors: Query<'w, 's, ProtectorRow, Without<SquadArcher>>,
    pub(crate) knights: Query<'w, 's, KnightRow, (Without<SquadArcher>, Without<Protector>)>,
}

/// Drives every active squad for one tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn squad_system(
    mut commands: Commands,
    time: Res<Time>,
    players: Query<(Entity, &Motion), With<Player>>,
    mut squads: Query<(Entity, &mut Squad)>,
    mut members: SquadMembers,
    mut inbox: ResMut<StatusInbox>,
    mut audio: ResMut<AudioQueue>,
) {
    let player = sole_player(players.single(), &mut commands);
    let elapsed = elapsed_ms(&time);

    for (id, mut squad) in &mut squads {
        if !squad.active {
            continue;
        }
        let pruned = squad.prune(|member| members.motions.contains(member));
        if pruned > 0 {
            debug!("squad {id:?} lost {pruned} member(s)");
        }
        if squad.is_empty() {
            squad.active = false;
            info!("squad {id:?} has no members left and stands down");
            continue;
        }

        let Some(target) = player else {
            continue;
        };
        squad.target = Some(target.entity);
        let tick = SquadTick {
            target,
            elapsed_ms: elapsed,
            reposition: squad.reposition_due(target.position, elapsed),
        };

        formation::drive_archers(&squad, &tick, &mut members, &mut commands, &mut audio);
        protector::drive_protectors(&squad, &tick, &mut members);
        knight::drive_knight(&squad, &tick, &mut members, &mut inbox, &mut audio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn entity(index: u32) -> Entity {
        Entity::from_bits(u64::from(index))
    }

    #[fixture]
    fn squad() -> Squad {
        Squad::new(
            vec![entity(1), entity(2), entity(3)],
            vec![entity(4), entity(5), entity(6)],
            Some(entity(7)),
        )
    }

    #[rstest]
    fn prune_keeps_order_of_survivors(mut squad: Squad) {
        let removed = squad.prune(|member| member != entity(2) && member != entity(7));
        assert_eq!(removed, 2);
        assert_eq!(squad.archers, vec![entity(1), entity(3)]);
        assert_eq!(squad.protectors.len(), 3);
        assert_eq!(squad.knight, None);
    }

    #[rstest]
    fn prune_everything_empties_squad(mut squad: Squad) {
        squad.prune(|_| false);
        assert!(squad.is_empty());
    }

    #[rstest]
    fn grace_period_forces_reposition(mut squad: Squad) {
        assert!(squad.reposition_due(Vec2::ZERO, 16.0));
        assert!(squad.reposition_due(Vec2::ZERO, 16.0));
    }

    #[rstest]
    fn reposition_after_grace_needs_a_reason(mut squad: Squad) {
        squad.coordination_timer_ms = SQUAD_GRACE_PERIOD_MS + 100.0;
        squad.last_target_position = Some(Vec2::ZERO);
        assert!(!squad.reposition_due(Vec2::new(10.0, 0.0), 16.0));
        assert!(squad.reposition_due(Vec2::new(100.0, 0.0), 16.0));
        assert_eq!(squad.last_target_position, Some(Vec2::new(100.0, 0.0)));
    }

    #[rstest]
    fn periodic_window_opens_once_per_interval(mut squad: Squad) {
        squad.coordination_timer_ms = SQUAD_REPOSITION_INTERVAL_MS - 10.0;
        squad.last_target_position = Some(Vec2::ZERO);
        assert!(squad.reposition_due(Vec2::ZERO, 16.0));
        assert!(!squad.reposition_due(Vec2::ZERO, 16.0));
    }
}
