//! Per-archetype behaviour state machines.
//!
//! Each submodule owns one archetype and exposes a Bevy system that walks its
//! entities once per tick. The systems share the player lookup and elapsed
//! time conversion defined here.

pub mod archer;
pub mod charger;
pub mod melee;

use bevy::ecs::prelude::On;
use bevy::ecs::query::QuerySingleError;
use bevy::prelude::*;
use log::warn;

use crate::components::Motion;

pub use archer::{archer_system, ArcherState, Skeleton, Swing, SwingEvent};
pub use charger::{charger_system, OrcRider, RiderKind, RiderPhase, RiderState};
pub use melee::{melee_attack_system, melee_chase_system};

/// An entity being pursued together with where it stood this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub entity: Entity,
    pub position: Vec2,
}

/// Diagnostics raised when the AI hits a broken precondition.
///
/// The plugin logs these through an observer; the AI itself degrades to a
/// no-op for the affected tick.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiDiagnostic {
    /// More than one entity carries the `Player` marker.
    MultiplePlayers,
}

/// Resolves the single active player from a `Query::single` result.
///
/// No player yields `None` silently. Several players also yield `None`, and
/// raise [`AiDiagnostic::MultiplePlayers`].
pub(crate) fn sole_player(
    lookup: Result<(Entity, &Motion), QuerySingleError>,
    commands: &mut Commands,
) -> Option<Target> {
    match lookup {
        Ok((entity, motion)) => Some(Target {
            entity,
            position: motion.position,
        }),
        Err(QuerySingleError::NoEntities(_)) => None,
        Err(QuerySingleError::MultipleEntities(_)) => {
            commands.trigger(AiDiagnostic::MultiplePlayers);
            None
        }
    }
}

/// Logs diagnostics raised by the behaviour systems.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn log_ai_diagnostic(event: On<AiDiagnostic>) {
    match event.event() {
        AiDiagnostic::MultiplePlayers => {
            warn!("several entities are marked as the player; enemy AI idles this tick");
        }
    }
}

/// Converts the frame delta into the milliseconds every timer counts in.
pub(crate) fn elapsed_ms(time: &Time) -> f32 {
    time.delta_secs() * 1000.0
}
