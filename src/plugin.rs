//! Bevy plugin wiring the enemy AI into the schedule.

use bevy::prelude::*;

use crate::animation::animation_playback_system;
use crate::audio::AudioQueue;
use crate::behaviour::{
    archer_system, charger_system, log_ai_diagnostic, melee_attack_system, melee_chase_system,
};
use crate::map::MapBounds;
use crate::projectile::arrow_flight_system;
use crate::squad::squad_system;
use crate::status::{flush_status_inbox_system, StatusInbox};

/// Ordered phases of one AI tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiStep {
    /// Behaviour state machines: melee, archers, chargers, squads.
    Behaviour,
    /// Collaborators consuming what the behaviours produced.
    Resolve,
}

/// Adds the enemy behaviour systems and their collaborator resources.
///
/// Melee runs before archers, archers before chargers and chargers before
/// squads, so each later system sees commands issued by the earlier ones.
/// An existing [`MapBounds`] resource is kept.
///
/// The plugin only fills [`AudioQueue`]; the host drains it, otherwise cues
/// pile up for the lifetime of the app.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnemyAiPlugin;

impl Plugin for EnemyAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_ai_diagnostic);

        app.init_resource::<MapBounds>()
            .init_resource::<StatusInbox>()
            .init_resource::<AudioQueue>();

        app.edit_schedule(Update, configure_ai_schedule);
    }
}

/// Adds the AI systems to `schedule` in tick order.
///
/// [`EnemyAiPlugin`] applies this to `Update`; harnesses that drive a bare
/// `World` apply it to their own schedule.
pub fn configure_ai_schedule(schedule: &mut Schedule) {
    schedule.configure_sets((AiStep::Behaviour, AiStep::Resolve).chain());
    schedule.add_systems(
        (
            melee_chase_system,
            melee_attack_system,
            archer_system,
            charger_system,
            squad_system,
        )
            .chain()
            .in_set(AiStep::Behaviour),
    );
    schedule.add_systems(
        (
            flush_status_inbox_system,
            arrow_flight_system,
            animation_playback_system,
        )
            .chain()
            .in_set(AiStep::Resolve),
    );
}
