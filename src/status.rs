//! Timed status effects queued by attackers.
//!
//! Behaviour systems never touch health directly. They push a
//! [`StatusEffect`] for the victim into the [`StatusInbox`], and
//! [`flush_status_inbox_system`] appends the buffered effects to each
//! victim's [`StatusEffects`] list once all behaviour has run.

use bevy::prelude::*;
use log::debug;

/// Kind of status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Direct damage.
    Attack,
}

/// One timed effect. A zero duration applies once and expires immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub duration_ms: f32,
    pub value: f32,
}

impl StatusEffect {
    /// Instant damage of `value`.
    #[must_use]
    pub const fn attack(value: f32) -> Self {
        Self {
            kind: StatusKind::Attack,
            duration_ms: 0.0,
            value,
        }
    }
}

/// Effects currently applied to an entity; consumed by the status system.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct StatusEffects(pub Vec<StatusEffect>);

impl StatusEffects {
    /// Sum of the instant damage waiting to be applied.
    #[must_use]
    pub fn pending_damage(&self) -> f32 {
        self.0
            .iter()
            .filter(|effect| effect.kind == StatusKind::Attack)
            .map(|effect| effect.value)
            .sum()
    }
}

/// Effects buffered during the behaviour step.
#[derive(Resource, Debug, Default)]
pub struct StatusInbox {
    entries: Vec<(Entity, StatusEffect)>,
}

impl StatusInbox {
    /// Queues `effect` for `target`.
    pub fn enqueue(&mut self, target: Entity, effect: StatusEffect) {
        self.entries.push((target, effect));
    }

    /// Iterates over queued effects without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &(Entity, StatusEffect)> {
        self.entries.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, (Entity, StatusEffect)> {
        self.entries.drain(..)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Moves buffered effects onto their targets.
///
/// Effects addressed to entities without a [`StatusEffects`] list are
/// dropped.
pub fn flush_status_inbox_system(
    mut inbox: ResMut<StatusInbox>,
    mut targets: Query<&mut StatusEffects>,
) {
    for (target, effect) in inbox.drain() {
        match targets.get_mut(target) {
            Ok(mut effects) => effects.0.push(effect),
            Err(_) => debug!("dropping {effect:?} for {target:?}: no status list"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn enqueue_preserves_order() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let mut inbox = StatusInbox::default();
        assert!(inbox.is_empty());
        inbox.enqueue(first, StatusEffect::attack(5.0));
        inbox.enqueue(second, StatusEffect::attack(7.0));
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(
            drained,
            vec![
                (first, StatusEffect::attack(5.0)),
                (second, StatusEffect::attack(7.0))
            ]
        );
        assert!(inbox.is_empty());
    }

    #[rstest]
    fn flush_appends_to_targets_and_drops_orphans() {
        let mut world = World::new();
        world.init_resource::<StatusInbox>();
        let victim = world.spawn(StatusEffects::default()).id();
        let bystander = world.spawn_empty().id();
        {
            let mut inbox = world.resource_mut::<StatusInbox>();
            inbox.enqueue(victim, StatusEffect::attack(3.0));
            inbox.enqueue(bystander, StatusEffect::attack(4.0));
            inbox.enqueue(victim, StatusEffect::attack(2.0));
        }

        let mut schedule = Schedule::default();
        schedule.add_systems(flush_status_inbox_system);
        schedule.run(&mut world);

        let effects = world.get::<StatusEffects>(victim).cloned().unwrap_or_default();
        assert_eq!(effects.0.len(), 2);
        assert!((effects.pending_damage() - 5.0).abs() < f32::EPSILON);
        assert!(world.resource::<StatusInbox>().is_empty());
    }
}
