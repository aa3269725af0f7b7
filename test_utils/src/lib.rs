//! Utility helpers for tests.
//!
//! [`AiHarness`] drives the enemy AI over a bare Bevy `World` with explicit
//! time steps, so integration tests control every tick.

use std::time::Duration;

use anyhow::{anyhow, Result};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use warband::audio::{AudioQueue, Sound};
use warband::behaviour::AiDiagnostic;
use warband::components::Motion;
use warband::config::SquadConfig;
use warband::map::MapBounds;
use warband::plugin::configure_ai_schedule;
use warband::projectile::Arrow;
use warband::spawn::spawn_squad;
use warband::status::{StatusEffects, StatusInbox};

/// Diagnostics raised by the AI during a harness run.
#[derive(Resource, Default, Debug)]
pub struct CapturedDiagnostics(pub Vec<AiDiagnostic>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_diagnostic(event: On<AiDiagnostic>, mut captured: ResMut<CapturedDiagnostics>) {
    captured.0.push(*event.event());
}

/// A world running the AI schedule one explicit tick at a time.
pub struct AiHarness {
    world: World,
    schedule: Schedule,
}

impl Default for AiHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl AiHarness {
    /// Creates a harness with default map bounds and empty queues.
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.init_resource::<MapBounds>();
        world.init_resource::<StatusInbox>();
        world.init_resource::<AudioQueue>();
        world.init_resource::<CapturedDiagnostics>();
        world.add_observer(record_diagnostic);

        let mut schedule = Schedule::default();
        configure_ai_schedule(&mut schedule);
        Self { world, schedule }
    }

    /// Replaces the map bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: MapBounds) -> Self {
        self.world.insert_resource(bounds);
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn spawn(&mut self, bundle: impl Bundle) -> Entity {
        self.world.spawn(bundle).id()
    }

    /// Spawns a squad through the same path the game uses.
    pub fn spawn_squad(
        &mut self,
        config: &SquadConfig,
        centre: Vec2,
        target: Option<Entity>,
    ) -> Entity {
        let squad = {
            let mut commands = self.world.commands();
            spawn_squad(&mut commands, config, centre, target)
        };
        self.world.flush();
        squad
    }

    /// Advances time by `elapsed_ms` and runs one AI tick.
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(elapsed_ms));
        self.schedule.run(&mut self.world);
    }

    /// Runs `ticks` ticks of `elapsed_ms` each.
    pub fn run(&mut self, ticks: usize, elapsed_ms: u64) {
        for _ in 0..ticks {
            self.tick(elapsed_ms);
        }
    }

    /// Returns a copy of component `T` on `entity`.
    pub fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.world.get::<T>(entity).cloned()
    }

    /// Like [`AiHarness::get`] but fails with a readable message.
    pub fn require<T: Component + Clone>(&self, entity: Entity) -> Result<T> {
        self.get::<T>(entity).ok_or_else(|| {
            anyhow!(
                "{entity:?} has no {} component",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn motion(&self, entity: Entity) -> Result<Motion> {
        self.require::<Motion>(entity)
    }

    /// Overwrites the motion of `entity`.
    pub fn place(&mut self, entity: Entity, motion: Motion) -> Result<()> {
        let mut slot = self
            .world
            .get_mut::<Motion>(entity)
            .ok_or_else(|| anyhow!("{entity:?} has no Motion"))?;
        *slot = motion;
        Ok(())
    }

    /// Strips the motion component, which is how the AI recognises death.
    pub fn kill(&mut self, entity: Entity) {
        if let Ok(mut target) = self.world.get_entity_mut(entity) {
            target.remove::<Motion>();
        }
    }

    /// Total instant damage delivered to `entity` so far.
    pub fn damage_taken(&self, entity: Entity) -> f32 {
        self.world
            .get::<StatusEffects>(entity)
            .map_or(0.0, StatusEffects::pending_damage)
    }

    /// Number of damage effects delivered to `entity` so far.
    pub fn hits_taken(&self, entity: Entity) -> usize {
        self.world
            .get::<StatusEffects>(entity)
            .map_or(0, |effects| effects.0.len())
    }

    pub fn cues(&self, sound: Sound) -> usize {
        self.world.resource::<AudioQueue>().count(sound)
    }

    pub fn arrows(&mut self) -> Vec<Arrow> {
        self.world.query::<&Arrow>().iter(&self.world).copied().collect()
    }

    pub fn diagnostics(&self) -> Vec<AiDiagnostic> {
        self.world.resource::<CapturedDiagnostics>().0.clone()
    }
}
