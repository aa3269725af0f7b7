use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;
use warband::behaviour::RiderKind;
use warband::init_logging;
use warband::prelude::*;

/// Runs the enemy AI headlessly against a stationary player and tower
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Length of each tick in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// JSON roster overriding the default enemy stats
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Applies velocity intent to position; stands in for the physics layer.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn integrate_motion(time: Res<Time>, mut bodies: Query<&mut Motion>) {
    let dt = time.delta_secs();
    for mut motion in &mut bodies {
        let step = motion.velocity * dt;
        motion.position += step;
    }
}

fn populate(world: &mut World, roster: &RosterConfig) {
    let bounds = roster.map.bounds();
    let centre = Vec2::new(bounds.width, bounds.height) / 2.0;
    let player = world.spawn(PlayerBundle::new(centre)).id();
    world.spawn(TowerBundle::new(centre + Vec2::new(-300.0, 0.0)));
    world.spawn(ZombieBundle::new(Vec2::new(100.0, 100.0), &roster.zombie));
    world.spawn(SkeletonBundle::new(
        Vec2::new(bounds.width - 100.0, 100.0),
        &roster.skeleton,
    ));
    world.spawn(OrcRiderBundle::new(
        Vec2::new(100.0, bounds.height - 100.0),
        RiderKind::Orc,
        &roster.rider,
    ));
    let mut commands = world.commands();
    spawn_squad(
        &mut commands,
        &roster.squad,
        centre + Vec2::new(400.0, 300.0),
        Some(player),
    );
    world.flush();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let roster = match &args.config {
        Some(path) => RosterConfig::from_path(path)
            .with_context(|| format!("loading roster from {}", path.display()))?,
        None => RosterConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(roster.map.bounds())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            args.frame_ms,
        )))
        .add_plugins(EnemyAiPlugin)
        .add_systems(Update, integrate_motion.after(AiStep::Resolve));
    populate(app.world_mut(), &roster);

    let mut cues = 0_usize;
    for _ in 0..args.ticks {
        app.update();
        if let Some(mut audio) = app.world_mut().get_resource_mut::<AudioQueue>() {
            cues += audio.drain().count();
        }
    }

    let world = app.world_mut();
    let damage = world
        .query_filtered::<&StatusEffects, With<Player>>()
        .iter(world)
        .map(StatusEffects::pending_damage)
        .sum::<f32>();
    let arrows = world.query::<&Arrow>().iter(world).count();
    let active_squads = world
        .query::<&Squad>()
        .iter(world)
        .filter(|squad| squad.active)
        .count();
    info!(
        "{} ticks: player took {damage} damage, {arrows} arrow(s) in flight, \
         {active_squads} active squad(s), {cues} audio cue(s)",
        args.ticks
    );
    Ok(())
}
