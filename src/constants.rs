//! Tuning constants shared by the behaviour systems.
//!
//! Distances are in pixels, speeds in pixels per second unless noted, and
//! durations in milliseconds.

/// Velocity damping applied to melee chasers every tick.
pub const MELEE_DAMPING: f32 = 0.9;
/// Range forced onto every melee attacker before the attack check.
pub const MELEE_ATTACK_RANGE: f32 = 60.0;
/// Cooldown started after a melee bite lands.
pub const MELEE_ATTACK_COOLDOWN_MS: f32 = 1000.0;

/// Walking speed of skeleton archers.
pub const ARCHER_SPEED: f32 = 80.0;
/// Remaining swing time at which the arrow leaves the bow.
pub const ARCHER_FIRE_THRESHOLD_MS: f32 = 300.0;
/// Damage carried by arrows loosed by lone skeletons.
pub const SKELETON_ARROW_DAMAGE: f32 = 10.0;

/// Radius within which a charging rider registers a hit.
pub const CHARGE_CONTACT_RADIUS: f32 = 50.0;
/// Hold time after a charge ends before the rider may act again.
pub const POST_CHARGE_COOLDOWN_MS: f32 = 300.0;
/// Wind-up before a charge; matches the length of the hunt animation.
pub const HUNT_WINDUP_MS: f32 = 800.0;

/// Speed of loosed arrows.
pub const ARROW_SPEED: f32 = 400.0;
/// Flight time after which an arrow that hit nothing is removed.
pub const ARROW_LIFETIME_MS: f32 = 2000.0;

/// Radius of the archer ring around the squad target.
pub const SQUAD_OPTIMAL_RADIUS: f32 = 250.0;
/// Target displacement that forces the formation to re-form.
pub const SQUAD_TARGET_MOVE_THRESHOLD: f32 = 50.0;
/// Window after spawn during which the formation re-forms continuously.
pub const SQUAD_GRACE_PERIOD_MS: f32 = 2000.0;
/// Period of the recurring re-formation window.
pub const SQUAD_REPOSITION_INTERVAL_MS: f32 = 3000.0;
/// Distance from a formation slot that still counts as "on station".
pub const SQUAD_SLOT_TOLERANCE: f32 = 40.0;
/// Fraction of the optimal radius below which an archer is too close.
pub const SQUAD_MIN_RADIUS_RATIO: f32 = 0.8;
/// Walking speed of squad archers.
pub const SQUAD_ARCHER_SPEED: f32 = 90.0;

/// Maximum distance a protector stands in front of its archer.
pub const PROTECTOR_MAX_OFFSET: f32 = 80.0;
/// Share of the archer-to-threat distance a protector covers.
pub const PROTECTOR_OFFSET_RATIO: f32 = 0.7;
/// Distance from its slot at which a protector counts as in position.
pub const PROTECTOR_SLOT_TOLERANCE: f32 = 15.0;
/// Threat distance at which a stationed protector charges.
pub const PROTECTOR_ENGAGE_RADIUS: f32 = 120.0;

/// Distance between the target and an ally that provokes the knight.
pub const KNIGHT_THREAT_RADIUS: f32 = 150.0;
/// Radius of the knight's patrol circle around the squad centroid.
pub const KNIGHT_PATROL_RADIUS: f32 = 200.0;
/// Seconds per full patrol revolution.
pub const KNIGHT_PATROL_PERIOD_SECS: f32 = 8.0;
/// Allies closer than this push the knight away while patrolling.
pub const KNIGHT_MIN_SEPARATION: f32 = 60.0;

/// Default map width in pixels.
pub const DEFAULT_MAP_WIDTH: f32 = 1600.0;
/// Default map height in pixels.
pub const DEFAULT_MAP_HEIGHT: f32 = 1200.0;
