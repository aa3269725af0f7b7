#![cfg_attr(docsrs, feature(doc_cfg))]
//! Enemy behaviour core for a realtime tower-defence game.
//!
//! Melee chasers, skeleton archers, orc riders and coordinated squads run as
//! Bevy systems. [`EnemyAiPlugin`] wires them into `Update` in a fixed order.
pub mod animation;
pub mod audio;
pub mod behaviour;
pub mod components;
pub mod config;
pub mod constants;
pub mod logging;
pub mod map;
pub mod plugin;
pub mod projectile;
pub mod spatial;
pub mod spawn;
pub mod squad;
pub mod status;
pub use constants::*;

// Re-export commonly used items
pub use animation::{AnimationClip, AnimationPlayer, AnimationRequest};
pub use behaviour::{AiDiagnostic, OrcRider, RiderKind, Skeleton, Target};
pub use components::{Attack, Cooldown, Enemy, HitReaction, Motion, Player, Slow, Tower};
pub use config::{ConfigError, RosterConfig};
pub use logging::init as init_logging;
pub use map::MapBounds;
pub use plugin::{AiStep, EnemyAiPlugin};
pub use squad::{Knight, Protector, Squad, SquadArcher};
pub use status::{StatusEffect, StatusEffects, StatusInbox};

pub mod prelude {
    //! Prelude exports used in documentation examples and the runner.
    //!
    //! ```rust,no_run
    //! use warband::prelude::*;
    //! ```

    pub use crate::audio::{AudioQueue, Sound};
    pub use crate::components::{Motion, Player, Tower};
    pub use crate::config::RosterConfig;
    pub use crate::map::MapBounds;
    pub use crate::plugin::{AiStep, EnemyAiPlugin};
    pub use crate::projectile::Arrow;
    pub use crate::spawn::{
        spawn_squad, OrcRiderBundle, PlayerBundle, SkeletonBundle, TowerBundle, ZombieBundle,
    };
    pub use crate::squad::Squad;
    pub use crate::status::{StatusEffects, StatusInbox};
}
