//! Fire-and-forget audio cues.
//!
//! The AI only announces that a sound should play; the audio backend drains
//! [`AudioQueue`] on its own schedule.

use bevy::prelude::Resource;

/// Mixer channel a cue is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    Enemy,
    Projectile,
}

/// Sound effects the enemy core can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    ZombieBite,
    OrcCharge,
    KnightCharge,
    ArrowLoose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCue {
    pub channel: AudioChannel,
    pub sound: Sound,
}

/// Cues waiting for the audio backend.
///
/// Nothing in [`EnemyAiPlugin`](crate::plugin::EnemyAiPlugin) empties this
/// queue: the host app must [`drain`](AudioQueue::drain) it, typically once
/// per frame after [`AiStep::Resolve`](crate::plugin::AiStep::Resolve).
///
/// ```
/// use warband::audio::{AudioChannel, AudioQueue, Sound};
///
/// let mut queue = AudioQueue::default();
/// queue.play(AudioChannel::Enemy, Sound::ZombieBite);
/// let played: Vec<_> = queue.drain().map(|cue| cue.sound).collect();
/// assert_eq!(played, [Sound::ZombieBite]);
/// assert!(queue.is_empty());
/// ```
#[derive(Resource, Debug, Default)]
pub struct AudioQueue {
    cues: Vec<AudioCue>,
}

impl AudioQueue {
    pub fn play(&mut self, channel: AudioChannel, sound: Sound) {
        self.cues.push(AudioCue { channel, sound });
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, AudioCue> {
        self.cues.drain(..)
    }

    /// Number of queued cues of `sound`.
    pub fn count(&self, sound: Sound) -> usize {
        self.cues.iter().filter(|cue| cue.sound == sound).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
