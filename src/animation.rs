//! Animation request bridge.
//!
//! Behaviour systems never drive sprite frames themselves. They ask the
//! entity's [`AnimationPlayer`] to play a clip whenever their visible state
//! changes, and [`animation_playback_system`] advances whatever is playing.
//!
//! A request replaces the current animation unless the current one is
//! locked and still running, in which case the request is dropped. Locks
//! release as soon as a non-looping animation finishes.

use bevy::prelude::*;
use log::trace;

/// Named frame sets known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationClip {
    ZombieWalk,
    SkeletonIdle,
    SkeletonWalk,
    SkeletonAttack,
    OrcIdle,
    OrcWalk,
    OrcHunt,
    KnightIdle,
    KnightWalk,
    KnightHunt,
}

impl AnimationClip {
    /// Number of frames in the sprite sheet row for this clip.
    #[must_use]
    pub const fn frame_count(self) -> u32 {
        match self {
            Self::ZombieWalk | Self::SkeletonWalk | Self::OrcWalk | Self::KnightWalk => 8,
            Self::SkeletonIdle | Self::OrcIdle | Self::KnightIdle => 6,
            Self::SkeletonAttack => 10,
            Self::OrcHunt | Self::KnightHunt => 8,
        }
    }

    /// Default time each frame stays on screen.
    #[must_use]
    pub const fn frame_duration_ms(self) -> f32 {
        match self {
            Self::SkeletonIdle | Self::OrcIdle | Self::KnightIdle => 150.0,
            _ => 100.0,
        }
    }
}

/// Parameters of a single animation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub clip: AnimationClip,
    pub frame_duration_ms: f32,
    pub frame_count: u32,
    pub looping: bool,
    pub locked: bool,
    pub destroy_on_finish: bool,
}

impl AnimationRequest {
    /// A looping, unlocked request using the clip's default timing.
    #[must_use]
    pub const fn looping(clip: AnimationClip) -> Self {
        Self {
            clip,
            frame_duration_ms: clip.frame_duration_ms(),
            frame_count: clip.frame_count(),
            looping: true,
            locked: false,
            destroy_on_finish: false,
        }
    }

    /// A play-once, unlocked request using the clip's default timing.
    #[must_use]
    pub const fn once(clip: AnimationClip) -> Self {
        Self {
            looping: false,
            ..Self::looping(clip)
        }
    }

    /// Stretches the frame duration so the whole clip lasts `total_ms`.
    #[must_use]
    pub fn spanning(mut self, total_ms: f32) -> Self {
        if self.frame_count > 0 && total_ms > 0.0 {
            self.frame_duration_ms = total_ms / self.frame_count as f32;
        }
        self
    }

    /// Prevents later requests from replacing this one until it finishes.
    #[must_use]
    pub const fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Despawns the owning entity once the animation finishes.
    #[must_use]
    pub const fn destroy_on_finish(mut self) -> Self {
        self.destroy_on_finish = true;
        self
    }

    fn total_ms(&self) -> f32 {
        self.frame_duration_ms * self.frame_count as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveAnimation {
    request: AnimationRequest,
    elapsed_ms: f32,
    frame: u32,
}

/// Outcome of advancing an [`AnimationPlayer`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Nothing playing, or still running.
    Running,
    /// A play-once animation completed this tick.
    Finished,
    /// A play-once animation completed and asked for its entity to go.
    Destroy,
}

/// Per-entity animation state.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct AnimationPlayer {
    current: Option<ActiveAnimation>,
}

impl AnimationPlayer {
    /// Asks for `request` to play, returning whether it was accepted.
    ///
    /// The request is silently dropped while a locked animation is still
    /// assigned.
    pub fn request(&mut self, request: AnimationRequest) -> bool {
        if let Some(active) = &self.current {
            if active.request.locked {
                trace!("dropped {:?}: {:?} is locked", request.clip, active.request.clip);
                return false;
            }
        }
        self.current = Some(ActiveAnimation {
            request,
            elapsed_ms: 0.0,
            frame: 0,
        });
        true
    }

    /// Clip currently assigned, if any.
    #[must_use]
    pub fn clip(&self) -> Option<AnimationClip> {
        self.current.map(|active| active.request.clip)
    }

    /// Returns `true` when `clip` is the assigned animation.
    #[must_use]
    pub fn is_playing(&self, clip: AnimationClip) -> bool {
        self.current.is_some_and(|active| active.request.clip == clip)
    }

    /// Returns `true` when no animation is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the full parameters of the current request.
    #[must_use]
    pub fn current_request(&self) -> Option<AnimationRequest> {
        self.current.map(|active| active.request)
    }

    /// Frame index currently shown.
    #[must_use]
    pub fn frame(&self) -> Option<u32> {
        self.current.map(|active| active.frame)
    }

    /// Advances the current animation by `elapsed_ms`.
    ///
    /// Finished play-once animations are cleared so the owning behaviour can
    /// notice that nothing is assigned.
    pub fn advance(&mut self, elapsed_ms: f32) -> PlaybackOutcome {
        let Some(active) = self.current.as_mut() else {
            return PlaybackOutcome::Running;
        };
        let request = active.request;
        if request.frame_count == 0 || request.frame_duration_ms <= 0.0 {
            return PlaybackOutcome::Running;
        }
        active.elapsed_ms += elapsed_ms;

        let frames_elapsed = (active.elapsed_ms / request.frame_duration_ms) as u32;
        if request.looping {
            active.frame = frames_elapsed % request.frame_count;
            return PlaybackOutcome::Running;
        }
        if active.elapsed_ms < request.total_ms() {
            active.frame = frames_elapsed.min(request.frame_count - 1);
            return PlaybackOutcome::Running;
        }

        self.current = None;
        if request.destroy_on_finish {
            PlaybackOutcome::Destroy
        } else {
            PlaybackOutcome::Finished
        }
    }
}

/// Advances every animation and despawns entities whose finished animation
/// requested it.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn animation_playback_system(
    mut commands: Commands,
    time: Res<Time>,
    mut players: Query<(Entity, &mut AnimationPlayer)>,
) {
    let elapsed_ms = time.delta_secs() * 1000.0;
    for (entity, mut player) in &mut players {
        if player.advance(elapsed_ms) == PlaybackOutcome::Destroy {
            commands.entity(entity).despawn();
        }
    }
}
