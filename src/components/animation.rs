//! Sprite animation playback.
//!
//! An [`Animation`] owns one [`AnimationClip`] per [`AnimationId`] the entity
//! can show. The animation system selects the current clip from the entity's
//! state every tick and advances playback with the world delta.
//!
//! Switching to a different clip restarts it from frame zero. Requesting a
//! clip the entity does not have falls back to the default clip.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

use crate::components::state::AnimationId;

/// A strip of frames taken from one sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    /// Key of the sprite sheet in the renderer's texture store.
    pub sprite_key: String,
    pub frame_count: usize,
    pub fps: f32,
    pub looped: bool,
}

impl AnimationClip {
    pub fn new(sprite_key: impl Into<String>, frame_count: usize, fps: f32, looped: bool) -> Self {
        Self {
            sprite_key: sprite_key.into(),
            frame_count: frame_count.max(1),
            fps,
            looped,
        }
    }
}

#[derive(Debug, Clone, Component)]
pub struct Animation {
    clips: FxHashMap<AnimationId, AnimationClip>,
    current: AnimationId,
    default: AnimationId,
    pub frame_index: usize,
    pub elapsed_time: f32,
}

impl Animation {
    pub fn new(default: AnimationId) -> Self {
        Self {
            clips: FxHashMap::default(),
            current: default,
            default,
            frame_index: 0,
            elapsed_time: 0.0,
        }
    }

    /// Builder-style clip registration. Replaces any clip under the same id.
    pub fn with_clip(mut self, id: AnimationId, clip: AnimationClip) -> Self {
        self.clips.insert(id, clip);
        self
    }

    /// Id actually being played, after the default fallback.
    pub fn current_action(&self) -> AnimationId {
        if self.clips.contains_key(&self.current) {
            self.current
        } else {
            self.default
        }
    }

    pub fn has_clip(&self, id: AnimationId) -> bool {
        self.clips.contains_key(&id)
    }

    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.clips
            .get(&self.current)
            .or_else(|| self.clips.get(&self.default))
    }

    /// Switch clip. Returns true when the clip changed and playback restarted.
    pub fn set_current_action(&mut self, id: AnimationId) -> bool {
        if self.current == id {
            return false;
        }
        self.current = id;
        self.reset();
        true
    }

    /// Restart the current clip.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }

    /// Advance playback by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some((frame_count, fps, looped)) = self
            .current_clip()
            .map(|clip| (clip.frame_count, clip.fps, clip.looped))
        else {
            return;
        };
        if frame_count <= 1 || fps <= 0.0 {
            return;
        }

        self.elapsed_time += dt;
        let frame_duration = 1.0 / fps;
        while self.elapsed_time >= frame_duration {
            self.elapsed_time -= frame_duration;
            self.frame_index += 1;
            if self.frame_index >= frame_count {
                if looped {
                    self.frame_index = 0;
                } else {
                    self.frame_index = frame_count - 1;
                    self.elapsed_time = 0.0;
                    break;
                }
            }
        }
    }

    /// True while the current clip shows its final frame.
    pub fn is_finished(&self) -> bool {
        match self.current_clip() {
            Some(clip) => self.frame_index + 1 >= clip.frame_count,
            None => true,
        }
    }
}
