//! Kinematic state of an entity.
//!
//! [`Movement`] stores position, velocity and acceleration in world units.
//! The position is only written through [`Movement::set_position`], which keeps
//! the previous value in `last_position`. Collision resolution relies on that
//! previous position to tell whether an entity came from above or below an
//! obstacle.

use bevy_ecs::prelude::Component;

use crate::math::Vector2;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Movement {
    position: Vector2,
    last_position: Vector2,
    /// World units per second.
    pub velocity: Vector2,
    /// World units per second squared.
    pub acceleration: Vector2,
    /// Jump intent copied from the input layer.
    pub jump_held: bool,
    /// Both horizontal directions were held at once.
    pub both_held: bool,
}

impl Movement {
    /// Place an entity at `position` with no motion. `last_position` starts
    /// out equal to `position`.
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            last_position: position,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn last_position(&self) -> Vector2 {
        self.last_position
    }

    /// Move to `position`, remembering the current one as `last_position`.
    pub fn set_position(&mut self, position: Vector2) {
        self.last_position = self.position;
        self.position = position;
    }

    /// Zero velocity and acceleration.
    pub fn stop(&mut self) {
        self.velocity = Vector2::ZERO;
        self.acceleration = Vector2::ZERO;
    }
}
