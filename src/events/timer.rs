//! Level countdown start message.
//!
//! Published by the entity factory when a level defines a timer object. The
//! [`TimerSystem`](crate::systems::timer::TimerSystem) attaches the countdown
//! to `entity` and starts tracking it.

use bevy_ecs::prelude::Entity;

use crate::math::Vector2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerStarted {
    pub entity: Entity,
    pub seconds: f32,
    /// Where the countdown text is drawn.
    pub position: Vector2,
}
