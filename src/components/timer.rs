// Counts down a level time limit and reports when it runs out.
use bevy_ecs::prelude::Component;

use crate::math::Vector2;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub remaining: f32,
    /// Where the countdown text is drawn.
    pub position: Vector2,
    expired: bool,
}
impl Timer {
    pub fn new(seconds: f32, position: Vector2) -> Self {
        Timer {
            remaining: seconds.max(0.0),
            position,
            expired: false,
        }
    }
    /// Count down by `dt`. Returns true only on the tick the timer reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.expired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.expired = true;
            return true;
        }
        false
    }
    pub fn is_expired(&self) -> bool {
        self.expired
    }
    /// `mm:ss`, whole seconds truncated.
    pub fn text(&self) -> String {
        let total = self.remaining as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
