//! Respawn countdown component.
//!
//! Entities owning a [`Respawn`] are deactivated instead of destroyed when
//! they die. The respawn system ticks the countdown and brings them back at
//! `position` once it runs out.

use bevy_ecs::prelude::Component;

use crate::math::Vector2;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Respawn {
    /// Seconds between death and reappearance.
    pub duration: f32,
    elapsed: f32,
    respawning: bool,
    pub position: Vector2,
}

impl Respawn {
    pub fn new(position: Vector2, duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            respawning: false,
            position,
        }
    }

    pub fn is_respawning(&self) -> bool {
        self.respawning
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Restart the countdown from zero.
    pub fn start_respawn(&mut self) {
        self.elapsed = 0.0;
        self.respawning = true;
    }

    /// Advance the countdown. Returns true on the tick the countdown expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.respawning {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.respawning = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_countdown_never_expires() {
        let mut r = Respawn::new(Vector2::ZERO, 1.0);
        assert!(!r.tick(5.0));
        assert!(!r.is_respawning());
    }

    #[test]
    fn expires_once_duration_reached() {
        let mut r = Respawn::new(Vector2::new(10.0, 20.0), 1.0);
        r.start_respawn();
        assert!(!r.tick(0.5));
        assert!(r.is_respawning());
        assert!(r.tick(0.5));
        assert!(!r.is_respawning());
        assert!(!r.tick(0.5));
    }

    #[test]
    fn restart_resets_elapsed() {
        let mut r = Respawn::new(Vector2::ZERO, 2.0);
        r.start_respawn();
        r.tick(1.5);
        r.start_respawn();
        assert_eq!(r.elapsed(), 0.0);
        assert!(!r.tick(1.5));
        assert!(r.tick(0.5));
    }
}
