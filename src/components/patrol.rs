//! Patrol range for regular enemies.

use bevy_ecs::prelude::Component;

/// Horizontal range `[start - left_range, start + right_range]` an enemy walks in.
///
/// [`Patrol::update`] records which limit, if any, the enemy has reached. The
/// enemy input system turns it around at those limits.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    left: f32,
    right: f32,
    at_left_limit: bool,
    at_right_limit: bool,
}

impl Patrol {
    pub fn new(start: f32, left_range: f32, right_range: f32) -> Self {
        Self {
            left: start - left_range,
            right: start + right_range,
            at_left_limit: false,
            at_right_limit: false,
        }
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.left, self.right)
    }

    pub fn update(&mut self, x: f32) {
        self.at_left_limit = x <= self.left;
        self.at_right_limit = !self.at_left_limit && x >= self.right;
    }

    pub fn at_left_limit(&self) -> bool {
        self.at_left_limit
    }

    pub fn at_right_limit(&self) -> bool {
        self.at_right_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_inclusive() {
        let mut p = Patrol::new(100.0, 40.0, 60.0);
        assert_eq!(p.bounds(), (60.0, 160.0));

        p.update(100.0);
        assert!(!p.at_left_limit() && !p.at_right_limit());
        p.update(60.0);
        assert!(p.at_left_limit() && !p.at_right_limit());
        p.update(160.0);
        assert!(!p.at_left_limit() && p.at_right_limit());
        p.update(120.0);
        assert!(!p.at_left_limit() && !p.at_right_limit());
    }
}
