//! Activity flag.
//!
//! Inactive entities stay registered with every system but are skipped by
//! them. Deactivation is how a collected fruit or a stomped enemy waits for
//! its respawn without being destroyed.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Active(true)
    }
}
