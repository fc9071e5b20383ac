//! Gameplay systems.
//!
//! Every system is a struct implementing [`manager::GameSystem`] and is run by
//! the [`manager::SystemManager`] in a fixed order each tick.
//!
//! Submodules overview
//! - [`animation`] – pick the clip from the entity state and advance playback
//! - [`appear`] – finish the appear animation and restore default states
//! - [`death`] – after the death animation, destroy, reload or schedule a respawn
//! - [`enemyinput`] – patrol AI for regular enemies
//! - [`manager`] – the system trait, tracking lists and the ordered manager
//! - [`movement`] – integrate velocity and position from the state machine
//! - [`obstaclecollision`] – land on, bump into and slide along level geometry
//! - [`playercollision`] – coins, portals and enemy stomps
//! - [`playerinput`] – turn external intents into player states and jumps
//! - [`respawn`] – count down and bring dead entities back
//! - [`time`] – update simulation time and delta
//! - [`timer`] – level countdown that advances to the next level

use bevy_ecs::prelude::World;

use crate::resources::gameconfig::{GameConfig, PhysicsConfig, PlayfieldConfig};
use crate::resources::worldtime::WorldTime;

pub mod animation;
pub mod appear;
pub mod death;
pub mod enemyinput;
pub mod manager;
pub mod movement;
pub mod obstaclecollision;
pub mod playercollision;
pub mod playerinput;
pub mod respawn;
pub mod time;
pub mod timer;

/// Scaled delta of the current tick, zero before the clock exists.
pub(crate) fn delta_seconds(world: &World) -> f32 {
    world.get_resource::<WorldTime>().map_or(0.0, |time| time.delta)
}

/// Physics and playfield tuning, defaults when no config is loaded.
pub(crate) fn tuning(world: &World) -> (PhysicsConfig, PlayfieldConfig) {
    world
        .get_resource::<GameConfig>()
        .map(|config| (config.physics, config.playfield))
        .unwrap_or_default()
}
