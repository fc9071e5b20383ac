//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulation. Every kind listed here is also named by
//! [`ComponentKind`](crate::entitystore::ComponentKind), the closed set the
//! entity store reports on.
//!
//! Submodules overview:
//! - [`active`] – activity flag; inactive entities stay registered but are skipped
//! - [`animation`] – per-entity animation clips and playback position
//! - [`boxcollider`] – inset collision box plus known ground and slide surfaces
//! - [`entitytype`] – tag used to dispatch player-entity collisions
//! - [`inputcontrolled`] – left/right/jump intents of the player
//! - [`movement`] – position, previous position, velocity and acceleration
//! - [`patrol`] – walking range of a regular enemy
//! - [`respawn`] – countdown and position for entities that come back after dying
//! - [`state`] – interaction state, super-state and derived animation id
//! - [`timer`] – level countdown drawn as `mm:ss`

pub mod active;
pub mod animation;
pub mod boxcollider;
pub mod entitytype;
pub mod inputcontrolled;
pub mod movement;
pub mod patrol;
pub mod respawn;
pub mod state;
pub mod timer;
