//! Hop Engine library.
//!
//! Simulation core of a 2D platformer: an entity/component store on top of
//! `bevy_ecs`, a synchronous message bus, per-entity state machines, movement
//! and collision resolution, lifecycle systems (death, respawn, appear) and
//! the level-sequencing [`gameworld::GameWorld`]. Rendering, audio and input
//! devices stay outside; the world exposes a [`render::DrawList`] and takes
//! intents through [`resources::input::InputState`].

pub mod components;
pub mod entitystore;
pub mod events;
pub mod factory;
pub mod gameworld;
pub mod levelloader;
pub mod math;
pub mod render;
pub mod resources;
pub mod systems;
