//! Entity lifecycle messages.
//!
//! Creation and destruction are requests: the [`GameWorld`](crate::gameworld::GameWorld)
//! buffers them and applies them at the next frame boundary, so no system sees
//! its entity list change while it iterates.

use bevy_ecs::prelude::Entity;

/// A fully built entity is ready to be registered with the systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCreated {
    pub entity: Entity,
}

/// Remove an entity from every system and from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDestroyed {
    pub entity: Entity,
}

/// An entity entered the dead super-state and waits for its death animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
}

/// A respawned entity is back and playing its appear animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityReappeared {
    pub entity: Entity,
}
