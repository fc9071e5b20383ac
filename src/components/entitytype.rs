//! Collision dispatch tag.
//!
//! [`EntityType`] only decides how the player-entity collision system resolves
//! a contact. It has no effect on rendering or physics.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Player,
    Coin,
    RegularEnemy,
    PortalToNextLevel,
}
