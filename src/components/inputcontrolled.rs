//! Player-controlled marker and intents.

use bevy_ecs::prelude::Component;

/// Movement intents of a player-controlled entity.
///
/// The player input system copies the [`InputState`](crate::resources::input::InputState)
/// resource into this component every tick and derives the interaction state
/// from it.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputControlled {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputControlled {
    /// Exactly one horizontal direction held.
    pub fn single_direction(&self) -> Option<i32> {
        match (self.left, self.right) {
            (true, false) => Some(-1),
            (false, true) => Some(1),
            _ => None,
        }
    }

    pub fn both_held(&self) -> bool {
        self.left && self.right
    }
}
