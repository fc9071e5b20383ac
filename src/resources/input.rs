//! External input intents.
//!
//! The simulation does not read devices. The host writes the three intents
//! into [`InputState`] before each tick (see `GameWorld::set_input`) and the
//! player input system copies them onto the player.

use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn new(left: bool, right: bool, jump: bool) -> Self {
        Self { left, right, jump }
    }
}
