//! Player input system.
//!
//! Copies the external [`InputState`] onto every [`InputControlled`] entity and
//! turns it into an interaction state:
//!
//! - exactly one direction held walks that way, none or both means idle
//! - a wall slide is only left by pressing away from the wall
//! - jumping is refused while both directions are held
//!
//! Jump counting: standing on the ground resets the counter, a ground jump
//! uses one jump, and a second jump is allowed while falling. Sliding down a
//! wall counts as one jump already used, so a wall jump is always a double
//! jump.

use bevy_ecs::prelude::*;

use crate::components::active::Active;
use crate::components::inputcontrolled::InputControlled;
use crate::components::movement::Movement;
use crate::components::state::{EntityState, InteractionState, SuperState};
use crate::events::bus::MessageBus;
use crate::resources::input::InputState;

use super::manager::{EntityList, GameSystem};

#[derive(Default)]
pub struct PlayerInputSystem {
    entities: EntityList,
}

impl PlayerInputSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Apply one tick of intents to `state`.
pub fn apply_intents(state: &mut EntityState, input: &InputControlled) {
    let both_held = input.both_held();

    if state.state() == InteractionState::Slide {
        match input.single_direction() {
            Some(-1) if state.direction() == 1 => state.set_state(InteractionState::WalkLeft),
            Some(1) if state.direction() == -1 => state.set_state(InteractionState::WalkRight),
            _ => {}
        }
    } else {
        match input.single_direction() {
            Some(-1) => state.set_state(InteractionState::WalkLeft),
            Some(_) => state.set_state(InteractionState::WalkRight),
            None => state.set_state(InteractionState::Idle),
        }
    }

    match state.super_state() {
        SuperState::OnGround => {
            state.jumps_performed = 0;
            if input.jump && !both_held {
                state.jumps_performed = 1;
                state.set_state(InteractionState::Jump);
            }
        }
        SuperState::Falling => {
            if state.state() == InteractionState::Slide {
                state.jumps_performed = 1;
            }
            if input.jump && !both_held {
                if state.jumps_performed < 1 {
                    state.set_state(InteractionState::Jump);
                    state.jumps_performed = 1;
                } else if state.jumps_performed < 2 {
                    state.set_state(InteractionState::DoubleJump);
                    state.jumps_performed = 2;
                }
            }
        }
        _ => {}
    }
}

impl GameSystem for PlayerInputSystem {
    fn name(&self) -> &'static str {
        "PlayerInput"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<EntityState>() && entity_ref.contains::<InputControlled>() {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, _bus: &MessageBus) {
        let intents = world
            .get_resource::<InputState>()
            .copied()
            .unwrap_or_default();
        let mut query = world.query::<(
            &Active,
            &mut EntityState,
            &mut InputControlled,
            Option<&mut Movement>,
        )>();

        for entity in self.entities.iter() {
            let Ok((active, mut state, mut input, movement)) = query.get_mut(world, entity) else {
                continue;
            };
            if !active.0 || state.is(SuperState::Dead) || state.is(SuperState::Appearing) {
                continue;
            }

            input.left = intents.left;
            input.right = intents.right;
            input.jump = intents.jump;

            if let Some(mut movement) = movement {
                movement.jump_held = input.jump;
                movement.both_held = input.both_held();
            }

            apply_intents(&mut state, &input);
        }
    }
}
