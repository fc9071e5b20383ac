//! Movement integration.
//!
//! For each active, non-appearing entity with a state and a movement:
//!
//! 1. vertical regime from the super-state: grounded entities stop, falling
//!    ones get gravity (a tenth of it while sliding), ascending ones get
//!    gravity and start falling once they move down
//! 2. jumps requested by the input layer are launched here
//! 3. walking adds the walk speed to the horizontal velocity every tick
//! 4. `velocity += acceleration * dt`, clamped horizontally while airborne
//! 5. `position += velocity * dt`, then the collision box is re-derived
//!
//! Crossing the bottom of the playfield publishes [`ReloadLevel`].

use bevy_ecs::prelude::*;

use crate::components::active::Active;
use crate::components::boxcollider::BoxCollider;
use crate::components::movement::Movement;
use crate::components::state::{EntityState, InteractionState, SuperState};
use crate::events::bus::MessageBus;
use crate::events::level::ReloadLevel;
use crate::math::Vector2;
use crate::resources::gameconfig::PhysicsConfig;

use super::manager::{EntityList, GameSystem};
use super::{delta_seconds, tuning};

#[derive(Default)]
pub struct MovementSystem {
    entities: EntityList,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

fn vertical(state: &mut EntityState, movement: &mut Movement, physics: &PhysicsConfig) {
    match state.super_state() {
        SuperState::OnGround => {
            movement.stop();
            if state.state() == InteractionState::Jump {
                movement.velocity.y = physics.jump_speed;
                state.set_super_state(SuperState::Jumping);
            }
        }
        SuperState::Falling => {
            movement.acceleration = if state.state() == InteractionState::Slide {
                Vector2::new(0.0, physics.gravity / 10.0)
            } else {
                Vector2::new(0.0, physics.gravity)
            };
            if state.state() == InteractionState::DoubleJump {
                movement.velocity.y = physics.jump_speed;
                state.set_super_state(SuperState::DoubleJumping);
            }
        }
        SuperState::Jumping | SuperState::DoubleJumping => {
            movement.acceleration = Vector2::new(0.0, physics.gravity);
            if movement.velocity.y > 0.0 {
                state.set_super_state(SuperState::Falling);
            }
        }
        SuperState::Dead | SuperState::Appearing => {}
    }
}

fn horizontal(state: &mut EntityState, movement: &mut Movement, physics: &PhysicsConfig) {
    match state.state() {
        InteractionState::WalkLeft => {
            state.set_direction(-1);
            movement.velocity.x -= physics.walk_speed;
        }
        InteractionState::WalkRight => {
            state.set_direction(1);
            movement.velocity.x += physics.walk_speed;
        }
        _ => {}
    }
}

/// Advance one entity by `dt` seconds and return its new position.
pub fn integrate(
    state: &mut EntityState,
    movement: &mut Movement,
    physics: &PhysicsConfig,
    dt: f32,
) -> Vector2 {
    vertical(state, movement, physics);
    horizontal(state, movement, physics);

    let acceleration = movement.acceleration;
    movement.velocity += acceleration * dt;
    if !state.is(SuperState::OnGround) {
        movement.velocity = movement.velocity.with_clamped_x(physics.walk_speed);
    }

    let position = movement.position() + movement.velocity * dt;
    movement.set_position(position);
    position
}

impl GameSystem for MovementSystem {
    fn name(&self) -> &'static str {
        "Movement"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<EntityState>() && entity_ref.contains::<Movement>() {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, bus: &MessageBus) {
        let (physics, playfield) = tuning(world);
        let dt = delta_seconds(world);
        let mut query = world.query::<(
            &Active,
            &mut EntityState,
            &mut Movement,
            Option<&mut BoxCollider>,
        )>();

        for entity in self.entities.iter() {
            let Ok((active, mut state, mut movement, collider)) = query.get_mut(world, entity)
            else {
                continue;
            };
            if !active.0 || state.is(SuperState::Appearing) {
                continue;
            }

            let position = integrate(&mut state, &mut movement, &physics, dt);
            if position.y >= playfield.height {
                bus.publish(ReloadLevel);
            }
            if let Some(mut collider) = collider {
                collider.update_box_position(position, state.direction());
            }
        }
    }
}
