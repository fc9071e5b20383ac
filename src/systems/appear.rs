//! Appear system.
//!
//! Entities start their life, and every respawn, in the appearing
//! super-state. This system waits for their appear animation to finish and
//! then restores the default state, super-state and movement permissions.
//! Entities without an appear clip settle on the first update.

use bevy_ecs::prelude::*;
use std::rc::Rc;

use crate::components::active::Active;
use crate::components::animation::Animation;
use crate::components::state::{AnimationId, EntityState, SuperState};
use crate::events::bus::{MessageBus, SubscriptionToken};
use crate::events::lifecycle::EntityReappeared;

use super::manager::{unsubscribe_all, GameSystem, SharedEntityList};

#[derive(Default)]
pub struct AppearSystem {
    entities: SharedEntityList,
    tokens: Vec<SubscriptionToken>,
}

impl AppearSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked(&self) -> usize {
        self.entities.borrow().len()
    }
}

fn appear_finished(animation: Option<&Animation>) -> bool {
    match animation {
        None => true,
        Some(animation) if !animation.has_clip(AnimationId::Appear) => true,
        Some(animation) => {
            animation.current_action() == AnimationId::Appear && animation.is_finished()
        }
    }
}

impl GameSystem for AppearSystem {
    fn name(&self) -> &'static str {
        "Appear"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        if world
            .get::<EntityState>(entity)
            .is_some_and(|state| state.is(SuperState::Appearing))
        {
            self.entities.borrow_mut().insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.borrow_mut().remove(entity);
    }

    fn subscribe(&mut self, bus: &MessageBus) {
        let entities = Rc::clone(&self.entities);
        self.tokens
            .push(bus.subscribe::<EntityReappeared>(move |message, _| {
                entities.borrow_mut().insert(message.entity);
            }));
    }

    fn unsubscribe(&mut self, bus: &MessageBus) {
        unsubscribe_all(bus, &mut self.tokens);
    }

    fn update(&mut self, world: &mut World, _bus: &MessageBus) {
        let mut query = world.query::<(&Active, &mut EntityState, Option<&Animation>)>();
        let tracked = self.entities.borrow().snapshot();

        for entity in tracked {
            let Ok((active, mut state, animation)) = query.get_mut(world, entity) else {
                self.entities.borrow_mut().remove(entity);
                continue;
            };
            if !active.0 {
                continue;
            }
            if !state.is(SuperState::Appearing) {
                self.entities.borrow_mut().remove(entity);
                continue;
            }
            if appear_finished(animation) {
                state.reset_to_defaults();
                self.entities.borrow_mut().remove(entity);
            }
        }
    }
}
