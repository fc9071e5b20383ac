//! Death handling.
//!
//! Entities announced through [`EntityDied`] are watched until their death
//! animation has played. Then:
//!
//! - the player is destroyed and the level reloaded
//! - entities with a [`Respawn`] component are deactivated and their respawn
//!   countdown started
//! - anything else is destroyed
//!
//! Each death is handled once. Announcements for entities that are inactive or
//! no longer dead by the next update are dropped.

use bevy_ecs::prelude::*;
use log::debug;
use std::rc::Rc;

use crate::components::active::Active;
use crate::components::animation::Animation;
use crate::components::entitytype::EntityType;
use crate::components::respawn::Respawn;
use crate::components::state::{AnimationId, EntityState, SuperState};
use crate::events::bus::{MessageBus, SubscriptionToken};
use crate::events::level::ReloadLevel;
use crate::events::lifecycle::{EntityDestroyed, EntityDied};

use super::manager::{unsubscribe_all, GameSystem, SharedEntityList};

#[derive(Default)]
pub struct DeathSystem {
    entities: SharedEntityList,
    tokens: Vec<SubscriptionToken>,
}

impl DeathSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracked(&self) -> usize {
        self.entities.borrow().len()
    }
}

/// What to do with a dead entity whose death animation is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Waiting,
    ReloadLevel,
    Respawn,
    Destroy,
}

fn death_finished(animation: Option<&Animation>) -> bool {
    match animation {
        None => true,
        Some(animation) if !animation.has_clip(AnimationId::Death) => true,
        Some(animation) => {
            animation.current_action() == AnimationId::Death && animation.is_finished()
        }
    }
}

impl GameSystem for DeathSystem {
    fn name(&self) -> &'static str {
        "Death"
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.borrow_mut().remove(entity);
    }

    fn subscribe(&mut self, bus: &MessageBus) {
        let entities = Rc::clone(&self.entities);
        self.tokens.push(bus.subscribe::<EntityDied>(move |message, _| {
            entities.borrow_mut().insert(message.entity);
        }));
    }

    fn unsubscribe(&mut self, bus: &MessageBus) {
        unsubscribe_all(bus, &mut self.tokens);
    }

    fn update(&mut self, world: &mut World, bus: &MessageBus) {
        let mut query = world.query::<(
            &mut Active,
            &EntityState,
            Option<&EntityType>,
            Option<&mut Animation>,
            Option<&mut Respawn>,
        )>();
        let tracked = self.entities.borrow().snapshot();

        for entity in tracked {
            let outcome = match query.get_mut(world, entity) {
                Err(_) => None,
                Ok((active, state, _, _, _)) if !active.0 || !state.is(SuperState::Dead) => None,
                Ok((mut active, _, kind, mut animation, respawn)) => {
                    if !death_finished(animation.as_deref()) {
                        Some(Outcome::Waiting)
                    } else if kind == Some(&EntityType::Player) {
                        Some(Outcome::ReloadLevel)
                    } else if let Some(mut respawn) = respawn {
                        active.0 = false;
                        if let Some(animation) = animation.as_mut() {
                            animation.reset();
                        }
                        respawn.start_respawn();
                        Some(Outcome::Respawn)
                    } else {
                        Some(Outcome::Destroy)
                    }
                }
            };

            match outcome {
                Some(Outcome::Waiting) => continue,
                Some(Outcome::ReloadLevel) => {
                    debug!("player {entity:?} died, reloading level");
                    bus.publish(EntityDestroyed { entity });
                    bus.publish(ReloadLevel);
                }
                Some(Outcome::Respawn) => debug!("entity {entity:?} waiting to respawn"),
                Some(Outcome::Destroy) => bus.publish(EntityDestroyed { entity }),
                None => {}
            }
            self.entities.borrow_mut().remove(entity);
        }
    }
}
