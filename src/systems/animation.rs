//! Animation system.
//!
//! Each tick the clip of every active animated entity is chosen from the
//! animation id derived by its [`EntityState`], then playback is advanced
//! with the world delta. Switching clips restarts playback.
//!
//! # Related
//!
//! - [`crate::components::animation::Animation`] – per-entity clips and playback
//! - [`crate::components::state::animation_for`] – state to animation mapping

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::active::Active;
use crate::components::animation::Animation;
use crate::components::movement::Movement;
use crate::components::state::EntityState;
use crate::events::bus::MessageBus;
use crate::render::{DrawItem, DrawList};
use crate::resources::gameconfig::GameConfig;

use super::delta_seconds;
use super::manager::{EntityList, GameSystem};

#[derive(Default)]
pub struct AnimationSystem {
    entities: EntityList,
}

impl AnimationSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameSystem for AnimationSystem {
    fn name(&self) -> &'static str {
        "Animation"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<Animation>() && entity_ref.contains::<EntityState>() {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, _bus: &MessageBus) {
        let dt = delta_seconds(world);
        let log_switches = world
            .get_resource::<GameConfig>()
            .is_some_and(|config| config.debug.animation_messages);
        let mut query = world.query::<(&Active, &EntityState, &mut Animation)>();

        for entity in self.entities.iter() {
            let Ok((active, state, mut animation)) = query.get_mut(world, entity) else {
                continue;
            };
            if !active.0 {
                continue;
            }
            let wanted = state.animation();
            if animation.set_current_action(wanted) && log_switches {
                debug!("entity {entity:?} animation -> {wanted:?}");
            }
            animation.advance(dt);
        }
    }

    fn draw(&self, world: &World, out: &mut DrawList) {
        for entity in self.entities.iter() {
            let Ok(entity_ref) = world.get_entity(entity) else {
                continue;
            };
            if !entity_ref.get::<Active>().is_some_and(|active| active.0) {
                continue;
            }
            let (Some(movement), Some(state), Some(animation)) = (
                entity_ref.get::<Movement>(),
                entity_ref.get::<EntityState>(),
                entity_ref.get::<Animation>(),
            ) else {
                continue;
            };
            let Some(clip) = animation.current_clip() else {
                continue;
            };
            out.push(DrawItem::Sprite {
                entity,
                position: movement.position(),
                direction: state.direction(),
                animation: animation.current_action(),
                sprite_key: clip.sprite_key.clone(),
                frame: animation.frame_index,
            });
        }
    }
}
