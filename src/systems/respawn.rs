//! Respawn countdown system.
//!
//! Dead entities with a [`Respawn`] component are deactivated by the death
//! system and their countdown started. This system ticks the countdown of
//! every inactive entity and, when it runs out, puts the entity back at its
//! respawn position in the appearing state and reactivates it.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::active::Active;
use crate::components::boxcollider::BoxCollider;
use crate::components::movement::Movement;
use crate::components::respawn::Respawn;
use crate::components::state::{EntityState, SuperState};
use crate::events::bus::MessageBus;
use crate::events::lifecycle::EntityReappeared;

use super::delta_seconds;
use super::manager::{EntityList, GameSystem};

#[derive(Default)]
pub struct RespawnSystem {
    entities: EntityList,
}

impl RespawnSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameSystem for RespawnSystem {
    fn name(&self) -> &'static str {
        "Respawn"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<Respawn>() && entity_ref.contains::<EntityState>() {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, bus: &MessageBus) {
        let dt = delta_seconds(world);
        let mut query = world.query::<(
            &mut Active,
            &mut Respawn,
            &mut EntityState,
            Option<&mut Movement>,
            Option<&mut BoxCollider>,
        )>();

        for entity in self.entities.iter() {
            let Ok((mut active, mut respawn, mut state, movement, collider)) =
                query.get_mut(world, entity)
            else {
                continue;
            };
            if active.0 || !respawn.is_respawning() {
                continue;
            }
            if !respawn.tick(dt) {
                continue;
            }

            state.set_super_state(SuperState::Appearing);
            let direction = state.default_direction();
            state.set_direction(direction);
            if let Some(mut movement) = movement {
                movement.set_position(respawn.position);
                movement.stop();
            }
            if let Some(mut collider) = collider {
                collider.update_box_position(respawn.position, direction);
            }
            active.0 = true;
            debug!("entity {entity:?} respawned at {:?}", respawn.position);
            bus.publish(EntityReappeared { entity });
        }
    }
}
