//! Player versus entity contacts.
//!
//! The player is tracked apart from every other typed entity. Each tick the
//! player box is tested against the box of every other live entity and the
//! contact is resolved by the other entity's [`EntityType`]:
//!
//! - **Coin**: collected. The coin dies and [`EntityDied`] is published.
//! - **PortalToNextLevel**: [`NextLevel`] is published.
//! - **RegularEnemy**: a falling player whose previous box bottom was above
//!   the enemy top stomps it. The enemy dies with a small upward pop, the
//!   player bounces back up with one jump used. Any other contact kills the
//!   player.
//!
//! Processing stops as soon as the player dies.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::active::Active;
use crate::components::boxcollider::BoxCollider;
use crate::components::entitytype::EntityType;
use crate::components::movement::Movement;
use crate::components::state::{EntityState, InteractionState, SuperState};
use crate::events::bus::MessageBus;
use crate::events::level::NextLevel;
use crate::events::lifecycle::EntityDied;
use crate::math::Vector2;
use crate::resources::gameconfig::PhysicsConfig;

use super::manager::{EntityList, GameSystem};
use super::obstaclecollision::CONTACT_GAP;
use super::tuning;

const STOMP_TOLERANCE: f32 = 1.0;

/// Outcome of one player contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    Collected,
    Portal,
    Stomped,
    Killed,
}

/// Copy of the collision-relevant components of one entity.
#[derive(Debug, Clone)]
pub struct Body {
    pub state: EntityState,
    pub movement: Movement,
    pub collider: BoxCollider,
}

impl Body {
    fn read(world: &World, entity: Entity) -> Option<Self> {
        let entity_ref = world.get_entity(entity).ok()?;
        if !entity_ref.get::<Active>().is_some_and(|active| active.0) {
            return None;
        }
        Some(Self {
            state: entity_ref.get::<EntityState>()?.clone(),
            movement: *entity_ref.get::<Movement>()?,
            collider: *entity_ref.get::<BoxCollider>()?,
        })
    }

    fn write(self, world: &mut World, entity: Entity) {
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            return;
        };
        if let Some(mut state) = entity_mut.get_mut::<EntityState>() {
            *state = self.state;
        }
        if let Some(mut movement) = entity_mut.get_mut::<Movement>() {
            *movement = self.movement;
        }
        if let Some(mut collider) = entity_mut.get_mut::<BoxCollider>() {
            *collider = self.collider;
        }
    }

    fn is_live(&self) -> bool {
        !self.state.is(SuperState::Dead) && !self.state.is(SuperState::Appearing)
    }

    fn refresh_box(&mut self) {
        self.collider
            .update_box_position(self.movement.position(), self.state.direction());
    }
}

fn stomp(player: &mut Body, enemy: &mut Body, physics: &PhysicsConfig) {
    let enemy_top = enemy.collider.rect().top();
    let x = player.movement.position().x;
    let y = player.collider.y_standing_on(enemy_top) - CONTACT_GAP;
    player.movement.set_position(Vector2::new(x, y));
    player.movement.acceleration = Vector2::ZERO;

    enemy.movement.velocity = Vector2::new(0.0, physics.enemy_death_velocity_y);
    enemy.movement.acceleration = Vector2::new(0.0, physics.enemy_death_gravity);
    enemy.state.set_super_state(SuperState::Dead);
    enemy.state.set_state(InteractionState::Idle);

    let direction = player.state.direction() as f32;
    player.movement.velocity = Vector2::new(
        physics.stomp_knockback_x * direction,
        0.0 - physics.stomp_knockback_y,
    );
    player.state.set_super_state(SuperState::Jumping);
    player.state.set_state(InteractionState::Idle);
    player.state.jumps_performed = 1;
}

fn kill_player(player: &mut Body, physics: &PhysicsConfig) {
    player.state.set_super_state(SuperState::Dead);
    player.state.set_state(InteractionState::Idle);
    player.movement.velocity = Vector2::new(0.0, physics.jump_speed / 2.0);
    player.movement.acceleration = Vector2::new(0.0, physics.gravity / 2.0);
}

/// Resolve a contact between the player and an entity of type `kind`.
pub fn resolve_contact(
    player: &mut Body,
    other: &mut Body,
    kind: EntityType,
    physics: &PhysicsConfig,
) -> Contact {
    let other_rect = other.collider.rect();
    if !player.collider.rect().intersects(&other_rect) {
        return Contact::None;
    }

    let contact = match kind {
        EntityType::Coin => {
            other.state.set_super_state(SuperState::Dead);
            Contact::Collected
        }
        EntityType::PortalToNextLevel => Contact::Portal,
        EntityType::RegularEnemy => {
            let previous_bottom = player
                .collider
                .bottom_at(player.movement.last_position().y);
            let came_from_above = previous_bottom <= other_rect.top() + STOMP_TOLERANCE;
            if player.state.is(SuperState::Falling) && came_from_above {
                stomp(player, other, physics);
                Contact::Stomped
            } else {
                kill_player(player, physics);
                Contact::Killed
            }
        }
        EntityType::Player => Contact::None,
    };

    player.refresh_box();
    other.refresh_box();
    contact
}

#[derive(Default)]
pub struct PlayerEntityCollisionSystem {
    player: Option<Entity>,
    entities: EntityList,
}

impl PlayerEntityCollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }
}

impl GameSystem for PlayerEntityCollisionSystem {
    fn name(&self) -> &'static str {
        "PlayerEntityCollision"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if !(entity_ref.contains::<EntityState>()
            && entity_ref.contains::<Movement>()
            && entity_ref.contains::<BoxCollider>())
        {
            return;
        }
        match entity_ref.get::<EntityType>() {
            Some(EntityType::Player) => self.player = Some(entity),
            Some(_) => {
                self.entities.insert(entity);
            }
            None => {}
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        if self.player == Some(entity) {
            self.player = None;
        }
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, bus: &MessageBus) {
        let Some(player_entity) = self.player else {
            return;
        };
        let Some(mut player) = Body::read(world, player_entity) else {
            return;
        };
        if !player.is_live() {
            return;
        }
        let (physics, _) = tuning(world);

        for entity in self.entities.iter() {
            let Some(kind) = world.get::<EntityType>(entity).copied() else {
                continue;
            };
            let Some(mut other) = Body::read(world, entity) else {
                continue;
            };
            if !other.is_live() {
                continue;
            }

            let contact = resolve_contact(&mut player, &mut other, kind, &physics);
            match contact {
                Contact::None => continue,
                Contact::Portal => {
                    debug!("player reached portal {entity:?}");
                    bus.publish(NextLevel);
                }
                Contact::Collected | Contact::Stomped => {
                    other.write(world, entity);
                    bus.publish(EntityDied { entity });
                }
                Contact::Killed => {
                    other.write(world, entity);
                    player.write(world, player_entity);
                    bus.publish(EntityDied {
                        entity: player_entity,
                    });
                    return;
                }
            }
        }

        player.write(world, player_entity);
    }
}
