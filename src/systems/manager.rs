//! System trait and the ordered system manager.
//!
//! Gameplay systems are plain structs implementing [`GameSystem`]. Each one
//! caches the entities it cares about and works on the [`World`] directly
//! when updated. Every capability has a no-op default, so a system only
//! implements what it needs.
//!
//! The [`SystemManager`] owns the systems of the active level and broadcasts
//! each call to all of them in a fixed order:
//!
//! `PlayerInput → RegularEnemyInput → Movement → PlayerEntityCollision →
//! ObstacleCollision → Respawn → Appear → Timer → Animation → Death`
//!
//! Later systems read component state written earlier in the same tick.

use bevy_ecs::prelude::*;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use crate::events::bus::{MessageBus, SubscriptionToken};
use crate::render::DrawList;
use crate::resources::obstacles::ObstacleMap;

use super::animation::AnimationSystem;
use super::appear::AppearSystem;
use super::death::DeathSystem;
use super::enemyinput::RegularEnemyInputSystem;
use super::movement::MovementSystem;
use super::obstaclecollision::ObstacleCollisionSystem;
use super::playercollision::PlayerEntityCollisionSystem;
use super::playerinput::PlayerInputSystem;
use super::respawn::RespawnSystem;
use super::timer::TimerSystem;

pub trait GameSystem {
    fn name(&self) -> &'static str;

    /// Start tracking `entity` if it owns what this system needs.
    fn add_entity(&mut self, _world: &World, _entity: Entity) {}

    fn remove_entity(&mut self, _entity: Entity) {}

    fn subscribe(&mut self, _bus: &MessageBus) {}

    fn unsubscribe(&mut self, _bus: &MessageBus) {}

    fn update(&mut self, _world: &mut World, _bus: &MessageBus) {}

    fn draw(&self, _world: &World, _out: &mut DrawList) {}
}

/// Entities tracked by a system, in registration order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct EntityList {
    entities: Vec<Entity>,
}

impl EntityList {
    /// Returns false if `entity` was already tracked.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.entities.len();
        self.entities.retain(|tracked| *tracked != entity);
        self.entities.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Copy of the list, for iterating while the list may change.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// Tracking list shared between a system and its bus handlers.
pub type SharedEntityList = Rc<RefCell<EntityList>>;

/// Detach every subscription in `tokens`.
pub fn unsubscribe_all(bus: &MessageBus, tokens: &mut Vec<SubscriptionToken>) {
    for token in tokens.drain(..) {
        bus.unsubscribe(token);
    }
}

#[derive(Default)]
pub struct SystemManager {
    systems: Vec<Box<dyn GameSystem>>,
}

impl SystemManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full gameplay pipeline for a level with the given obstacles.
    pub fn for_level(obstacles: ObstacleMap) -> Self {
        let mut manager = Self::new();
        manager.push(Box::new(PlayerInputSystem::new()));
        manager.push(Box::new(RegularEnemyInputSystem::new()));
        manager.push(Box::new(MovementSystem::new()));
        manager.push(Box::new(PlayerEntityCollisionSystem::new()));
        manager.push(Box::new(ObstacleCollisionSystem::new(obstacles)));
        manager.push(Box::new(RespawnSystem::new()));
        manager.push(Box::new(AppearSystem::new()));
        manager.push(Box::new(TimerSystem::new()));
        manager.push(Box::new(AnimationSystem::new()));
        manager.push(Box::new(DeathSystem::new()));
        manager
    }

    /// Append a system. It runs after every system already registered.
    pub fn push(&mut self, system: Box<dyn GameSystem>) {
        debug!("registering system {}", system.name());
        self.systems.push(system);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn add_entity(&mut self, world: &World, entity: Entity) {
        for system in &mut self.systems {
            system.add_entity(world, entity);
        }
    }

    pub fn remove_entity(&mut self, entity: Entity) {
        for system in &mut self.systems {
            system.remove_entity(entity);
        }
    }

    pub fn subscribe(&mut self, bus: &MessageBus) {
        for system in &mut self.systems {
            system.subscribe(bus);
        }
    }

    pub fn unsubscribe(&mut self, bus: &MessageBus) {
        for system in &mut self.systems {
            system.unsubscribe(bus);
        }
    }

    pub fn update(&mut self, world: &mut World, bus: &MessageBus) {
        for system in &mut self.systems {
            system.update(world, bus);
        }
    }

    pub fn draw(&self, world: &World) -> DrawList {
        let mut out = DrawList::new();
        for system in &self.systems {
            system.draw(world, &mut out);
        }
        out
    }
}
