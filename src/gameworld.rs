//! The game world: level sequencing and the tick loop.
//!
//! [`GameWorld`] owns the entity store, the message bus, the systems of the
//! active level and the level registry. Structural changes requested during
//! a tick are deferred:
//!
//! - [`EntityCreated`] and [`EntityDestroyed`] land in two queues that are
//!   applied at the tick boundaries, so no system sees its tracking list
//!   change while it iterates
//! - [`NextLevel`], [`PreviousLevel`] and [`ReloadLevel`] record a pending
//!   level change. The first request of a tick wins and is applied at the
//!   start of the next tick.
//!
//! One [`GameWorld::update`] runs:
//!
//! 1. the pending level change, if any: every system is unsubscribed, every
//!    entity despawned, both queues cleared, the systems rebuilt for the new
//!    level and subscribed, then the level objects are spawned
//! 2. registration of queued new entities with every system
//! 3. the world clock
//! 4. every system in order
//! 5. removal of queued destroyed entities from every system and the store

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::components::active::Active;
use crate::components::entitytype::EntityType;
use crate::components::movement::Movement;
use crate::components::state::{AnimationId, EntityState, SuperState};
use crate::events::bus::{MessageBus, SubscriptionToken};
use crate::events::level::{LevelChange, NextLevel, PreviousLevel, ReloadLevel};
use crate::events::lifecycle::{EntityCreated, EntityDestroyed};
use crate::levelloader::{spawn_level_objects, spawn_object};
use crate::math::Vector2;
use crate::render::DrawList;
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::levelstore::{LevelError, LevelStore, ObjectDescriptor};
use crate::resources::obstacles::ObstacleMap;
use crate::resources::worldtime::WorldTime;
use crate::systems::manager::{EntityList, SharedEntityList, SystemManager};
use crate::systems::time::update_world_time;

/// Render-facing view of one active entity after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub entity: Entity,
    pub position: Vector2,
    pub direction: i32,
    pub animation: AnimationId,
    pub super_state: SuperState,
}

type PendingChange = Rc<Cell<Option<LevelChange>>>;

fn request_change(pending: &Cell<Option<LevelChange>>, change: LevelChange) {
    match pending.get() {
        Some(first) => debug!("ignoring {change:?}, {first:?} already requested this tick"),
        None => pending.set(Some(change)),
    }
}

fn take_all(queue: &SharedEntityList) -> Vec<Entity> {
    let mut queue = queue.borrow_mut();
    let entities = queue.snapshot();
    queue.clear();
    entities
}

pub struct GameWorld {
    world: World,
    bus: MessageBus,
    systems: SystemManager,
    levels: LevelStore,
    current: usize,
    to_add: SharedEntityList,
    to_destroy: SharedEntityList,
    pending_change: PendingChange,
    accumulator: f32,
    tokens: Vec<SubscriptionToken>,
}

impl GameWorld {
    /// Build the world and load the first level.
    pub fn new(config: GameConfig, levels: LevelStore) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }

        let mut world = World::new();
        if config.debug.collision_boxes {
            world.insert_resource(DebugMode {});
        }
        world.insert_resource(config);
        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());

        let mut game = Self {
            world,
            bus: MessageBus::new(),
            systems: SystemManager::new(),
            levels,
            current: 0,
            to_add: Rc::new(RefCell::new(EntityList::default())),
            to_destroy: Rc::new(RefCell::new(EntityList::default())),
            pending_change: Rc::new(Cell::new(None)),
            accumulator: 0.0,
            tokens: Vec::new(),
        };
        game.subscribe_handlers();
        game.load_level(0)?;
        Ok(game)
    }

    fn subscribe_handlers(&mut self) {
        let to_add = Rc::clone(&self.to_add);
        self.tokens
            .push(self.bus.subscribe::<EntityCreated>(move |message, _| {
                to_add.borrow_mut().insert(message.entity);
            }));

        let to_destroy = Rc::clone(&self.to_destroy);
        self.tokens
            .push(self.bus.subscribe::<EntityDestroyed>(move |message, _| {
                to_destroy.borrow_mut().insert(message.entity);
            }));

        let pending = Rc::clone(&self.pending_change);
        self.tokens.push(
            self.bus
                .subscribe::<NextLevel>(move |_, _| request_change(&pending, LevelChange::Next)),
        );
        let pending = Rc::clone(&self.pending_change);
        self.tokens
            .push(self.bus.subscribe::<PreviousLevel>(move |_, _| {
                request_change(&pending, LevelChange::Previous)
            }));
        let pending = Rc::clone(&self.pending_change);
        self.tokens.push(
            self.bus
                .subscribe::<ReloadLevel>(move |_, _| request_change(&pending, LevelChange::Reload)),
        );
    }

    fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let level = self.levels.get(index)?;

        self.systems.unsubscribe(&self.bus);
        let entities: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<Active>>()
            .iter(&self.world)
            .collect();
        for entity in entities {
            self.world.despawn(entity);
        }
        self.to_add.borrow_mut().clear();
        self.to_destroy.borrow_mut().clear();

        self.systems = SystemManager::for_level(ObstacleMap::from_layers(&level.obstacles));
        self.systems.subscribe(&self.bus);
        let spawned = spawn_level_objects(&mut self.world, &self.bus, &level.objects);

        self.current = index;
        info!(
            "level {} '{}' loaded with {} objects",
            index,
            level.name,
            spawned.len()
        );
        Ok(())
    }

    fn apply_level_change(&mut self) -> Result<(), LevelError> {
        let Some(change) = self.pending_change.take() else {
            return Ok(());
        };
        let index = match change {
            LevelChange::Next => self.levels.next_index(self.current)?,
            LevelChange::Previous => self.levels.previous_index(self.current)?,
            LevelChange::Reload => self.current,
        };
        info!("{change:?}: level {} -> {}", self.current, index);
        self.load_level(index)
    }

    /// Run exactly one tick of `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Result<(), LevelError> {
        self.apply_level_change()?;

        for entity in take_all(&self.to_add) {
            self.systems.add_entity(&self.world, entity);
        }

        update_world_time(&mut self.world, dt);
        self.systems.update(&mut self.world, &self.bus);

        for entity in take_all(&self.to_destroy) {
            self.systems.remove_entity(entity);
            if self.world.get_entity(entity).is_ok() {
                self.world.despawn(entity);
            } else {
                debug!("destroy requested for missing entity {entity:?}");
            }
        }
        Ok(())
    }

    /// Accumulate `elapsed` real seconds and run the whole fixed steps they
    /// cover, at most `max_steps_per_advance`. Returns the steps run.
    pub fn advance(&mut self, elapsed: f32) -> Result<u32, LevelError> {
        let timing = self
            .world
            .get_resource::<GameConfig>()
            .map(|config| config.timing)
            .unwrap_or_default();
        let step = timing.fixed_step();

        self.accumulator += elapsed.max(0.0);
        let mut steps = 0;
        while self.accumulator >= step && steps < timing.max_steps_per_advance {
            self.update(step)?;
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            debug!("dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= step;
        }
        Ok(steps)
    }

    /// Spawn one extra object into the running level. Like level objects, it
    /// joins the systems at the next tick.
    pub fn spawn(&mut self, object: &ObjectDescriptor) -> Option<Entity> {
        spawn_object(&mut self.world, &self.bus, object)
    }

    /// Intents applied to player-controlled entities from the next tick on.
    pub fn set_input(&mut self, input: InputState) {
        self.world.insert_resource(input);
    }

    /// Collect the draw output of every system.
    pub fn draw(&self) -> DrawList {
        self.systems.draw(&self.world)
    }

    /// Every active entity with a movement and a state, ordered by entity.
    pub fn snapshot(&mut self) -> Vec<EntitySnapshot> {
        let mut query = self
            .world
            .query::<(Entity, &Active, &Movement, &EntityState)>();
        let mut snapshot: Vec<EntitySnapshot> = query
            .iter(&self.world)
            .filter(|(_, active, _, _)| active.0)
            .map(|(entity, _, movement, state)| EntitySnapshot {
                entity,
                position: movement.position(),
                direction: state.direction(),
                animation: state.animation(),
                super_state: state.super_state(),
            })
            .collect();
        snapshot.sort_by_key(|item| item.entity);
        snapshot
    }

    /// The player entity of the current level, if it is alive in the store.
    pub fn player(&mut self) -> Option<Entity> {
        let mut query = self.world.query::<(Entity, &EntityType)>();
        query
            .iter(&self.world)
            .find(|(_, kind)| **kind == EntityType::Player)
            .map(|(entity, _)| entity)
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn level_name(&self) -> &str {
        self.levels
            .get(self.current)
            .map(|level| level.name.as_str())
            .unwrap_or_default()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level change requested during the last tick, applied by the next one.
    pub fn pending_change(&self) -> Option<LevelChange> {
        self.pending_change.get()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }
}

impl Drop for GameWorld {
    fn drop(&mut self) {
        self.systems.unsubscribe(&self.bus);
        for token in self.tokens.drain(..) {
            self.bus.unsubscribe(token);
        }
    }
}
