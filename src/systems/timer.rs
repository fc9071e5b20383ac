//! Level countdown system.
//!
//! Countdowns are announced with [`TimerStarted`]. The bus handler only
//! queues the request; the next update attaches a [`Timer`] component to the
//! announced entity and starts tracking it. While the entity is active its
//! timer counts down, and reaching zero publishes [`NextLevel`] once.

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

use crate::components::timer::Timer;
use crate::entitystore::{add_component, is_active};
use crate::events::bus::{MessageBus, SubscriptionToken};
use crate::events::level::NextLevel;
use crate::events::timer::TimerStarted;
use crate::render::{DrawItem, DrawList};

use super::delta_seconds;
use super::manager::{unsubscribe_all, EntityList, GameSystem};

#[derive(Default)]
pub struct TimerSystem {
    entities: EntityList,
    pending: Rc<RefCell<Vec<TimerStarted>>>,
    tokens: Vec<SubscriptionToken>,
}

impl TimerSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn attach_pending(&mut self, world: &mut World) {
        let pending: Vec<TimerStarted> = self.pending.borrow_mut().drain(..).collect();
        for started in pending {
            let timer = Timer::new(started.seconds, started.position);
            if add_component(world, started.entity, timer) {
                debug!(
                    "timer of {:.0}s attached to {:?}",
                    started.seconds, started.entity
                );
            }
            if world.get::<Timer>(started.entity).is_some() {
                self.entities.insert(started.entity);
            }
        }
    }
}

impl GameSystem for TimerSystem {
    fn name(&self) -> &'static str {
        "Timer"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        if world.get::<Timer>(entity).is_some() {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
        self.pending
            .borrow_mut()
            .retain(|started| started.entity != entity);
    }

    fn subscribe(&mut self, bus: &MessageBus) {
        let pending = Rc::clone(&self.pending);
        self.tokens
            .push(bus.subscribe::<TimerStarted>(move |started, _| {
                pending.borrow_mut().push(*started);
            }));
    }

    fn unsubscribe(&mut self, bus: &MessageBus) {
        unsubscribe_all(bus, &mut self.tokens);
    }

    fn update(&mut self, world: &mut World, bus: &MessageBus) {
        self.attach_pending(world);

        let dt = delta_seconds(world);
        for entity in self.entities.iter() {
            if !is_active(world, entity) {
                continue;
            }
            let Some(mut timer) = world.get_mut::<Timer>(entity) else {
                continue;
            };
            if timer.tick(dt) {
                info!("level time is up");
                bus.publish(NextLevel);
            }
        }
    }

    fn draw(&self, world: &World, out: &mut DrawList) {
        for entity in self.entities.iter() {
            if !is_active(world, entity) {
                continue;
            }
            if let Some(timer) = world.get::<Timer>(entity) {
                out.push(DrawItem::Text {
                    position: timer.position,
                    text: timer.text(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitystore::spawn_entity;
    use crate::math::Vector2;
    use crate::resources::worldtime::WorldTime;

    fn world_with_delta(delta: f32) -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta,
            ..WorldTime::default()
        });
        world
    }

    #[test]
    fn started_timer_counts_down_to_next_level() {
        let mut world = world_with_delta(1.0);
        let e = spawn_entity(&mut world, true);

        let bus = MessageBus::new();
        let requests = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&requests);
        bus.subscribe::<NextLevel>(move |_, _| *sink.borrow_mut() += 1);

        let mut system = TimerSystem::new();
        system.subscribe(&bus);
        bus.publish(TimerStarted {
            entity: e,
            seconds: 3.0,
            position: Vector2::new(600.0, 10.0),
        });

        for _ in 0..2 {
            system.update(&mut world, &bus);
        }
        assert_eq!(*requests.borrow(), 0);
        let mut out = DrawList::new();
        system.draw(&world, &mut out);
        assert_eq!(out.texts().collect::<Vec<_>>(), vec!["00:01"]);

        system.update(&mut world, &bus);
        assert_eq!(*requests.borrow(), 1);
        system.update(&mut world, &bus);
        assert_eq!(*requests.borrow(), 1);
    }

    #[test]
    fn inactive_timer_is_frozen_and_hidden() {
        let mut world = world_with_delta(10.0);
        let e = spawn_entity(&mut world, false);
        let bus = MessageBus::new();
        let mut system = TimerSystem::new();
        system.subscribe(&bus);
        bus.publish(TimerStarted {
            entity: e,
            seconds: 188.0,
            position: Vector2::ZERO,
        });

        system.update(&mut world, &bus);
        assert_eq!(world.get::<Timer>(e).map(|t| t.remaining), Some(188.0));
        let mut out = DrawList::new();
        system.draw(&world, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn unsubscribed_system_ignores_new_timers() {
        let mut world = world_with_delta(1.0);
        let e = spawn_entity(&mut world, true);
        let bus = MessageBus::new();
        let mut system = TimerSystem::new();
        system.subscribe(&bus);
        system.unsubscribe(&bus);
        bus.publish(TimerStarted {
            entity: e,
            seconds: 5.0,
            position: Vector2::ZERO,
        });
        system.update(&mut world, &bus);
        assert!(world.get::<Timer>(e).is_none());
    }
}
