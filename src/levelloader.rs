//! Level object spawning.
//!
//! Turns the object descriptors of a level into entities through the
//! [`factory`](crate::factory), in file order. Property values are strings;
//! missing ones take their defaults and malformed ones are reported with
//! `warn!` and then take their defaults too.
//!
//! | kind           | properties (default)                                  |
//! |----------------|-------------------------------------------------------|
//! | `player`       | none                                                  |
//! | `regularEnemy` | `left` (40), `right` (40), `direction` (`1` = right)  |
//! | `fruit`        | `fruitType` (`apple`)                                 |
//! | `timer`        | `time` seconds (188), `active` (true)                 |
//! | `portal`       | none                                                  |
//!
//! Unknown kinds are skipped with a warning.

use bevy_ecs::prelude::*;
use log::warn;
use std::str::FromStr;

use crate::components::state::InteractionState;
use crate::events::bus::MessageBus;
use crate::factory::{
    create_fruit, create_player, create_portal, create_regular_enemy, create_timer,
    DEFAULT_RESPAWN_SECONDS,
};
use crate::math::Vector2;
use crate::resources::levelstore::ObjectDescriptor;

pub const DEFAULT_PATROL_RANGE: i32 = 40;
pub const DEFAULT_FRUIT_TYPE: &str = "apple";
pub const DEFAULT_TIMER_SECONDS: i32 = 188;

fn property<T: FromStr>(object: &ObjectDescriptor, key: &str, default: T) -> T {
    let Some(raw) = object.properties.get(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "{} at ({}, {}): malformed '{}' value {:?}, using default",
                object.kind, object.x, object.y, key, raw
            );
            default
        }
    }
}

fn flag(object: &ObjectDescriptor, key: &str, default: bool) -> bool {
    let Some(raw) = object.properties.get(key) else {
        return default;
    };
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        true
    } else if raw.eq_ignore_ascii_case("false") {
        false
    } else {
        warn!(
            "{} at ({}, {}): malformed '{}' flag {:?}, using default",
            object.kind, object.x, object.y, key, raw
        );
        default
    }
}

fn spawn_enemy(world: &mut World, bus: &MessageBus, object: &ObjectDescriptor) -> Entity {
    let left = property(object, "left", DEFAULT_PATROL_RANGE);
    let right = property(object, "right", DEFAULT_PATROL_RANGE);
    let direction = if property(object, "direction", 0) == 1 {
        InteractionState::WalkRight
    } else {
        InteractionState::WalkLeft
    };
    create_regular_enemy(
        world,
        bus,
        Vector2::new(object.x, object.y),
        (left as f32, right as f32),
        direction,
        DEFAULT_RESPAWN_SECONDS,
    )
}

fn spawn_fruit(world: &mut World, bus: &MessageBus, object: &ObjectDescriptor) -> Entity {
    let fruit_type = object
        .properties
        .get("fruitType")
        .map(String::as_str)
        .unwrap_or(DEFAULT_FRUIT_TYPE);
    create_fruit(
        world,
        bus,
        Vector2::new(object.x, object.y),
        fruit_type,
        DEFAULT_RESPAWN_SECONDS,
    )
}

fn spawn_timer(world: &mut World, bus: &MessageBus, object: &ObjectDescriptor) -> Entity {
    let seconds = property(object, "time", DEFAULT_TIMER_SECONDS);
    let active = flag(object, "active", true);
    create_timer(
        world,
        bus,
        Vector2::new(object.x, object.y),
        seconds as f32,
        active,
    )
}

/// Spawn one object. Returns `None` for unknown kinds.
pub fn spawn_object(
    world: &mut World,
    bus: &MessageBus,
    object: &ObjectDescriptor,
) -> Option<Entity> {
    let position = Vector2::new(object.x, object.y);
    match object.kind.as_str() {
        "player" => Some(create_player(world, bus, position)),
        "regularEnemy" => Some(spawn_enemy(world, bus, object)),
        "fruit" => Some(spawn_fruit(world, bus, object)),
        "timer" => Some(spawn_timer(world, bus, object)),
        "portal" => Some(create_portal(world, bus, position)),
        other => {
            warn!("unknown level object kind {other:?} at ({}, {})", object.x, object.y);
            None
        }
    }
}

/// Spawn every object in order and return the entities created.
pub fn spawn_level_objects(
    world: &mut World,
    bus: &MessageBus,
    objects: &[ObjectDescriptor],
) -> Vec<Entity> {
    objects
        .iter()
        .filter_map(|object| spawn_object(world, bus, object))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::active::Active;
    use crate::components::patrol::Patrol;
    use crate::components::state::EntityState;
    use crate::events::timer::TimerStarted;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn enemy_defaults_and_overrides() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let objects = vec![
            ObjectDescriptor::new("regularEnemy", 100.0, 0.0),
            ObjectDescriptor::new("regularEnemy", 100.0, 0.0)
                .with_property("left", "10")
                .with_property("right", "oops")
                .with_property("direction", "1"),
        ];
        let spawned = spawn_level_objects(&mut world, &bus, &objects);
        assert_eq!(spawned.len(), 2);

        let patrol = world.get::<Patrol>(spawned[0]).copied().unwrap();
        assert_eq!(patrol.bounds(), (60.0, 140.0));
        let state = world.get::<EntityState>(spawned[0]).cloned().unwrap();
        assert_eq!(state.default_state(), InteractionState::WalkLeft);

        let patrol = world.get::<Patrol>(spawned[1]).copied().unwrap();
        assert_eq!(patrol.bounds(), (90.0, 140.0));
        let state = world.get::<EntityState>(spawned[1]).cloned().unwrap();
        assert_eq!(state.default_state(), InteractionState::WalkRight);
    }

    #[test]
    fn direction_other_than_one_walks_left() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let object = ObjectDescriptor::new("regularEnemy", 0.0, 0.0).with_property("direction", "-1");
        let enemy = spawn_object(&mut world, &bus, &object).unwrap();
        let state = world.get::<EntityState>(enemy).cloned().unwrap();
        assert_eq!(state.default_state(), InteractionState::WalkLeft);
    }

    #[test]
    fn timer_defaults() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let started = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&started);
        bus.subscribe::<TimerStarted>(move |m, _| sink.borrow_mut().push(*m));

        let objects = vec![
            ObjectDescriptor::new("timer", 600.0, 8.0),
            ObjectDescriptor::new("timer", 600.0, 8.0)
                .with_property("time", "30")
                .with_property("active", "False"),
            ObjectDescriptor::new("timer", 600.0, 8.0)
                .with_property("time", "soon")
                .with_property("active", "maybe"),
        ];
        let spawned = spawn_level_objects(&mut world, &bus, &objects);

        let seconds: Vec<f32> = started.borrow().iter().map(|m| m.seconds).collect();
        assert_eq!(seconds, vec![188.0, 30.0, 188.0]);
        let active: Vec<bool> = spawned
            .iter()
            .map(|e| world.get::<Active>(*e).is_some_and(|a| a.0))
            .collect();
        assert_eq!(active, vec![true, false, true]);
    }

    #[test]
    fn unknown_kinds_are_skipped() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let objects = vec![
            ObjectDescriptor::new("background", 0.0, 0.0),
            ObjectDescriptor::new("player", 10.0, 10.0),
            ObjectDescriptor::new("fruit", 20.0, 10.0),
            ObjectDescriptor::new("portal", 30.0, 10.0),
        ];
        let spawned = spawn_level_objects(&mut world, &bus, &objects);
        assert_eq!(spawned.len(), 3);
        let mut all = world.query::<&Active>();
        assert_eq!(all.iter(&world).count(), 3);
    }
}
