//! Entity factory.
//!
//! Each `create_*` function assembles one fully formed entity in the world
//! through the [`entitystore`](crate::entitystore) API and announces it on
//! the bus. Regular entities are announced with [`EntityCreated`], which the
//! game world turns into a registration with every system at the next tick
//! boundary. Timers are announced with [`TimerStarted`] only.
//!
//! Box sizes, insets and frame counts describe the sprite sheets of the
//! bundled art: 32x32 frames for fruits and portals, 32px wide strips for the
//! player and the masked enemy.

use bevy_ecs::prelude::*;

use crate::components::animation::{Animation, AnimationClip};
use crate::components::boxcollider::{BoxCollider, BoxInsets};
use crate::components::entitytype::EntityType;
use crate::components::inputcontrolled::InputControlled;
use crate::components::movement::Movement;
use crate::components::patrol::Patrol;
use crate::components::respawn::Respawn;
use crate::components::state::{AnimationId, EntityState, InteractionState, SuperState};
use crate::entitystore::{add_component, spawn_entity};
use crate::events::bus::MessageBus;
use crate::events::lifecycle::EntityCreated;
use crate::events::timer::TimerStarted;
use crate::math::Vector2;
use crate::resources::gameconfig::{GameConfig, PlayfieldConfig, TimingConfig};

/// Seconds between the death of a fruit or enemy and its reappearance.
pub const DEFAULT_RESPAWN_SECONDS: f32 = 5.0;

const APPEAR_SPRITE: &str = "fruits/collected";

fn settings(world: &World) -> (TimingConfig, PlayfieldConfig) {
    world
        .get_resource::<GameConfig>()
        .map(|config| (config.timing, config.playfield))
        .unwrap_or_default()
}

fn collider(
    world: &World,
    size: (f32, f32),
    insets: BoxInsets,
    position: Vector2,
    direction: i32,
) -> BoxCollider {
    let (_, playfield) = settings(world);
    BoxCollider::new(size.0, size.1)
        .with_insets(insets)
        .with_playfield(playfield.width, playfield.height)
        .at(position, direction)
}

fn clip(world: &World, sprite_key: &str, frames: usize, looped: bool) -> AnimationClip {
    let (timing, _) = settings(world);
    AnimationClip::new(sprite_key, frames, timing.animation_fps, looped)
}

/// The controllable hero. Starts appearing, then falls until it lands.
pub fn create_player(world: &mut World, bus: &MessageBus, position: Vector2) -> Entity {
    let animation = Animation::new(AnimationId::Idle)
        .with_clip(AnimationId::Idle, clip(world, "player/idle", 11, true))
        .with_clip(AnimationId::Walk, clip(world, "player/run", 5, true))
        .with_clip(AnimationId::Jump, clip(world, "player/jump", 1, true))
        .with_clip(AnimationId::DoubleJump, clip(world, "player/double_jump", 1, true))
        .with_clip(AnimationId::Fall, clip(world, "player/fall", 1, true))
        .with_clip(AnimationId::Slide, clip(world, "player/wall_jump", 1, true))
        .with_clip(AnimationId::Death, clip(world, "player/hit", 4, false))
        .with_clip(AnimationId::Appear, clip(world, APPEAR_SPRITE, 6, false));
    let state = EntityState::new(InteractionState::Idle, SuperState::Falling);
    let collider = collider(
        world,
        (32.0, 16.0),
        BoxInsets::new(8.0, -6.0, 4.0, 6.0),
        position,
        state.direction(),
    );

    let player = spawn_entity(world, true);
    add_component(world, player, EntityType::Player);
    add_component(world, player, animation);
    add_component(world, player, state);
    add_component(world, player, InputControlled::default());
    add_component(world, player, Movement::new(position));
    add_component(world, player, collider);

    bus.publish(EntityCreated { entity: player });
    player
}

/// A collectible fruit. `fruit_type` selects the idle sprite sheet.
pub fn create_fruit(
    world: &mut World,
    bus: &MessageBus,
    position: Vector2,
    fruit_type: &str,
    respawn_seconds: f32,
) -> Entity {
    let idle_sprite = format!("fruits/{fruit_type}");
    let animation = Animation::new(AnimationId::Idle)
        .with_clip(AnimationId::Idle, clip(world, &idle_sprite, 17, true))
        .with_clip(AnimationId::Death, clip(world, APPEAR_SPRITE, 6, false))
        .with_clip(AnimationId::Appear, clip(world, APPEAR_SPRITE, 6, false));
    let state = EntityState::new(InteractionState::Idle, SuperState::OnGround);
    let collider = collider(
        world,
        (32.0, 32.0),
        BoxInsets::new(7.0, 11.0, 10.0, 10.0),
        position,
        state.direction(),
    );

    let fruit = spawn_entity(world, true);
    add_component(world, fruit, EntityType::Coin);
    add_component(world, fruit, animation);
    add_component(world, fruit, state);
    add_component(world, fruit, Movement::new(position));
    add_component(world, fruit, collider);
    add_component(world, fruit, Respawn::new(position, respawn_seconds));

    bus.publish(EntityCreated { entity: fruit });
    fruit
}

/// A patrolling enemy walking `left`/`right` units around its spawn point.
///
/// `initial_direction` is the walk state it settles into after appearing.
pub fn create_regular_enemy(
    world: &mut World,
    bus: &MessageBus,
    position: Vector2,
    (left, right): (f32, f32),
    initial_direction: InteractionState,
    respawn_seconds: f32,
) -> Entity {
    let animation = Animation::new(AnimationId::Walk)
        .with_clip(AnimationId::Walk, clip(world, "masked/run", 9, true))
        .with_clip(AnimationId::Death, clip(world, "masked/hit", 4, false))
        .with_clip(AnimationId::Appear, clip(world, APPEAR_SPRITE, 6, false));
    let state = EntityState::new(initial_direction, SuperState::Falling);
    let collider = collider(
        world,
        (32.0, 16.0),
        BoxInsets::new(8.0, -8.0, 4.0, 6.0),
        position,
        state.direction(),
    );

    let enemy = spawn_entity(world, true);
    add_component(world, enemy, EntityType::RegularEnemy);
    add_component(world, enemy, animation);
    add_component(world, enemy, state);
    add_component(world, enemy, Patrol::new(position.x, left, right));
    add_component(world, enemy, Movement::new(position));
    add_component(world, enemy, collider);
    add_component(world, enemy, Respawn::new(position, respawn_seconds));

    bus.publish(EntityCreated { entity: enemy });
    enemy
}

/// The level exit. Touching it advances to the next level.
pub fn create_portal(world: &mut World, bus: &MessageBus, position: Vector2) -> Entity {
    let animation =
        Animation::new(AnimationId::Idle).with_clip(AnimationId::Idle, clip(world, "portal/idle", 1, true));
    let state = EntityState::new(InteractionState::Idle, SuperState::OnGround);
    let collider = collider(
        world,
        (32.0, 32.0),
        BoxInsets::new(4.0, 0.0, 8.0, 8.0),
        position,
        state.direction(),
    );

    let portal = spawn_entity(world, true);
    add_component(world, portal, EntityType::PortalToNextLevel);
    add_component(world, portal, animation);
    add_component(world, portal, state);
    add_component(world, portal, Movement::new(position));
    add_component(world, portal, collider);

    bus.publish(EntityCreated { entity: portal });
    portal
}

/// A level countdown drawn at `position`. Inactive timers never run out.
pub fn create_timer(
    world: &mut World,
    bus: &MessageBus,
    position: Vector2,
    seconds: f32,
    is_active: bool,
) -> Entity {
    let timer = spawn_entity(world, is_active);
    bus.publish(TimerStarted {
        entity: timer,
        seconds,
        position,
    });
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitystore::{is_active, list_components, ComponentKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn created(bus: &MessageBus) -> Rc<RefCell<Vec<Entity>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.subscribe::<EntityCreated>(move |m, _| sink.borrow_mut().push(m.entity));
        log
    }

    #[test]
    fn player_is_fully_assembled() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let log = created(&bus);

        let player = create_player(&mut world, &bus, Vector2::new(32.0, 100.0));

        assert_eq!(*log.borrow(), vec![player]);
        let kinds = list_components(&world, player);
        for kind in [
            ComponentKind::Active,
            ComponentKind::Animation,
            ComponentKind::BoxCollider,
            ComponentKind::EntityType,
            ComponentKind::InputControlled,
            ComponentKind::Movement,
            ComponentKind::State,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?}");
        }
        assert!(!kinds.contains(&ComponentKind::Respawn));

        let rect = world.get::<BoxCollider>(player).map(|c| c.rect()).unwrap();
        assert_eq!(rect.x, 36.0);
        assert_eq!(rect.y, 108.0);
        assert_eq!(rect.width, 22.0);
        assert_eq!(rect.height, 14.0);
        let state = world.get::<EntityState>(player).cloned().unwrap();
        assert!(state.is(SuperState::Appearing));
        assert_eq!(state.default_super_state(), SuperState::Falling);
    }

    #[test]
    fn fruit_respawns_where_it_was_placed() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let fruit = create_fruit(
            &mut world,
            &bus,
            Vector2::new(10.0, 20.0),
            "orange",
            DEFAULT_RESPAWN_SECONDS,
        );
        let respawn = world.get::<Respawn>(fruit).copied().unwrap();
        assert_eq!(respawn.position, Vector2::new(10.0, 20.0));
        assert_eq!(respawn.duration, 5.0);
        let animation = world.get::<Animation>(fruit).cloned().unwrap();
        assert_eq!(
            animation.current_clip().map(|c| c.sprite_key.as_str()),
            Some("fruits/orange")
        );
        assert_eq!(world.get::<EntityType>(fruit), Some(&EntityType::Coin));
    }

    #[test]
    fn enemy_uses_direction_and_patrol_range() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let enemy = create_regular_enemy(
            &mut world,
            &bus,
            Vector2::new(200.0, 50.0),
            (40.0, 60.0),
            InteractionState::WalkRight,
            DEFAULT_RESPAWN_SECONDS,
        );
        let state = world.get::<EntityState>(enemy).cloned().unwrap();
        assert_eq!(state.default_state(), InteractionState::WalkRight);
        assert_eq!(state.default_direction(), 1);
        let patrol = world.get::<Patrol>(enemy).copied().unwrap();
        assert_eq!(patrol.bounds(), (160.0, 260.0));
    }

    #[test]
    fn timer_announces_itself_without_creation_message() {
        let mut world = World::new();
        let bus = MessageBus::new();
        let log = created(&bus);
        let started = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&started);
        bus.subscribe::<TimerStarted>(move |m, _| sink.borrow_mut().push(*m));

        let timer = create_timer(&mut world, &bus, Vector2::new(600.0, 8.0), 188.0, false);

        assert!(log.borrow().is_empty());
        assert_eq!(started.borrow().len(), 1);
        assert_eq!(started.borrow()[0].entity, timer);
        assert_eq!(started.borrow()[0].seconds, 188.0);
        assert!(!is_active(&world, timer));
    }
}
