//! End-to-end simulation tests driving a `GameWorld` through whole ticks.

use bevy_ecs::prelude::*;
use std::collections::BTreeMap;

use hopengine::components::active::Active;
use hopengine::components::boxcollider::BoxCollider;
use hopengine::components::entitytype::EntityType;
use hopengine::components::movement::Movement;
use hopengine::components::state::{EntityState, InteractionState, SuperState};
use hopengine::events::lifecycle::{EntityDestroyed, EntityDied};
use hopengine::gameworld::GameWorld;
use hopengine::math::{Rect, Vector2};
use hopengine::render::DrawItem;
use hopengine::resources::gameconfig::GameConfig;
use hopengine::resources::input::InputState;
use hopengine::resources::levelstore::{LevelData, LevelStore, ObjectDescriptor};

const STEP: f32 = 1.0 / 60.0;

fn level(solid: Vec<Rect>, float: Vec<Rect>, objects: Vec<ObjectDescriptor>) -> LevelData {
    let mut obstacles = BTreeMap::new();
    if !solid.is_empty() {
        obstacles.insert("solid".to_string(), solid);
    }
    if !float.is_empty() {
        obstacles.insert("float".to_string(), float);
    }
    LevelData {
        name: "test".to_string(),
        obstacles,
        objects,
    }
}

fn game(level: LevelData) -> GameWorld {
    GameWorld::new(GameConfig::new(), LevelStore::new(vec![level])).unwrap()
}

fn state_of(game: &GameWorld, entity: Entity) -> EntityState {
    game.world().get::<EntityState>(entity).cloned().unwrap()
}

fn position_of(game: &GameWorld, entity: Entity) -> Vector2 {
    game.world()
        .get::<Movement>(entity)
        .map(|m| m.position())
        .unwrap()
}

fn is_active(game: &GameWorld, entity: Entity) -> bool {
    game.world().get::<Active>(entity).is_some_and(|a| a.0)
}

/// Tick at `dt` until `done` holds, returning the ticks run.
fn run_until(
    game: &mut GameWorld,
    dt: f32,
    max_ticks: usize,
    mut done: impl FnMut(&mut GameWorld) -> bool,
) -> Option<usize> {
    for tick in 1..=max_ticks {
        game.update(dt).unwrap();
        if done(game) {
            return Some(tick);
        }
    }
    None
}

/// Player placed just above a floor, ticked until it stands on it.
fn grounded_player(floor: Rect, x: f32) -> (GameWorld, Entity) {
    let mut game = game(level(
        vec![floor],
        vec![],
        vec![ObjectDescriptor::new("player", x, floor.y - 30.0)],
    ));
    let player = game.player().unwrap();
    run_until(&mut game, STEP, 120, |g| {
        state_of(g, player).is(SuperState::OnGround)
    })
    .expect("player never landed");
    for _ in 0..10 {
        game.update(STEP).unwrap();
    }
    (game, player)
}

#[test]
fn player_lands_just_above_the_floor() {
    let floor = Rect::new(0.0, 200.0, 200.0, 20.0);
    let (game, player) = grounded_player(floor, 120.0);

    let state = state_of(&game, player);
    assert!(state.is(SuperState::OnGround));
    assert_eq!(state.state(), InteractionState::Idle);
    let rect = game
        .world()
        .get::<BoxCollider>(player)
        .map(|c| c.rect())
        .unwrap();
    let bottom = rect.y + rect.height;
    assert!(bottom <= 200.0 && bottom > 199.5, "bottom {bottom}");
}

#[test]
fn walking_left_covers_walk_speed_per_second() {
    let floor = Rect::new(0.0, 200.0, 200.0, 20.0);
    let (mut game, player) = grounded_player(floor, 120.0);
    let start = position_of(&game, player);

    game.set_input(InputState::new(true, false, false));
    for _ in 0..60 {
        game.update(STEP).unwrap();
    }

    let end = position_of(&game, player);
    assert!((start.x - end.x - 80.0).abs() < 0.05, "moved {}", start.x - end.x);
    assert!((start.y - end.y).abs() < 1e-3);
    let state = state_of(&game, player);
    assert!(state.is(SuperState::OnGround));
    assert_eq!(state.direction(), -1);
    assert_eq!(state.state(), InteractionState::WalkLeft);
}

#[test]
fn held_jump_gives_one_jump_and_one_double_jump() {
    let floor = Rect::new(0.0, 300.0, 640.0, 20.0);
    let (mut game, player) = grounded_player(floor, 100.0);

    game.set_input(InputState::new(false, false, true));
    let mut launches = Vec::new();
    let mut previous = SuperState::OnGround;
    let mut airborne = false;
    for _ in 0..600 {
        game.update(STEP).unwrap();
        let current = state_of(&game, player).super_state();
        if current != previous
            && matches!(current, SuperState::Jumping | SuperState::DoubleJumping)
        {
            launches.push(current);
        }
        airborne |= current != SuperState::OnGround;
        previous = current;
        if airborne && current == SuperState::OnGround {
            break;
        }
    }

    assert!(airborne);
    assert_eq!(previous, SuperState::OnGround);
    assert_eq!(launches, vec![SuperState::Jumping, SuperState::DoubleJumping]);
}

#[test]
fn float_platforms_carry_but_never_block() {
    let float = Rect::new(100.0, 150.0, 200.0, 30.0);
    let floor = Rect::new(0.0, 300.0, 640.0, 40.0);
    let mut game = game(level(
        vec![floor],
        vec![float],
        vec![ObjectDescriptor::new("player", 60.0, 140.0)],
    ));
    let player = game.player().unwrap();
    game.set_input(InputState::new(false, true, false));

    run_until(&mut game, STEP, 240, |g| {
        let state = state_of(g, player);
        state.is(SuperState::OnGround) && position_of(g, player).y > 200.0
    })
    .expect("player never reached the solid floor");

    let position = position_of(&game, player);
    assert!(position.x > 80.0, "blocked at {}", position.x);
    assert!(state_of(&game, player).can_move_right());
}

#[test]
fn player_rests_on_a_float_platform() {
    let float = Rect::new(0.0, 200.0, 200.0, 20.0);
    let mut game = game(level(
        vec![],
        vec![float],
        vec![ObjectDescriptor::new("player", 80.0, 170.0)],
    ));
    let player = game.player().unwrap();

    run_until(&mut game, STEP, 120, |g| {
        state_of(g, player).is(SuperState::OnGround)
    })
    .expect("player fell through the float platform");
    for _ in 0..30 {
        game.update(STEP).unwrap();
    }
    assert!(state_of(&game, player).is(SuperState::OnGround));
    assert!(position_of(&game, player).y < 200.0);
}

#[test]
fn fruit_respawns_after_five_seconds() {
    let floor = Rect::new(0.0, 200.0, 640.0, 20.0);
    let mut game = game(level(
        vec![floor],
        vec![],
        vec![ObjectDescriptor::new("fruit", 300.0, 160.0)],
    ));
    let fruit = game.snapshot()[0].entity;

    run_until(&mut game, 0.25, 8, |g| {
        state_of(g, fruit).is(SuperState::OnGround)
    })
    .expect("fruit never finished appearing");

    if let Some(mut movement) = game.world_mut().get_mut::<Movement>(fruit) {
        movement.set_position(Vector2::new(400.0, 100.0));
    }
    if let Some(mut state) = game.world_mut().get_mut::<EntityState>(fruit) {
        state.set_super_state(SuperState::Dead);
    }
    game.bus().publish(EntityDied { entity: fruit });

    run_until(&mut game, 0.25, 4, |g| !is_active(g, fruit)).expect("fruit never deactivated");

    for tick in 1..20 {
        game.update(0.25).unwrap();
        assert!(!is_active(&game, fruit), "reactivated after {tick} ticks");
        if tick == 10 {
            game.bus().publish(EntityDied { entity: fruit });
        }
    }
    game.update(0.25).unwrap();
    assert!(is_active(&game, fruit));
    assert!(state_of(&game, fruit).is(SuperState::Appearing));
    assert_eq!(position_of(&game, fruit), Vector2::new(300.0, 160.0));

    run_until(&mut game, 0.25, 4, |g| {
        !state_of(g, fruit).is(SuperState::Appearing)
    })
    .expect("fruit never finished reappearing");
    let state = state_of(&game, fruit);
    assert!(state.is(SuperState::OnGround));
    assert_eq!(state.state(), InteractionState::Idle);
    assert_eq!(state.direction(), state.default_direction());
    assert!(state.can_move_left() && state.can_move_right());
}

#[test]
fn collecting_a_fruit_hides_it() {
    let floor = Rect::new(0.0, 200.0, 640.0, 20.0);
    let mut game = game(level(
        vec![floor],
        vec![],
        vec![
            ObjectDescriptor::new("player", 100.0, 170.0),
            ObjectDescriptor::new("fruit", 130.0, 170.0),
        ],
    ));
    let fruit = game
        .snapshot()
        .iter()
        .map(|s| s.entity)
        .find(|e| game.world().get::<EntityType>(*e) == Some(&EntityType::Coin))
        .unwrap();
    game.set_input(InputState::new(false, true, false));

    run_until(&mut game, STEP, 240, |g| !is_active(g, fruit)).expect("fruit never collected");
    assert!(game.world().get_entity(fruit).is_ok());
}

#[test]
fn stomping_an_enemy_bounces_the_player() {
    let floor = Rect::new(0.0, 300.0, 640.0, 40.0);
    let mut game = game(level(
        vec![floor],
        vec![],
        vec![
            ObjectDescriptor::new("regularEnemy", 200.0, 275.0)
                .with_property("left", "0")
                .with_property("right", "0"),
            ObjectDescriptor::new("player", 200.0, 240.0),
        ],
    ));
    let player = game.player().unwrap();
    let enemy = game
        .snapshot()
        .iter()
        .map(|s| s.entity)
        .find(|e| *e != player)
        .unwrap();

    run_until(&mut game, STEP, 120, |g| state_of(g, enemy).is(SuperState::Dead))
        .expect("enemy never stomped");
    let state = state_of(&game, player);
    assert!(!state.is(SuperState::Dead));
    assert!(state.is(SuperState::Jumping));

    run_until(&mut game, STEP, 60, |g| !is_active(g, enemy)).expect("enemy never deactivated");
    assert!(!state_of(&game, player).is(SuperState::Dead));
}

#[test]
fn enemy_touching_the_player_reloads_the_level() {
    let floor = Rect::new(0.0, 200.0, 640.0, 20.0);
    let mut game = game(level(
        vec![floor],
        vec![],
        vec![
            ObjectDescriptor::new("player", 100.0, 177.0),
            ObjectDescriptor::new("regularEnemy", 160.0, 175.0).with_property("left", "100"),
        ],
    ));
    let player = game.player().unwrap();

    run_until(&mut game, STEP, 300, |g| state_of(g, player).is(SuperState::Dead))
        .expect("player never killed");
    run_until(&mut game, STEP, 120, |g| g.player() != Some(player))
        .expect("level never reloaded");

    assert_eq!(game.current_level(), 0);
    let fresh = game.player().unwrap();
    assert!(state_of(&game, fresh).is(SuperState::Appearing));
    assert_eq!(position_of(&game, fresh), Vector2::new(100.0, 177.0));
}

#[test]
fn falling_out_of_the_playfield_reloads_the_level() {
    let mut game = game(level(
        vec![],
        vec![],
        vec![ObjectDescriptor::new("player", 100.0, 100.0)],
    ));
    let player = game.player().unwrap();

    run_until(&mut game, STEP, 240, |g| g.player() != Some(player))
        .expect("level never reloaded");
    let fresh = game.player().unwrap();
    assert_eq!(position_of(&game, fresh), Vector2::new(100.0, 100.0));
}

#[test]
fn spawned_entities_join_at_the_next_tick() {
    let floor = Rect::new(0.0, 200.0, 640.0, 20.0);
    let mut game = game(level(vec![floor], vec![], vec![]));
    let fruit = game
        .spawn(&ObjectDescriptor::new("fruit", 50.0, 160.0))
        .unwrap();

    let has_sprite = |game: &GameWorld| {
        game.draw().items.iter().any(|item| {
            matches!(item, DrawItem::Sprite { entity, .. } if *entity == fruit)
        })
    };
    assert!(!has_sprite(&game));
    game.update(STEP).unwrap();
    assert!(has_sprite(&game));
}

#[test]
fn destroyed_entities_leave_at_the_end_of_the_tick() {
    let floor = Rect::new(0.0, 200.0, 640.0, 20.0);
    let (mut game, player) = grounded_player(floor, 100.0);

    game.bus().publish(EntityDestroyed { entity: player });
    assert!(game.world().get_entity(player).is_ok());
    game.update(STEP).unwrap();
    assert!(game.world().get_entity(player).is_err());
    assert!(game.player().is_none());
    game.update(STEP).unwrap();
}

#[test]
fn collision_boxes_follow_position_and_facing() {
    let floor = Rect::new(0.0, 300.0, 640.0, 40.0);
    let mut game = game(level(
        vec![floor, Rect::new(400.0, 220.0, 40.0, 80.0)],
        vec![Rect::new(150.0, 240.0, 80.0, 10.0)],
        vec![
            ObjectDescriptor::new("player", 100.0, 250.0),
            ObjectDescriptor::new("regularEnemy", 300.0, 270.0),
            ObjectDescriptor::new("regularEnemy", 500.0, 270.0).with_property("direction", "1"),
            ObjectDescriptor::new("fruit", 200.0, 200.0),
            ObjectDescriptor::new("portal", 600.0, 260.0),
        ],
    ));
    game.set_input(InputState::new(false, true, true));

    for _ in 0..180 {
        game.update(STEP).unwrap();
        let mut query = game
            .world_mut()
            .query::<(&Active, &EntityState, &Movement, &BoxCollider)>();
        for (active, state, movement, collider) in query.iter(game.world()) {
            if !active.0 {
                continue;
            }
            let insets = collider.insets();
            let position = movement.position();
            let expected_x = if state.direction() < 0 {
                position.x + insets.right
            } else {
                position.x + insets.left
            };
            let rect = collider.rect();
            assert!((rect.x - expected_x).abs() < 1e-3);
            assert!((rect.y - (position.y + insets.top)).abs() < 1e-3);
        }
    }
}
