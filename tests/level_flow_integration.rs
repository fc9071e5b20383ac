//! Level sequencing tests: loading from disk, level changes and their triggers.

use std::collections::BTreeMap;
use std::fs;

use hopengine::events::level::{LevelChange, NextLevel, PreviousLevel, ReloadLevel};
use hopengine::gameworld::GameWorld;
use hopengine::math::Rect;
use hopengine::resources::gameconfig::GameConfig;
use hopengine::resources::levelstore::{LevelData, LevelError, LevelStore, ObjectDescriptor};

const STEP: f32 = 1.0 / 60.0;

fn named(name: &str, objects: Vec<ObjectDescriptor>) -> LevelData {
    let mut obstacles = BTreeMap::new();
    obstacles.insert(
        "solid".to_string(),
        vec![Rect::new(0.0, 320.0, 640.0, 48.0)],
    );
    LevelData {
        name: name.to_string(),
        obstacles,
        objects,
    }
}

fn three_levels() -> GameWorld {
    let levels = ["a", "b", "c"]
        .iter()
        .map(|name| named(name, vec![ObjectDescriptor::new("player", 32.0, 290.0)]))
        .collect();
    GameWorld::new(GameConfig::new(), LevelStore::new(levels)).unwrap()
}

#[test]
fn levels_load_from_a_directory_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("02_second.json"),
        r#"{"objects":[{"kind":"fruit","x":100,"y":280,"properties":{"fruitType":"melon"}}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("01_first.json"),
        r#"{
            "name": "meadow",
            "obstacles": {"solid": [{"x":0,"y":320,"width":640,"height":48}]},
            "objects": [
                {"kind":"player","x":32,"y":280},
                {"kind":"cloud","x":0,"y":0},
                {"kind":"regularEnemy","x":200,"y":290,"properties":{"left":"20"}}
            ]
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a level").unwrap();

    let levels = LevelStore::load_dir(dir.path()).unwrap();
    assert_eq!(levels.len(), 2);

    let mut game = GameWorld::new(GameConfig::new(), levels).unwrap();
    assert_eq!(game.level_name(), "meadow");
    assert_eq!(game.snapshot().len(), 2);
    assert!(game.player().is_some());

    game.bus().publish(NextLevel);
    game.update(STEP).unwrap();
    assert_eq!(game.level_name(), "02_second");
    assert_eq!(game.snapshot().len(), 1);
    assert!(game.player().is_none());
}

#[test]
fn malformed_level_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("01.json"), "{ not json").unwrap();
    let error = LevelStore::load_dir(dir.path()).unwrap_err();
    assert!(matches!(error, LevelError::Parse { .. }));
}

#[test]
fn level_changes_wrap_in_both_directions() {
    let mut game = three_levels();

    game.bus().publish(PreviousLevel);
    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 2);

    game.bus().publish(NextLevel);
    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 0);

    game.bus().publish(NextLevel);
    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 1);

    let before = game.player();
    game.bus().publish(ReloadLevel);
    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 1);
    assert_eq!(game.level_name(), "b");
    assert!(game.player().is_some());
    assert_ne!(game.player(), before);
}

#[test]
fn only_the_first_request_of_a_tick_counts() {
    let mut game = three_levels();

    game.bus().publish(ReloadLevel);
    game.bus().publish(NextLevel);
    game.bus().publish(NextLevel);
    assert_eq!(game.pending_change(), Some(LevelChange::Reload));

    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 0);
    assert_eq!(game.pending_change(), None);
}

#[test]
fn requests_published_from_handlers_follow_first_wins() {
    let mut game = three_levels();
    game.bus()
        .subscribe::<NextLevel>(|_, bus| bus.publish(PreviousLevel));

    game.bus().publish(NextLevel);
    assert_eq!(game.pending_change(), Some(LevelChange::Next));
    game.update(STEP).unwrap();
    assert_eq!(game.current_level(), 1);
}

#[test]
fn timer_running_out_advances_the_level() {
    let levels = vec![
        named(
            "timed",
            vec![ObjectDescriptor::new("timer", 600.0, 8.0).with_property("time", "1")],
        ),
        named("next", vec![]),
    ];
    let mut game = GameWorld::new(GameConfig::new(), LevelStore::new(levels)).unwrap();

    for _ in 0..3 {
        game.update(0.25).unwrap();
    }
    assert_eq!(game.pending_change(), None);
    assert_eq!(game.draw().texts().collect::<Vec<_>>(), vec!["00:00"]);

    game.update(0.25).unwrap();
    assert_eq!(game.pending_change(), Some(LevelChange::Next));
    assert_eq!(game.current_level(), 0);

    game.update(0.25).unwrap();
    assert_eq!(game.current_level(), 1);
    assert!(game.draw().texts().next().is_none());
}

#[test]
fn inactive_timer_never_runs_out() {
    let levels = vec![
        named(
            "frozen",
            vec![
                ObjectDescriptor::new("timer", 600.0, 8.0)
                    .with_property("time", "1")
                    .with_property("active", "false"),
            ],
        ),
        named("next", vec![]),
    ];
    let mut game = GameWorld::new(GameConfig::new(), LevelStore::new(levels)).unwrap();
    for _ in 0..20 {
        game.update(0.25).unwrap();
    }
    assert_eq!(game.current_level(), 0);
}

#[test]
fn touching_the_portal_advances_the_level() {
    let levels = vec![
        named(
            "start",
            vec![
                ObjectDescriptor::new("portal", 100.0, 288.0),
                ObjectDescriptor::new("player", 100.0, 290.0),
            ],
        ),
        named("goal", vec![ObjectDescriptor::new("player", 32.0, 290.0)]),
    ];
    let mut game = GameWorld::new(GameConfig::new(), LevelStore::new(levels)).unwrap();

    let mut ticks = 0;
    while game.current_level() == 0 && ticks < 120 {
        game.update(STEP).unwrap();
        ticks += 1;
    }
    assert_eq!(game.level_name(), "goal");
    assert!(ticks > 1, "portal triggered while the player was appearing");
}

#[test]
fn fixed_step_advance_runs_whole_steps_only() {
    let mut game = three_levels();
    assert_eq!(game.advance(0.5 * STEP).unwrap(), 0);
    assert_eq!(game.advance(0.6 * STEP).unwrap(), 1);
    assert_eq!(game.advance(10.0).unwrap(), 5);
    assert_eq!(game.advance(0.0).unwrap(), 0);
}
