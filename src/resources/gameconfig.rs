//! Game configuration resource.
//!
//! Holds every tunable constant of the simulation, loaded from an INI file.
//! Compiled-in defaults reproduce the reference tuning, so a missing file or a
//! missing key is never fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity = 1700
//! jump_speed = -500
//! walk_speed = 80
//! stomp_knockback_x = -50
//! stomp_knockback_y = 300
//! enemy_death_velocity_y = -20
//! enemy_death_gravity = 100
//!
//! [playfield]
//! width = 640
//! height = 368
//!
//! [timing]
//! physics_fps = 60
//! animation_fps = 20
//! max_steps_per_advance = 5
//!
//! [debug]
//! collision_boxes = false
//! entity_messages = false
//! animation_messages = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_GRAVITY: f32 = 1700.0;
const DEFAULT_JUMP_SPEED: f32 = -500.0;
const DEFAULT_WALK_SPEED: f32 = 80.0;
const DEFAULT_STOMP_KNOCKBACK_X: f32 = -50.0;
const DEFAULT_STOMP_KNOCKBACK_Y: f32 = 300.0;
const DEFAULT_ENEMY_DEATH_VELOCITY_Y: f32 = -20.0;
const DEFAULT_ENEMY_DEATH_GRAVITY: f32 = 100.0;
const DEFAULT_PLAYFIELD_WIDTH: f32 = 640.0;
const DEFAULT_PLAYFIELD_HEIGHT: f32 = 368.0;
const DEFAULT_PHYSICS_FPS: u32 = 60;
const DEFAULT_ANIMATION_FPS: f32 = 20.0;
const DEFAULT_MAX_STEPS_PER_ADVANCE: u32 = 5;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Forces and speeds, in world units per second (squared for accelerations).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Vertical velocity set by a jump or double jump. Negative is up.
    pub jump_speed: f32,
    /// Horizontal speed added per tick while walking, and the air-speed clamp.
    pub walk_speed: f32,
    /// Horizontal bounce after a stomp, multiplied by the facing direction.
    pub stomp_knockback_x: f32,
    /// Subtracted from the vertical velocity after a stomp.
    pub stomp_knockback_y: f32,
    pub enemy_death_velocity_y: f32,
    pub enemy_death_gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            jump_speed: DEFAULT_JUMP_SPEED,
            walk_speed: DEFAULT_WALK_SPEED,
            stomp_knockback_x: DEFAULT_STOMP_KNOCKBACK_X,
            stomp_knockback_y: DEFAULT_STOMP_KNOCKBACK_Y,
            enemy_death_velocity_y: DEFAULT_ENEMY_DEATH_VELOCITY_Y,
            enemy_death_gravity: DEFAULT_ENEMY_DEATH_GRAVITY,
        }
    }
}

/// Size of the level area. Falling below `height` reloads the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAYFIELD_WIDTH,
            height: DEFAULT_PLAYFIELD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    pub physics_fps: u32,
    pub animation_fps: f32,
    /// Upper bound on fixed steps run by one call to `GameWorld::advance`.
    pub max_steps_per_advance: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            physics_fps: DEFAULT_PHYSICS_FPS,
            animation_fps: DEFAULT_ANIMATION_FPS,
            max_steps_per_advance: DEFAULT_MAX_STEPS_PER_ADVANCE,
        }
    }
}

impl TimingConfig {
    /// Length of one fixed step in seconds.
    pub fn fixed_step(&self) -> f32 {
        1.0 / self.physics_fps.max(1) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DebugConfig {
    /// Draw obstacle and collision boxes.
    pub collision_boxes: bool,
    /// Log duplicate/missing component diagnostics.
    pub entity_messages: bool,
    /// Log animation clip switches.
    pub animation_messages: bool,
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub playfield: PlayfieldConfig,
    pub timing: TimingConfig,
    pub debug: DebugConfig,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(value) = config.getfloat(section, key).ok().flatten() {
        *target = value as f32;
    }
}

fn read_u32(config: &Ini, section: &str, key: &str, target: &mut u32) {
    let value = config.getuint(section, key).ok().flatten();
    if let Some(value) = value.and_then(|v| u32::try_from(v).ok()) {
        *target = value;
    }
}

fn read_bool(config: &Ini, section: &str, key: &str, target: &mut bool) {
    if let Some(value) = config.getbool(section, key).ok().flatten() {
        *target = value;
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            playfield: PlayfieldConfig::default(),
            timing: TimingConfig::default(),
            debug: DebugConfig::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or malformed values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [physics] section
        let physics = &mut self.physics;
        read_f32(&config, "physics", "gravity", &mut physics.gravity);
        read_f32(&config, "physics", "jump_speed", &mut physics.jump_speed);
        read_f32(&config, "physics", "walk_speed", &mut physics.walk_speed);
        read_f32(
            &config,
            "physics",
            "stomp_knockback_x",
            &mut physics.stomp_knockback_x,
        );
        read_f32(
            &config,
            "physics",
            "stomp_knockback_y",
            &mut physics.stomp_knockback_y,
        );
        read_f32(
            &config,
            "physics",
            "enemy_death_velocity_y",
            &mut physics.enemy_death_velocity_y,
        );
        read_f32(
            &config,
            "physics",
            "enemy_death_gravity",
            &mut physics.enemy_death_gravity,
        );

        // [playfield] section
        read_f32(&config, "playfield", "width", &mut self.playfield.width);
        read_f32(&config, "playfield", "height", &mut self.playfield.height);

        // [timing] section
        read_u32(&config, "timing", "physics_fps", &mut self.timing.physics_fps);
        read_f32(
            &config,
            "timing",
            "animation_fps",
            &mut self.timing.animation_fps,
        );
        read_u32(
            &config,
            "timing",
            "max_steps_per_advance",
            &mut self.timing.max_steps_per_advance,
        );

        // [debug] section
        read_bool(
            &config,
            "debug",
            "collision_boxes",
            &mut self.debug.collision_boxes,
        );
        read_bool(
            &config,
            "debug",
            "entity_messages",
            &mut self.debug.entity_messages,
        );
        read_bool(
            &config,
            "debug",
            "animation_messages",
            &mut self.debug.animation_messages,
        );

        info!(
            "Loaded config: gravity={}, jump={}, walk={}, playfield {}x{}, physics fps={}",
            self.physics.gravity,
            self.physics.jump_speed,
            self.physics.walk_speed,
            self.playfield.width,
            self.playfield.height,
            self.timing.physics_fps
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [physics] section
        let physics = &self.physics;
        config.set("physics", "gravity", Some(physics.gravity.to_string()));
        config.set("physics", "jump_speed", Some(physics.jump_speed.to_string()));
        config.set("physics", "walk_speed", Some(physics.walk_speed.to_string()));
        config.set(
            "physics",
            "stomp_knockback_x",
            Some(physics.stomp_knockback_x.to_string()),
        );
        config.set(
            "physics",
            "stomp_knockback_y",
            Some(physics.stomp_knockback_y.to_string()),
        );
        config.set(
            "physics",
            "enemy_death_velocity_y",
            Some(physics.enemy_death_velocity_y.to_string()),
        );
        config.set(
            "physics",
            "enemy_death_gravity",
            Some(physics.enemy_death_gravity.to_string()),
        );

        // [playfield] section
        config.set("playfield", "width", Some(self.playfield.width.to_string()));
        config.set("playfield", "height", Some(self.playfield.height.to_string()));

        // [timing] section
        config.set(
            "timing",
            "physics_fps",
            Some(self.timing.physics_fps.to_string()),
        );
        config.set(
            "timing",
            "animation_fps",
            Some(self.timing.animation_fps.to_string()),
        );
        config.set(
            "timing",
            "max_steps_per_advance",
            Some(self.timing.max_steps_per_advance.to_string()),
        );

        // [debug] section
        config.set(
            "debug",
            "collision_boxes",
            Some(self.debug.collision_boxes.to_string()),
        );
        config.set(
            "debug",
            "entity_messages",
            Some(self.debug.entity_messages.to_string()),
        );
        config.set(
            "debug",
            "animation_messages",
            Some(self.debug.animation_messages.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
