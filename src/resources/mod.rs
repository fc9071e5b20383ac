//! Resources shared by the systems of a level.
//!
//! Resources live in the ECS world next to the entities. Each submodule
//! documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `debugmode` – presence enables the collision debug overlay
//! - `gameconfig` – physics, playfield, timing and debug tuning loaded from INI
//! - `input` – left/right/jump intents supplied by the host
//! - `levelstore` – level data format, loading and the ordered level registry
//! - `obstacles` – static solid/float rectangles of the current level (level data, not a world resource)
//! - `worldtime` – simulation time and delta
pub mod debugmode;
pub mod gameconfig;
pub mod input;
pub mod levelstore;
pub mod obstacles;
pub mod worldtime;
