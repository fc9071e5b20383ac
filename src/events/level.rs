//! Level transition requests.
//!
//! Any system may publish these. The world honours the first request of a
//! tick and performs the transition at the start of the next one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NextLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviousLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadLevel;

/// The transition a tick ended up requesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Next,
    Previous,
    Reload,
}
