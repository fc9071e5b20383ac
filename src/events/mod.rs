//! Message bus and the message types exchanged across systems.
//!
//! Systems never call each other. They publish messages on the
//! [`MessageBus`](bus::MessageBus) and react to the ones they subscribe to.
//!
//! Submodules:
//! - [`bus`] – synchronous, typed publish/subscribe with subscription tokens
//! - [`level`] – next/previous/reload level requests
//! - [`lifecycle`] – entity created/destroyed/died/reappeared notifications
//! - [`timer`] – level countdown start
pub mod bus;
pub mod level;
pub mod lifecycle;
pub mod timer;
