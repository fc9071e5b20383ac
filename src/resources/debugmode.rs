//! Debug toggle resource.
//!
//! The mere presence of this resource enables the collision debug overlay:
//! obstacle rectangles and entity collision boxes are added to the draw list.
//! Remove it to disable debug behavior.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, systems may draw overlays or print extra logs.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode {}
