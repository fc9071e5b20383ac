//! Backend-agnostic draw output.
//!
//! Systems do not draw. Their `draw` capability appends [`DrawItem`]s to a
//! [`DrawList`] that a host renderer consumes after the tick.

use bevy_ecs::prelude::Entity;

use crate::components::state::AnimationId;
use crate::math::{Rect, Vector2};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// One animation frame of an entity.
    Sprite {
        entity: Entity,
        position: Vector2,
        /// 1 = as drawn, -1 = mirrored horizontally.
        direction: i32,
        animation: AnimationId,
        sprite_key: String,
        frame: usize,
    },
    /// Outline of an obstacle or a collision box. Debug overlay only.
    DebugBox { rect: Rect },
    /// Text anchored at its top-left corner.
    Text { position: Vector2, text: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sprites(&self) -> impl Iterator<Item = &DrawItem> {
        self.items
            .iter()
            .filter(|item| matches!(item, DrawItem::Sprite { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn debug_boxes(&self) -> impl Iterator<Item = &Rect> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::DebugBox { rect } => Some(rect),
            _ => None,
        })
    }
}
