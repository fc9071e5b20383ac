//! Collision box component.
//!
//! A [`BoxCollider`] is the entity's nominal sprite size shrunk by four
//! directional insets. The left/right insets swap when the entity faces left,
//! so the box follows the visible body rather than the sprite frame.
//!
//! Besides the box itself the collider remembers two pieces of "known ground":
//! - the horizontal span of the platform currently stood on
//! - the bottom edge of the wall currently slid against
//!
//! The obstacle collision system uses them to detect walking off a ledge and
//! sliding past the end of a wall.

use bevy_ecs::prelude::Component;

use crate::math::{Rect, Vector2};

/// Amounts trimmed from each side of the nominal size. Negative values grow the box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxInsets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl BoxInsets {
    pub const fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    nominal_width: f32,
    nominal_height: f32,
    insets: BoxInsets,
    rect: Rect,
    ground_left: f32,
    ground_right: f32,
    slide_bottom: f32,
}

impl BoxCollider {
    /// Create a collider with no insets, placed at the origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            nominal_width: width,
            nominal_height: height,
            insets: BoxInsets::default(),
            rect: Rect::new(0.0, 0.0, width, height),
            ground_left: 0.0,
            ground_right: f32::MAX,
            slide_bottom: f32::MAX,
        }
    }

    /// Shrink the nominal size by `insets`.
    pub fn with_insets(mut self, insets: BoxInsets) -> Self {
        self.insets = insets;
        self.rect.width = self.nominal_width - insets.left - insets.right;
        self.rect.height = self.nominal_height - insets.top - insets.bottom;
        self
    }

    /// Initial ground span and slide surface cover the whole playfield.
    pub fn with_playfield(mut self, width: f32, height: f32) -> Self {
        self.ground_left = 0.0;
        self.ground_right = width;
        self.slide_bottom = height;
        self
    }

    /// Place the box for an entity at `position` facing `direction`.
    pub fn at(mut self, position: Vector2, direction: i32) -> Self {
        self.update_box_position(position, direction);
        self
    }

    pub fn nominal_width(&self) -> f32 {
        self.nominal_width
    }

    pub fn nominal_height(&self) -> f32 {
        self.nominal_height
    }

    pub fn insets(&self) -> BoxInsets {
        self.insets
    }

    /// Box as of the last [`update_box_position`](Self::update_box_position).
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn ground_span(&self) -> (f32, f32) {
        (self.ground_left, self.ground_right)
    }

    pub fn slide_bottom(&self) -> f32 {
        self.slide_bottom
    }

    /// Re-derive the box from the entity position and facing direction.
    pub fn update_box_position(&mut self, position: Vector2, direction: i32) {
        self.rect.x = if direction < 0 {
            position.x + self.insets.right
        } else {
            position.x + self.insets.left
        };
        self.rect.y = position.y + self.insets.top;
    }

    pub fn set_ground_location(&mut self, left: f32, right: f32) {
        self.ground_left = left;
        self.ground_right = right;
    }

    pub fn set_sliding_location(&mut self, bottom: f32) {
        self.slide_bottom = bottom;
    }

    /// True when a box at `x` facing `direction` lies completely outside the
    /// recorded ground span.
    pub fn check_if_in_air(&self, x: f32, direction: i32) -> bool {
        let (left, right) = if direction < 0 {
            (
                x + self.insets.right,
                x - self.insets.left + self.nominal_width,
            )
        } else {
            (
                x + self.insets.left,
                x - self.insets.right + self.nominal_width,
            )
        };
        right < self.ground_left || left > self.ground_right
    }

    /// True when the box top at entity `y` has dropped past the slide surface.
    pub fn check_if_below(&self, y: f32) -> bool {
        y + self.insets.top + 5.0 > self.slide_bottom
    }

    /// Entity `y` that puts the box bottom exactly on `surface`.
    pub fn y_standing_on(&self, surface: f32) -> f32 {
        surface - self.nominal_height + self.insets.bottom
    }

    /// Entity `y` that puts the box top exactly on `ceiling`.
    pub fn y_hanging_from(&self, ceiling: f32) -> f32 {
        ceiling - self.insets.top
    }

    /// Box bottom for an entity whose top-left is at `y`.
    pub fn bottom_at(&self, y: f32) -> f32 {
        y + self.nominal_height - self.insets.bottom
    }

    /// Box top for an entity whose top-left is at `y`.
    pub fn top_at(&self, y: f32) -> f32 {
        y + self.insets.top
    }

    /// Entity `x` that puts the right edge of a right-facing box on `edge`.
    pub fn x_left_of(&self, edge: f32) -> f32 {
        edge - self.nominal_width + self.insets.right
    }

    /// Entity `x` that puts the left edge of a left-facing box on `edge`.
    pub fn x_right_of(&self, edge: f32) -> f32 {
        edge - self.insets.right
    }
}
