//! Per-entity state machine component.
//!
//! [`EntityState`] tracks two orthogonal axes:
//! - an [`InteractionState`] driven by input (idle, walking, jumping, sliding)
//! - a [`SuperState`] describing the physical regime (on ground, falling, dead...)
//!
//! Every mutator recomputes the derived [`AnimationId`] before returning, so
//! the animation id can never be stale with respect to the two axes.
//!
//! The movement permissions double as the wall-slide trigger: revoking
//! `can_move_left` or `can_move_right` forces [`InteractionState::Slide`] and
//! turns the entity to face the blocking wall.

use bevy_ecs::prelude::Component;

/// Discrete, input-driven action layered on top of the super-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    WalkLeft,
    WalkRight,
    Jump,
    DoubleJump,
    Slide,
}

/// Physical regime governing vertical dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SuperState {
    OnGround,
    #[default]
    Falling,
    Jumping,
    DoubleJumping,
    Dead,
    Appearing,
}

impl SuperState {
    /// True for the two ascending regimes.
    pub fn is_airborne_up(self) -> bool {
        matches!(self, SuperState::Jumping | SuperState::DoubleJumping)
    }
}

/// Animation identifiers consumed by the animation system and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimationId {
    Idle,
    Walk,
    Jump,
    DoubleJump,
    Slide,
    Fall,
    Death,
    Appear,
}

/// Fixed mapping table from (super-state, interaction state) to animation.
///
/// The super-state has priority; the interaction state only refines the
/// on-ground (walk vs idle) and falling (slide vs fall) regimes.
pub fn animation_for(super_state: SuperState, state: InteractionState) -> AnimationId {
    match super_state {
        SuperState::OnGround => match state {
            InteractionState::WalkLeft | InteractionState::WalkRight => AnimationId::Walk,
            _ => AnimationId::Idle,
        },
        SuperState::Falling => match state {
            InteractionState::Slide => AnimationId::Slide,
            _ => AnimationId::Fall,
        },
        SuperState::Jumping => AnimationId::Jump,
        SuperState::DoubleJumping => AnimationId::DoubleJump,
        SuperState::Dead => AnimationId::Death,
        SuperState::Appearing => AnimationId::Appear,
    }
}

/// Interaction state, super-state and movement permissions of an entity.
#[derive(Component, Debug, Clone)]
pub struct EntityState {
    state: InteractionState,
    previous_state: InteractionState,
    super_state: SuperState,
    previous_super_state: SuperState,
    can_move_left: bool,
    can_move_right: bool,
    /// Facing direction: 1 = right, -1 = left.
    direction: i32,
    animation: AnimationId,
    default_state: InteractionState,
    default_super_state: SuperState,
    default_direction: i32,
    /// Jumps performed since the entity last stood on the ground.
    pub jumps_performed: u32,
}

impl Default for EntityState {
    fn default() -> Self {
        Self::new(InteractionState::Idle, SuperState::Falling)
    }
}

impl EntityState {
    /// Create a state that starts out appearing and settles into the given defaults.
    ///
    /// The default facing direction is left only when the default state is
    /// [`InteractionState::WalkLeft`].
    pub fn new(default_state: InteractionState, default_super_state: SuperState) -> Self {
        Self::with_current(
            default_state,
            default_super_state,
            InteractionState::Idle,
            SuperState::Appearing,
        )
    }

    /// Create a state with explicit defaults and explicit current values.
    pub fn with_current(
        default_state: InteractionState,
        default_super_state: SuperState,
        current_state: InteractionState,
        current_super_state: SuperState,
    ) -> Self {
        let default_direction = if default_state == InteractionState::WalkLeft {
            -1
        } else {
            1
        };
        Self {
            state: current_state,
            previous_state: current_state,
            super_state: current_super_state,
            previous_super_state: current_super_state,
            can_move_left: true,
            can_move_right: true,
            direction: 1,
            animation: animation_for(current_super_state, current_state),
            default_state,
            default_super_state,
            default_direction,
            jumps_performed: 0,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn previous_state(&self) -> InteractionState {
        self.previous_state
    }

    pub fn super_state(&self) -> SuperState {
        self.super_state
    }

    pub fn previous_super_state(&self) -> SuperState {
        self.previous_super_state
    }

    pub fn animation(&self) -> AnimationId {
        self.animation
    }

    pub fn default_state(&self) -> InteractionState {
        self.default_state
    }

    pub fn default_super_state(&self) -> SuperState {
        self.default_super_state
    }

    pub fn default_direction(&self) -> i32 {
        self.default_direction
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Set the facing direction. Any non-negative value faces right.
    pub fn set_direction(&mut self, direction: i32) {
        self.direction = if direction < 0 { -1 } else { 1 };
    }

    pub fn can_move_left(&self) -> bool {
        self.can_move_left
    }

    pub fn can_move_right(&self) -> bool {
        self.can_move_right
    }

    pub fn is(&self, super_state: SuperState) -> bool {
        self.super_state == super_state
    }

    pub fn set_state(&mut self, state: InteractionState) {
        self.previous_state = self.state;
        self.state = state;
        self.refresh_animation();
    }

    pub fn set_super_state(&mut self, super_state: SuperState) {
        self.previous_super_state = self.super_state;
        self.super_state = super_state;
        self.refresh_animation();
    }

    /// Grant or revoke leftward movement. Revoking starts a wall slide facing left.
    pub fn set_can_move_left(&mut self, allowed: bool) {
        self.can_move_left = allowed;
        if !allowed {
            self.set_state(InteractionState::Slide);
            self.direction = -1;
        }
    }

    /// Grant or revoke rightward movement. Revoking starts a wall slide facing right.
    pub fn set_can_move_right(&mut self, allowed: bool) {
        self.can_move_right = allowed;
        if !allowed {
            self.set_state(InteractionState::Slide);
            self.direction = 1;
        }
    }

    /// Restore permissions and the configured default state and super-state.
    pub fn reset_to_defaults(&mut self) {
        self.set_can_move_left(true);
        self.set_can_move_right(true);
        self.set_super_state(self.default_super_state);
        self.set_state(self.default_state);
    }

    fn refresh_animation(&mut self) {
        self.animation = animation_for(self.super_state, self.state);
    }
}
