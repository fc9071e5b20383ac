//! Collision against static level geometry.
//!
//! Each tick, every active entity that is neither appearing nor dead has both
//! movement permissions restored and is then tested against every obstacle
//! its box overlaps. How an overlap resolves depends on the super-state:
//!
//! - **Falling**: if last tick's box bottom was at or above the obstacle top
//!   (1 unit tolerance) the entity lands: on-ground, resting on the top, with
//!   the obstacle span recorded as its ground. Otherwise, unless the obstacle
//!   is a float platform, it is a side hit in mid-air.
//! - **OnGround**: walking into a side stops at the edge and revokes that
//!   direction. Any slide is cancelled.
//! - **Jumping/DoubleJumping**: if last tick's box top was at or below the
//!   obstacle bottom it is a ceiling hit and the entity starts falling with
//!   no velocity. Float platforms are passed through from below.
//!
//! A mid-air side hit stops at the edge, revokes the direction (which starts a
//! wall slide), records the obstacle bottom as the slide surface and drops the
//! entity into falling with no velocity.
//!
//! Afterwards the entity falls if it walked off its ground span, and stops
//! sliding once it dropped below the slide surface.

use bevy_ecs::prelude::*;

use crate::components::active::Active;
use crate::components::boxcollider::BoxCollider;
use crate::components::movement::Movement;
use crate::components::state::{EntityState, InteractionState, SuperState};
use crate::events::bus::MessageBus;
use crate::math::{Rect, Vector2};
use crate::render::{DrawItem, DrawList};
use crate::resources::debugmode::DebugMode;
use crate::resources::obstacles::{ObstacleKind, ObstacleMap};

use super::manager::{EntityList, GameSystem};

/// Clearance left between a landed or bumped box and the obstacle edge.
pub(crate) const CONTACT_GAP: f32 = 0.1;

/// Tolerance of the came-from-above and came-from-below tests.
const EDGE_TOLERANCE: f32 = 1.0;

pub struct ObstacleCollisionSystem {
    entities: EntityList,
    obstacles: ObstacleMap,
}

impl ObstacleCollisionSystem {
    pub fn new(obstacles: ObstacleMap) -> Self {
        Self {
            entities: EntityList::default(),
            obstacles,
        }
    }

    pub fn obstacles(&self) -> &ObstacleMap {
        &self.obstacles
    }
}

fn side_hit_in_air(
    state: &mut EntityState,
    movement: &mut Movement,
    collider: &mut BoxCollider,
    rect: Rect,
    obstacle: &Rect,
    position: &mut Vector2,
) {
    if movement.velocity.x > 0.0 && rect.left() <= obstacle.left() {
        position.x = collider.x_left_of(obstacle.left());
        state.set_can_move_right(false);
        collider.set_sliding_location(obstacle.bottom());
        state.set_super_state(SuperState::Falling);
        movement.velocity = Vector2::ZERO;
    }
    if movement.velocity.x < 0.0 && rect.right() >= obstacle.right() {
        position.x = collider.x_right_of(obstacle.right());
        state.set_can_move_left(false);
        collider.set_sliding_location(obstacle.bottom());
        state.set_super_state(SuperState::Falling);
        movement.velocity = Vector2::ZERO;
    }
}

fn falling_hit(
    state: &mut EntityState,
    movement: &mut Movement,
    collider: &mut BoxCollider,
    rect: Rect,
    (kind, obstacle): (ObstacleKind, &Rect),
    position: &mut Vector2,
) {
    state.set_state(InteractionState::Idle);
    let was_above =
        collider.bottom_at(movement.last_position().y) <= obstacle.top() + EDGE_TOLERANCE;
    if was_above {
        state.set_super_state(SuperState::OnGround);
        position.y = collider.y_standing_on(obstacle.top()) - CONTACT_GAP;
        collider.set_ground_location(obstacle.left(), obstacle.right());
    } else if kind != ObstacleKind::Float {
        side_hit_in_air(state, movement, collider, rect, obstacle, position);
    }
}

fn ground_hit(
    state: &mut EntityState,
    movement: &Movement,
    collider: &BoxCollider,
    rect: Rect,
    obstacle: &Rect,
    position: &mut Vector2,
) {
    if state.state() == InteractionState::Slide {
        state.set_state(InteractionState::Idle);
    }
    if movement.velocity.x > 0.0 && rect.left() <= obstacle.left() {
        position.x = collider.x_left_of(obstacle.left()) - CONTACT_GAP;
        state.set_can_move_right(false);
    }
    if movement.velocity.x < 0.0 && rect.right() >= obstacle.right() {
        position.x = collider.x_right_of(obstacle.right()) + CONTACT_GAP;
        state.set_can_move_left(false);
    }
}

fn ascending_hit(
    state: &mut EntityState,
    movement: &mut Movement,
    collider: &mut BoxCollider,
    rect: Rect,
    obstacle: &Rect,
    position: &mut Vector2,
) {
    let was_below =
        collider.top_at(movement.last_position().y) >= obstacle.bottom() - EDGE_TOLERANCE;
    if was_below {
        position.y = collider.y_hanging_from(obstacle.bottom()) + CONTACT_GAP;
        state.set_super_state(SuperState::Falling);
        movement.velocity = Vector2::ZERO;
    } else {
        side_hit_in_air(state, movement, collider, rect, obstacle, position);
    }
}

/// Resolve one entity against every obstacle its box overlaps.
pub fn resolve(
    state: &mut EntityState,
    movement: &mut Movement,
    collider: &mut BoxCollider,
    obstacles: &ObstacleMap,
) {
    let rect = collider.rect();
    let mut position = movement.position();
    state.set_can_move_left(true);
    state.set_can_move_right(true);

    for (kind, obstacle) in obstacles.iter() {
        if !rect.intersects(obstacle) {
            continue;
        }
        match state.super_state() {
            SuperState::Falling => falling_hit(
                state,
                movement,
                collider,
                rect,
                (kind, obstacle),
                &mut position,
            ),
            SuperState::OnGround => {
                ground_hit(state, movement, collider, rect, obstacle, &mut position)
            }
            super_state if super_state.is_airborne_up() && kind != ObstacleKind::Float => {
                ascending_hit(state, movement, collider, rect, obstacle, &mut position)
            }
            _ => {}
        }
    }

    movement.set_position(position);
    collider.update_box_position(position, state.direction());

    if collider.check_if_in_air(position.x, state.direction()) && state.is(SuperState::OnGround)
    {
        state.set_super_state(SuperState::Falling);
    }
    if collider.check_if_below(position.y) && state.state() == InteractionState::Slide {
        state.set_state(InteractionState::Idle);
    }
}

impl GameSystem for ObstacleCollisionSystem {
    fn name(&self) -> &'static str {
        "ObstacleCollision"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<EntityState>()
            && entity_ref.contains::<Movement>()
            && entity_ref.contains::<BoxCollider>()
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, _bus: &MessageBus) {
        let mut query =
            world.query::<(&Active, &mut EntityState, &mut Movement, &mut BoxCollider)>();
        for entity in self.entities.iter() {
            let Ok((active, mut state, mut movement, mut collider)) = query.get_mut(world, entity)
            else {
                continue;
            };
            if !active.0
                || state.is(SuperState::Appearing)
                || state.is(SuperState::Dead)
            {
                continue;
            }
            resolve(&mut state, &mut movement, &mut collider, &self.obstacles);
        }
    }

    fn draw(&self, world: &World, out: &mut DrawList) {
        if !world.contains_resource::<DebugMode>() {
            return;
        }
        for (_, obstacle) in self.obstacles.iter() {
            out.push(DrawItem::DebugBox { rect: *obstacle });
        }
        for entity in self.entities.iter() {
            if let Some(collider) = world.get::<BoxCollider>(entity) {
                out.push(DrawItem::DebugBox {
                    rect: collider.rect(),
                });
            }
        }
    }
}
