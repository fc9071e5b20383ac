//! Regular enemy patrol AI.
//!
//! Enemies only decide while standing on the ground. A walking enemy turns
//! around when it reaches the matching end of its [`Patrol`] range or when an
//! obstacle revoked its movement permission in the walking direction. Any
//! other state falls back to the default walk, redirected away from a blocked
//! side.

use bevy_ecs::prelude::*;

use crate::components::active::Active;
use crate::components::movement::Movement;
use crate::components::patrol::Patrol;
use crate::components::state::{EntityState, InteractionState, SuperState};
use crate::events::bus::MessageBus;

use super::manager::{EntityList, GameSystem};

#[derive(Default)]
pub struct RegularEnemyInputSystem {
    entities: EntityList,
}

impl RegularEnemyInputSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Choose the walking direction of a grounded enemy.
pub fn choose_direction(state: &mut EntityState, patrol: &Patrol) {
    if state.super_state() != SuperState::OnGround {
        return;
    }
    match state.state() {
        InteractionState::WalkLeft => {
            if patrol.at_left_limit() || !state.can_move_left() {
                state.set_state(InteractionState::WalkRight);
            }
        }
        InteractionState::WalkRight => {
            if patrol.at_right_limit() || !state.can_move_right() {
                state.set_state(InteractionState::WalkLeft);
            }
        }
        _ => {
            if !state.can_move_left() {
                state.set_state(InteractionState::WalkRight);
            } else if !state.can_move_right() {
                state.set_state(InteractionState::WalkLeft);
            } else {
                state.set_state(state.default_state());
            }
        }
    }
}

impl GameSystem for RegularEnemyInputSystem {
    fn name(&self) -> &'static str {
        "RegularEnemyInput"
    }

    fn add_entity(&mut self, world: &World, entity: Entity) {
        let Ok(entity_ref) = world.get_entity(entity) else {
            return;
        };
        if entity_ref.contains::<EntityState>()
            && entity_ref.contains::<Patrol>()
            && entity_ref.contains::<Movement>()
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn update(&mut self, world: &mut World, _bus: &MessageBus) {
        let mut query = world.query::<(&Active, &mut EntityState, &mut Patrol, &Movement)>();
        for entity in self.entities.iter() {
            let Ok((active, mut state, mut patrol, movement)) = query.get_mut(world, entity) else {
                continue;
            };
            if !active.0 || state.is(SuperState::Appearing) || state.is(SuperState::Dead) {
                continue;
            }
            patrol.update(movement.position().x);
            choose_direction(&mut state, &patrol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded(current: InteractionState) -> EntityState {
        EntityState::with_current(
            InteractionState::WalkLeft,
            SuperState::Falling,
            current,
            SuperState::OnGround,
        )
    }

    fn patrol_at(x: f32) -> Patrol {
        let mut patrol = Patrol::new(100.0, 40.0, 40.0);
        patrol.update(x);
        patrol
    }

    #[test]
    fn turns_at_range_limits() {
        let mut state = grounded(InteractionState::WalkLeft);
        choose_direction(&mut state, &patrol_at(60.0));
        assert_eq!(state.state(), InteractionState::WalkRight);

        choose_direction(&mut state, &patrol_at(100.0));
        assert_eq!(state.state(), InteractionState::WalkRight);

        choose_direction(&mut state, &patrol_at(140.0));
        assert_eq!(state.state(), InteractionState::WalkLeft);
    }

    #[test]
    fn turns_when_blocked() {
        let mut state = grounded(InteractionState::WalkRight);
        state.set_can_move_right(false);
        // blocking forces the slide state, which resolves away from the wall
        choose_direction(&mut state, &patrol_at(100.0));
        assert_eq!(state.state(), InteractionState::WalkLeft);
    }

    #[test]
    fn idle_enemy_starts_default_walk() {
        let mut state = grounded(InteractionState::Idle);
        choose_direction(&mut state, &patrol_at(100.0));
        assert_eq!(state.state(), InteractionState::WalkLeft);
    }

    #[test]
    fn airborne_enemy_keeps_state() {
        let mut state = grounded(InteractionState::Idle);
        state.set_super_state(SuperState::Falling);
        choose_direction(&mut state, &patrol_at(60.0));
        assert_eq!(state.state(), InteractionState::Idle);
    }
}
