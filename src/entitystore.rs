//! Typed entity/component store.
//!
//! A thin layer over [`bevy_ecs::world::World`] that gives entities the
//! add/remove/get/list contract the simulation relies on:
//!
//! - adding a component the entity already owns is a no-op with an optional
//!   diagnostic, never a silent replacement
//! - removing or reading a missing component is harmless
//! - listing reports only the closed set of [`ComponentKind`]s
//!
//! Components never point back at their owner. Systems that need the owner
//! keep the [`Entity`] next to whatever they cache.
//!
//! Diagnostics are emitted at `debug!` level when the
//! `[debug] entity_messages` flag of [`GameConfig`] is set.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::active::Active;
use crate::components::animation::Animation;
use crate::components::boxcollider::BoxCollider;
use crate::components::entitytype::EntityType;
use crate::components::inputcontrolled::InputControlled;
use crate::components::movement::Movement;
use crate::components::patrol::Patrol;
use crate::components::respawn::Respawn;
use crate::components::state::EntityState;
use crate::components::timer::Timer;
use crate::resources::gameconfig::GameConfig;

/// Number of [`ComponentKind`] variants.
pub const COMPONENT_KIND_COUNT: usize = 10;

/// Closed set of component kinds the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Active,
    Animation,
    BoxCollider,
    EntityType,
    InputControlled,
    Movement,
    Patrol,
    Respawn,
    State,
    Timer,
}

/// A component type managed through the store.
pub trait StoredComponent: Component<Mutability = bevy_ecs::component::Mutable> + Sized {
    const KIND: ComponentKind;
}

impl StoredComponent for Active {
    const KIND: ComponentKind = ComponentKind::Active;
}
impl StoredComponent for Animation {
    const KIND: ComponentKind = ComponentKind::Animation;
}
impl StoredComponent for BoxCollider {
    const KIND: ComponentKind = ComponentKind::BoxCollider;
}
impl StoredComponent for EntityType {
    const KIND: ComponentKind = ComponentKind::EntityType;
}
impl StoredComponent for InputControlled {
    const KIND: ComponentKind = ComponentKind::InputControlled;
}
impl StoredComponent for Movement {
    const KIND: ComponentKind = ComponentKind::Movement;
}
impl StoredComponent for Patrol {
    const KIND: ComponentKind = ComponentKind::Patrol;
}
impl StoredComponent for Respawn {
    const KIND: ComponentKind = ComponentKind::Respawn;
}
impl StoredComponent for EntityState {
    const KIND: ComponentKind = ComponentKind::State;
}
impl StoredComponent for Timer {
    const KIND: ComponentKind = ComponentKind::Timer;
}

fn diagnostics_enabled(world: &World) -> bool {
    world
        .get_resource::<GameConfig>()
        .is_some_and(|config| config.debug.entity_messages)
}

/// Spawn an entity that owns nothing but its [`Active`] flag.
pub fn spawn_entity(world: &mut World, is_active: bool) -> Entity {
    world.spawn(Active(is_active)).id()
}

/// Attach `component` unless the entity already owns one of that kind.
///
/// Returns true when the component was inserted.
pub fn add_component<C: StoredComponent>(world: &mut World, entity: Entity, component: C) -> bool {
    let diagnostics = diagnostics_enabled(world);
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        if diagnostics {
            debug!("add {:?}: entity {:?} does not exist", C::KIND, entity);
        }
        return false;
    };
    if entity_mut.contains::<C>() {
        if diagnostics {
            debug!("entity {:?} already has a {:?} component", entity, C::KIND);
        }
        return false;
    }
    entity_mut.insert(component);
    true
}

/// Detach and return the component of type `C`, if present.
pub fn remove_component<C: StoredComponent>(world: &mut World, entity: Entity) -> Option<C> {
    let diagnostics = diagnostics_enabled(world);
    let removed = world
        .get_entity_mut(entity)
        .ok()
        .and_then(|mut entity_mut| entity_mut.take::<C>());
    if removed.is_none() && diagnostics {
        debug!("entity {:?} has no {:?} component to remove", entity, C::KIND);
    }
    removed
}

pub fn get_component<C: StoredComponent>(world: &World, entity: Entity) -> Option<&C> {
    world.get::<C>(entity)
}

pub fn get_component_mut<C: StoredComponent>(
    world: &mut World,
    entity: Entity,
) -> Option<Mut<'_, C>> {
    world.get_mut::<C>(entity)
}

/// Every component kind attached to `entity`, in declaration order.
pub fn list_components(world: &World, entity: Entity) -> ArrayVec<ComponentKind, COMPONENT_KIND_COUNT> {
    let mut kinds = ArrayVec::new();
    let Ok(entity_ref) = world.get_entity(entity) else {
        return kinds;
    };
    let checks: [(ComponentKind, bool); COMPONENT_KIND_COUNT] = [
        (ComponentKind::Active, entity_ref.contains::<Active>()),
        (ComponentKind::Animation, entity_ref.contains::<Animation>()),
        (ComponentKind::BoxCollider, entity_ref.contains::<BoxCollider>()),
        (ComponentKind::EntityType, entity_ref.contains::<EntityType>()),
        (
            ComponentKind::InputControlled,
            entity_ref.contains::<InputControlled>(),
        ),
        (ComponentKind::Movement, entity_ref.contains::<Movement>()),
        (ComponentKind::Patrol, entity_ref.contains::<Patrol>()),
        (ComponentKind::Respawn, entity_ref.contains::<Respawn>()),
        (ComponentKind::State, entity_ref.contains::<EntityState>()),
        (ComponentKind::Timer, entity_ref.contains::<Timer>()),
    ];
    for (kind, present) in checks {
        if present {
            kinds.push(kind);
        }
    }
    kinds
}

/// Missing entities and entities without an [`Active`] flag count as inactive.
pub fn is_active(world: &World, entity: Entity) -> bool {
    world.get::<Active>(entity).is_some_and(|active| active.0)
}

/// Set the activity flag. Returns false when the entity has no [`Active`] flag.
pub fn set_active(world: &mut World, entity: Entity, active: bool) -> bool {
    match world.get_mut::<Active>(entity) {
        Some(mut flag) => {
            flag.0 = active;
            true
        }
        None => false,
    }
}

pub fn exists(world: &World, entity: Entity) -> bool {
    world.get_entity(entity).is_ok()
}
