//! Static level geometry.
//!
//! [`ObstacleMap`] holds the rectangles of the current level grouped by layer.
//! Only two layer names are recognised:
//! - `solid` blocks from every side
//! - `float` is a one-way platform: entities land on it but never hit its
//!   sides or its underside
//!
//! Layers iterate in name order, so collision resolution is deterministic.
//! The map is rebuilt for every level and owned by the
//! [`ObstacleCollisionSystem`](crate::systems::obstaclecollision::ObstacleCollisionSystem).

use log::warn;
use std::collections::BTreeMap;

use crate::math::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObstacleKind {
    Solid,
    Float,
}

impl ObstacleKind {
    pub fn from_layer_name(name: &str) -> Option<Self> {
        match name {
            "solid" => Some(ObstacleKind::Solid),
            "float" => Some(ObstacleKind::Float),
            _ => None,
        }
    }

    pub fn layer_name(self) -> &'static str {
        match self {
            ObstacleKind::Solid => "solid",
            ObstacleKind::Float => "float",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObstacleMap {
    layers: BTreeMap<String, (ObstacleKind, Vec<Rect>)>,
}

impl ObstacleMap {
    /// Build from raw layer data. Unrecognised layer names are dropped.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = (&'a String, &'a Vec<Rect>)>) -> Self {
        let mut map = Self::default();
        for (name, rects) in layers {
            match ObstacleKind::from_layer_name(name) {
                Some(kind) => {
                    map.layers.insert(name.clone(), (kind, rects.clone()));
                }
                None => warn!("ignoring unknown obstacle layer '{}'", name),
            }
        }
        map
    }

    pub fn insert(&mut self, kind: ObstacleKind, rects: Vec<Rect>) {
        self.layers
            .entry(kind.layer_name().to_string())
            .or_insert((kind, Vec::new()))
            .1
            .extend(rects);
    }

    /// Every obstacle rectangle with the kind of its layer.
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleKind, &Rect)> {
        self.layers
            .values()
            .flat_map(|(kind, rects)| rects.iter().map(move |rect| (*kind, rect)))
    }

    pub fn len(&self) -> usize {
        self.layers.values().map(|(_, rects)| rects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_layers_are_ignored() {
        let mut raw = BTreeMap::new();
        raw.insert("solid".to_string(), vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        raw.insert("decoration".to_string(), vec![Rect::new(5.0, 5.0, 1.0, 1.0)]);
        raw.insert("float".to_string(), vec![Rect::new(20.0, 0.0, 10.0, 2.0)]);
        let map = ObstacleMap::from_layers(&raw);
        assert_eq!(map.len(), 2);
        let kinds: Vec<ObstacleKind> = map.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![ObstacleKind::Float, ObstacleKind::Solid]);
    }

    #[test]
    fn insert_appends_to_layer() {
        let mut map = ObstacleMap::default();
        assert!(map.is_empty());
        map.insert(ObstacleKind::Solid, vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
        map.insert(ObstacleKind::Solid, vec![Rect::new(2.0, 0.0, 1.0, 1.0)]);
        assert_eq!(map.len(), 2);
    }
}
