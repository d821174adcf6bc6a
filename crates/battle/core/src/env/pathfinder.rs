//! Pathfinding oracle interface.
//!
//! The hex search itself lives outside this crate. The core only hands it a
//! search limit and reads back cumulative costs.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::state::HexCoordinate;

bitflags! {
    /// Movement abilities that widen what a search may traverse.
    ///
    /// These are passed to the pathfinder as search parameters, never applied
    /// as filters on a finished search.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct MovementModifiers: u8 {
        const IGNORE_TERRAIN_COST = 1 << 0;
        const PASS_THROUGH_WALLS  = 1 << 1;
        const CROSS_PITS          = 1 << 2;
    }
}

/// Bounds for a reachability search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimit {
    /// Largest cumulative movement cost a reachable coordinate may have.
    pub max_movement_cost: u32,
    pub modifiers: MovementModifiers,
}

impl SearchLimit {
    pub const fn new(max_movement_cost: u32, modifiers: MovementModifiers) -> Self {
        Self {
            max_movement_cost,
            modifiers,
        }
    }
}

/// Coordinates reached by a search with their cumulative movement cost.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub origin: HexCoordinate,
    pub reachable: BTreeMap<HexCoordinate, u32>,
}

impl SearchResult {
    /// Creates a result containing only the origin at zero cost.
    pub fn from_origin(origin: HexCoordinate) -> Self {
        let mut reachable = BTreeMap::new();
        reachable.insert(origin, 0);
        Self { origin, reachable }
    }

    pub fn with_reachable(mut self, coordinate: HexCoordinate, cost: u32) -> Self {
        self.reachable.insert(coordinate, cost);
        self
    }

    pub fn cost_to(&self, destination: HexCoordinate) -> Option<u32> {
        if destination == self.origin {
            return Some(0);
        }
        self.reachable.get(&destination).copied()
    }

    pub fn is_reachable(&self, destination: HexCoordinate) -> bool {
        self.cost_to(destination).is_some()
    }

    pub fn path_to(&self, destination: HexCoordinate) -> Option<MovementPath> {
        self.cost_to(destination)
            .map(|total_cost| MovementPath::new(self.origin, destination, total_cost))
    }
}

/// A chosen route: where it starts, where it ends, and what it costs in movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementPath {
    pub origin: HexCoordinate,
    pub destination: HexCoordinate,
    pub total_cost: u32,
}

impl MovementPath {
    pub const fn new(origin: HexCoordinate, destination: HexCoordinate, total_cost: u32) -> Self {
        Self {
            origin,
            destination,
            total_cost,
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.origin == self.destination
    }
}

/// External hex pathfinder.
pub trait PathfinderOracle: Send + Sync {
    /// Returns every coordinate reachable from `origin` within `limit`.
    fn search(&self, origin: HexCoordinate, limit: &SearchLimit) -> SearchResult;
}

/// Pathfinder for an obstacle-free map where every hex costs one movement.
///
/// Useful for previews and tests where terrain does not matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenFieldPathfinder;

impl PathfinderOracle for OpenFieldPathfinder {
    fn search(&self, origin: HexCoordinate, limit: &SearchLimit) -> SearchResult {
        let radius = i64::from(i32::try_from(limit.max_movement_cost).unwrap_or(i32::MAX));
        let mut result = SearchResult::from_origin(origin);

        for dq in -radius..=radius {
            let Ok(q) = i32::try_from(i64::from(origin.q) + dq) else {
                continue;
            };
            let lower = (-radius).max(-dq - radius);
            let upper = radius.min(-dq + radius);
            for dr in lower..=upper {
                // Hexes past the edge of the coordinate space do not exist.
                let Ok(r) = i32::try_from(i64::from(origin.r) + dr) else {
                    continue;
                };
                let coordinate = HexCoordinate::new(q, r);
                result
                    .reachable
                    .insert(coordinate, origin.distance(coordinate));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_field_search_respects_limit() {
        let origin = HexCoordinate::new(2, 2);
        let limit = SearchLimit::new(2, MovementModifiers::empty());
        let result = OpenFieldPathfinder.search(origin, &limit);

        // 1 + 6 + 12 hexes within two steps.
        assert_eq!(result.reachable.len(), 19);
        assert_eq!(result.cost_to(HexCoordinate::new(4, 0)), Some(2));
        assert!(!result.is_reachable(HexCoordinate::new(5, 2)));
    }

    #[test]
    fn open_field_search_stops_at_coordinate_edge() {
        let origin = HexCoordinate::new(i32::MAX, 0);
        let limit = SearchLimit::new(1, MovementModifiers::empty());
        let result = OpenFieldPathfinder.search(origin, &limit);

        // The two neighbours with q = i32::MAX + 1 are off the grid.
        assert_eq!(result.reachable.len(), 5);
        assert_eq!(result.cost_to(HexCoordinate::new(i32::MAX - 1, 1)), Some(1));
    }

    #[test]
    fn path_to_origin_is_stationary() {
        let origin = HexCoordinate::ORIGIN;
        let path = SearchResult::from_origin(origin).path_to(origin).unwrap();
        assert!(path.is_stationary());
        assert_eq!(path.total_cost, 0);
    }

    #[test]
    fn modifiers_combine() {
        let modifiers = MovementModifiers::PASS_THROUGH_WALLS | MovementModifiers::CROSS_PITS;
        assert!(modifiers.contains(MovementModifiers::CROSS_PITS));
        assert!(!modifiers.contains(MovementModifiers::IGNORE_TERRAIN_COST));
    }
}
