use serde::{Deserialize, Serialize};

use crate::common::{MissionLoadError, MissionLoadResult};

/// Reference frame every waypoint is expressed in.
pub const MAP_FRAME: &str = "map";

/// Planar navigation target in the `map` frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Waypoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Ordered, non-empty list of waypoints visited in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPlan {
    waypoints: Vec<Waypoint>,
}

impl MissionPlan {
    pub fn new(waypoints: Vec<Waypoint>) -> MissionLoadResult<Self> {
        if waypoints.is_empty() {
            return Err(MissionLoadError::ConfigEmptyWaypoints);
        }
        Ok(Self { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }
}

impl<'a> IntoIterator for &'a MissionPlan {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan_is_rejected() {
        let result = MissionPlan::new(Vec::new());
        assert!(matches!(result, Err(MissionLoadError::ConfigEmptyWaypoints)));
    }

    #[test]
    fn test_plan_keeps_order_and_duplicates() {
        let plan = MissionPlan::new(vec![
            Waypoint::new(1.0, 1.0),
            Waypoint::new(-2.0, 0.5),
            Waypoint::new(1.0, 1.0),
        ])
        .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.waypoints()[1], Waypoint::new(-2.0, 0.5));
        assert_eq!(plan.waypoints()[0], plan.waypoints()[2]);
    }
}
