use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::mission::{Waypoint, MAP_FRAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub frame_id: String,
    pub stamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    /// Zero yaw: facing along the frame's x axis.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

/// Goal record sent to the navigation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationGoal {
    pub target_pose: PoseStamped,
}

impl NavigationGoal {
    /// Goal for `waypoint` in the map frame, on the ground plane, with the
    /// default orientation. Mission data never carries z or heading.
    pub fn toward(waypoint: &Waypoint, stamp: DateTime<Utc>) -> Self {
        Self {
            target_pose: PoseStamped {
                header: Header {
                    frame_id: MAP_FRAME.to_string(),
                    stamp,
                },
                pose: Pose {
                    position: Point {
                        x: waypoint.x,
                        y: waypoint.y,
                        z: 0.0,
                    },
                    orientation: Quaternion::IDENTITY,
                },
            },
        }
    }

    pub fn position(&self) -> Point {
        self.target_pose.pose.position
    }
}

/// Status values reported by the navigation backend for one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    Pending,
    Active,
    Preempted,
    Succeeded,
    Aborted,
    Rejected,
    Preempting,
    Recalling,
    Recalled,
    Lost,
}

impl GoalStatus {
    /// A terminal status means the goal is no longer in flight.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GoalStatus::Preempted
                | GoalStatus::Succeeded
                | GoalStatus::Aborted
                | GoalStatus::Rejected
                | GoalStatus::Recalled
                | GoalStatus::Lost
        )
    }
}

/// What the mission cares about for a single goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalOutcome {
    Reached,
    NotReached,
}

impl GoalOutcome {
    pub fn is_reached(self) -> bool {
        self == GoalOutcome::Reached
    }
}

impl From<GoalStatus> for GoalOutcome {
    fn from(status: GoalStatus) -> Self {
        match status {
            GoalStatus::Succeeded => GoalOutcome::Reached,
            _ => GoalOutcome::NotReached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_is_reached() {
        let all = [
            GoalStatus::Pending,
            GoalStatus::Active,
            GoalStatus::Preempted,
            GoalStatus::Succeeded,
            GoalStatus::Aborted,
            GoalStatus::Rejected,
            GoalStatus::Preempting,
            GoalStatus::Recalling,
            GoalStatus::Recalled,
            GoalStatus::Lost,
        ];
        for status in all {
            let expected = if status == GoalStatus::Succeeded {
                GoalOutcome::Reached
            } else {
                GoalOutcome::NotReached
            };
            assert_eq!(GoalOutcome::from(status), expected, "{:?}", status);
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(GoalStatus::Succeeded.is_terminal());
        assert!(GoalStatus::Aborted.is_terminal());
        assert!(GoalStatus::Rejected.is_terminal());
        assert!(GoalStatus::Preempted.is_terminal());
        assert!(!GoalStatus::Pending.is_terminal());
        assert!(!GoalStatus::Active.is_terminal());
        assert!(!GoalStatus::Preempting.is_terminal());
    }

    #[test]
    fn test_goal_round_trips_through_json() {
        let goal = NavigationGoal::toward(&Waypoint::new(-4.25, 1e6), Utc::now());
        let json = serde_json::to_string(&goal).unwrap();
        let back: NavigationGoal = serde_json::from_str(&json).unwrap();
        assert_eq!(goal, back);
    }
}
