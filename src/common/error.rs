use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Failures while turning the mission file into a plan. All of them abort the
/// mission before any goal is dispatched.
#[derive(Error, Debug)]
pub enum MissionLoadError {
    #[error("Mission file unreadable at {location}: {source}")]
    ConfigUnreadable {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mission file is malformed: {reason}")]
    ConfigMalformed { reason: String },

    #[error("Mission file has no 'waypoints' list")]
    ConfigMissingWaypoints,

    #[error("Mission file 'waypoints' list is empty")]
    ConfigEmptyWaypoints,
}

impl MissionLoadError {
    /// Missing and empty lists are reported the same way in the mission log.
    pub fn is_missing_waypoints(&self) -> bool {
        matches!(
            self,
            MissionLoadError::ConfigMissingWaypoints | MissionLoadError::ConfigEmptyWaypoints
        )
    }
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Navigation server '{action}' not available after {waited:?}")]
    ServerUnavailable { action: String, waited: Duration },

    #[error("Goal {goal_id} got no result within {waited:?}")]
    GoalTimeout { goal_id: Uuid, waited: Duration },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Mission load error: {0}")]
    MissionLoad(#[from] MissionLoadError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type MissionLoadResult<T> = Result<T, MissionLoadError>;
pub type NavigationResult<T> = Result<T, NavigationError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
