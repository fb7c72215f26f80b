use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domains::navigation::{GoalStatus, NavigationGoal};

/// Topic names of one action server, derived from its well-known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTopics {
    pub goal: String,
    pub cancel: String,
    pub status: String,
    pub result: String,
}

impl ActionTopics {
    pub fn for_action(action_name: &str) -> Self {
        let base = action_name.trim_matches('/').replace('/', ".");
        Self {
            goal: format!("{}.goal", base),
            cancel: format!("{}.cancel", base),
            status: format!("{}.status", base),
            result: format!("{}.result", base),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalMessage {
    pub goal_id: Uuid,
    pub client_id: String,
    pub goal: NavigationGoal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelMessage {
    pub goal_id: Uuid,
    pub client_id: String,
}

/// Periodic heartbeat; the first one a client sees marks the server ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub server_id: String,
    pub stamp: DateTime<Utc>,
    pub active_goals: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    pub goal_id: Uuid,
    pub status: GoalStatus,
    #[serde(default)]
    pub text: String,
}
