use async_trait::async_trait;
use uuid::Uuid;

use super::goal::{GoalStatus, NavigationGoal};
use crate::common::NavigationResult;

/// Port to an action-style navigation service.
///
/// Goals are identified by the id returned from `send_goal`. The backend
/// owns the connection; `release` drops it.
#[async_trait]
pub trait NavigationBackend: Send + Sync {
    /// Well-known name of the action server (e.g. `move_base`).
    fn action_name(&self) -> &str;

    /// Resolves once the server has announced it is ready to accept goals.
    async fn wait_for_server(&self) -> NavigationResult<()>;

    async fn send_goal(&self, goal: &NavigationGoal) -> NavigationResult<Uuid>;

    /// Resolves with the terminal status of `goal_id`.
    async fn wait_for_result(&self, goal_id: Uuid) -> NavigationResult<GoalStatus>;

    async fn cancel_goal(&self, goal_id: Uuid) -> NavigationResult<()>;

    async fn release(&self) {}
}
