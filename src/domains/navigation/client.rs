use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::goal::{GoalOutcome, GoalStatus, NavigationGoal};
use super::ports::NavigationBackend;
use crate::common::{NavigationError, NavigationResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::Waypoint;

/// Optional bounds on the two blocking waits of the client. `None` waits
/// for as long as the backend takes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub goal_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Ready,
    AwaitingResult { goal_id: Uuid },
}

/// Client holding the single long-lived connection to the navigation
/// backend. A value of this type only exists once the server is ready, and
/// `submit` takes `&mut self`, so at most one goal is ever in flight.
pub struct NavigationClient {
    backend: Arc<dyn NavigationBackend>,
    settings: ClientSettings,
    logger: DynLogger,
    state: ClientState,
}

impl NavigationClient {
    pub async fn connect(
        backend: Arc<dyn NavigationBackend>,
        settings: ClientSettings,
        logger: DynLogger,
    ) -> NavigationResult<Self> {
        let action = backend.action_name().to_string();
        logger.info(&format!("Waiting for navigation server '{}'...", action));

        let ready = match settings.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, backend.wait_for_server()).await {
                Ok(ready) => ready,
                Err(_) => Err(NavigationError::ServerUnavailable {
                    action: action.clone(),
                    waited: limit,
                }),
            },
            None => backend.wait_for_server().await,
        };
        if let Err(e) = ready {
            logger.error(&format!("Navigation server '{}' is not available: {}", action, e));
            return Err(e);
        }

        logger.info(&format!("Navigation server '{}' is ready", action));
        Ok(Self {
            backend,
            settings,
            logger,
            state: ClientState::Ready,
        })
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Send a goal for `waypoint` and wait for its terminal status.
    ///
    /// Never fails: transport errors and timeouts are logged and reported as
    /// `NotReached`, and the client is `Ready` again on return.
    pub async fn submit(&mut self, waypoint: &Waypoint) -> GoalOutcome {
        let goal = NavigationGoal::toward(waypoint, Utc::now());
        self.logger.info(&format!("Heading to goal: X={}, Y={}", waypoint.x, waypoint.y));

        let goal_id = match self.backend.send_goal(&goal).await {
            Ok(goal_id) => goal_id,
            Err(e) => {
                self.logger.error(&format!("Failed to send goal: {}", e));
                return GoalOutcome::NotReached;
            }
        };

        self.state = ClientState::AwaitingResult { goal_id };
        let resolution = self.await_result(goal_id).await;
        self.state = ClientState::Ready;

        match resolution {
            Ok(GoalStatus::Succeeded) => {
                self.logger.info("Goal reached");
                GoalOutcome::Reached
            }
            Ok(status) => {
                self.logger.warn(&format!("Goal not reached (status: {:?})", status));
                GoalOutcome::from(status)
            }
            Err(e) => {
                self.logger.warn(&format!("Goal not reached: {}", e));
                GoalOutcome::NotReached
            }
        }
    }

    async fn await_result(&self, goal_id: Uuid) -> NavigationResult<GoalStatus> {
        let Some(limit) = self.settings.goal_timeout else {
            return self.backend.wait_for_result(goal_id).await;
        };

        match tokio::time::timeout(limit, self.backend.wait_for_result(goal_id)).await {
            Ok(result) => result,
            Err(_) => {
                if let Err(e) = self.backend.cancel_goal(goal_id).await {
                    self.logger.error(&format!("Failed to cancel goal {}: {}", goal_id, e));
                }
                Err(NavigationError::GoalTimeout {
                    goal_id,
                    waited: limit,
                })
            }
        }
    }

    /// Release the backend connection.
    pub async fn shutdown(self) {
        self.backend.release().await;
    }
}
