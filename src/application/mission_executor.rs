use std::sync::Arc;
use std::time::Duration;

use crate::common::{MissionLoadError, MissionLoadResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{load_mission, MissionSource, Waypoint};
use crate::domains::navigation::{GoalOutcome, NavigationClient};

/// Pause between consecutive goals.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Per-waypoint record of a finished sweep. Returned to the caller only; the
/// mission log ends with the same notice whatever it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionReport {
    pub visits: Vec<(Waypoint, GoalOutcome)>,
}

impl MissionReport {
    pub fn total(&self) -> usize {
        self.visits.len()
    }

    pub fn reached(&self) -> usize {
        self.visits
            .iter()
            .filter(|(_, outcome)| outcome.is_reached())
            .count()
    }
}

/// Sequences a mission through the navigation client: every waypoint is
/// attempted once, in order, whatever happened to the previous one.
pub struct MissionExecutor {
    source: Arc<dyn MissionSource>,
    logger: DynLogger,
    settle_delay: Duration,
}

impl MissionExecutor {
    pub fn new(source: Arc<dyn MissionSource>, logger: DynLogger) -> Self {
        Self {
            source,
            logger,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub async fn run(&self, client: &mut NavigationClient) -> MissionLoadResult<MissionReport> {
        let plan = match load_mission(self.source.as_ref(), self.logger.as_ref()) {
            Ok(plan) => plan,
            Err(e) => {
                self.report_load_failure(&e);
                return Err(e);
            }
        };

        let total = plan.len();
        self.logger.info(&format!("Mission has {} waypoint(s)", total));

        let mut visits = Vec::with_capacity(total);
        for (index, waypoint) in plan.iter().enumerate() {
            self.logger.info(&format!("--- Waypoint {} / {} ---", index + 1, total));
            let outcome = client.submit(waypoint).await;
            visits.push((*waypoint, outcome));

            tokio::time::sleep(self.settle_delay).await;
        }

        self.logger.info("All waypoints processed");
        Ok(MissionReport { visits })
    }

    fn report_load_failure(&self, error: &MissionLoadError) {
        if error.is_missing_waypoints() {
            self.logger.error(&format!("No waypoints to visit: {}", error));
        } else {
            self.logger.error(&format!("Could not load mission: {}", error));
        }
    }
}
