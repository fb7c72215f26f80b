use async_trait::async_trait;
use rand::Rng;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::common::{NavigationError, NavigationResult};
use crate::domains::navigation::{GoalStatus, NavigationBackend, NavigationGoal};

struct PendingGoal {
    planned: GoalStatus,
    cancelled: bool,
}

/// In-process stand-in for a navigation server.
///
/// Each accepted goal resolves after `travel_time` with the next scripted
/// status, or with the default status (possibly turned into `Aborted` by the
/// random failure rate) once the script is exhausted. A cancelled goal
/// resolves as `Preempted`. Every goal and cancel request is recorded.
/// Sends can be made to fail to exercise transport errors.
pub struct SimulatedNavigationBackend {
    action_name: String,
    available: bool,
    stalling: bool,
    startup_delay: Duration,
    travel_time: Duration,
    default_status: GoalStatus,
    failure_rate: f64,
    failing_sends: AtomicUsize,
    script: Mutex<VecDeque<GoalStatus>>,
    pending: Mutex<HashMap<Uuid, PendingGoal>>,
    submitted: Mutex<Vec<NavigationGoal>>,
    cancelled: Mutex<Vec<Uuid>>,
    released: AtomicBool,
    cancel_signal: Notify,
}

impl SimulatedNavigationBackend {
    pub fn new(action_name: impl Into<String>) -> Self {
        Self {
            action_name: action_name.into(),
            available: true,
            stalling: false,
            startup_delay: Duration::ZERO,
            travel_time: Duration::ZERO,
            default_status: GoalStatus::Succeeded,
            failure_rate: 0.0,
            failing_sends: AtomicUsize::new(0),
            script: Mutex::new(VecDeque::new()),
            pending: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            released: AtomicBool::new(false),
            cancel_signal: Notify::new(),
        }
    }

    /// Statuses handed out to goals in submission order.
    pub fn with_script(self, statuses: impl IntoIterator<Item = GoalStatus>) -> Self {
        *lock(&self.script) = statuses.into_iter().collect();
        self
    }

    pub fn with_default_status(mut self, status: GoalStatus) -> Self {
        self.default_status = status;
        self
    }

    pub fn with_travel_time(mut self, travel_time: Duration) -> Self {
        self.travel_time = travel_time;
        self
    }

    pub fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }

    /// Probability in `[0, 1]` that an unscripted goal is aborted.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    /// The next `count` calls to `send_goal` fail with a transport error.
    pub fn failing_sends(self, count: usize) -> Self {
        self.failing_sends.store(count, Ordering::SeqCst);
        self
    }

    /// The server never announces readiness.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Goals never finish unless cancelled.
    pub fn stalling(mut self) -> Self {
        self.stalling = true;
        self
    }

    /// Register a goal under a caller-chosen id and return its planned status.
    pub fn accept_goal(&self, goal_id: Uuid, goal: &NavigationGoal) -> GoalStatus {
        let planned = self.plan_status();
        lock(&self.submitted).push(goal.clone());
        lock(&self.pending).insert(
            goal_id,
            PendingGoal {
                planned,
                cancelled: false,
            },
        );
        planned
    }

    pub fn submitted_goals(&self) -> Vec<NavigationGoal> {
        lock(&self.submitted).clone()
    }

    pub fn cancelled_goals(&self) -> Vec<Uuid> {
        lock(&self.cancelled).clone()
    }

    /// Goals still in flight. Cancelled goals whose waiter went away are not reported.
    pub fn active_goals(&self) -> Vec<Uuid> {
        lock(&self.pending)
            .iter()
            .filter(|(_, pending)| !pending.cancelled)
            .map(|(goal_id, _)| *goal_id)
            .collect()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    fn plan_status(&self) -> GoalStatus {
        if let Some(status) = lock(&self.script).pop_front() {
            return status;
        }
        if self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate) {
            return GoalStatus::Aborted;
        }
        self.default_status
    }

    fn is_cancelled(&self, goal_id: Uuid) -> bool {
        lock(&self.pending)
            .get(&goal_id)
            .map_or(true, |pending| pending.cancelled)
    }

    async fn wait_for_cancel(&self, goal_id: Uuid) {
        loop {
            let notified = self.cancel_signal.notified();
            if self.is_cancelled(goal_id) {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl NavigationBackend for SimulatedNavigationBackend {
    fn action_name(&self) -> &str {
        &self.action_name
    }

    async fn wait_for_server(&self) -> NavigationResult<()> {
        if !self.available {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(self.startup_delay).await;
        Ok(())
    }

    async fn send_goal(&self, goal: &NavigationGoal) -> NavigationResult<Uuid> {
        let failing = self
            .failing_sends
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(NavigationError::Transport(format!(
                "{}: goal could not be delivered",
                self.action_name
            )));
        }

        let goal_id = Uuid::new_v4();
        self.accept_goal(goal_id, goal);
        Ok(goal_id)
    }

    async fn wait_for_result(&self, goal_id: Uuid) -> NavigationResult<GoalStatus> {
        if !lock(&self.pending).contains_key(&goal_id) {
            return Err(NavigationError::Transport(format!("unknown goal {}", goal_id)));
        }

        if self.stalling {
            self.wait_for_cancel(goal_id).await;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(self.travel_time) => {}
                _ = self.wait_for_cancel(goal_id) => {}
            }
        }

        let pending = lock(&self.pending).remove(&goal_id).ok_or_else(|| {
            NavigationError::Transport(format!("goal {} resolved twice", goal_id))
        })?;
        Ok(if pending.cancelled {
            GoalStatus::Preempted
        } else {
            pending.planned
        })
    }

    async fn cancel_goal(&self, goal_id: Uuid) -> NavigationResult<()> {
        lock(&self.cancelled).push(goal_id);
        if let Some(pending) = lock(&self.pending).get_mut(&goal_id) {
            pending.cancelled = true;
        }
        self.cancel_signal.notify_waiters();
        Ok(())
    }

    async fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
