use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::Message;
use std::time::Duration;
use uuid::Uuid;

use super::action_wire::{ActionTopics, CancelMessage, GoalMessage, ResultMessage, StatusMessage};
use crate::common::{NavigationError, NavigationResult};
use crate::config::KafkaConfig;
use crate::domains::navigation::{GoalStatus, NavigationBackend, NavigationGoal};

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
const ASSIGNMENT_POLL: Duration = Duration::from_millis(50);

/// Navigation backend reached over Kafka topics named after the action
/// server (see `ActionTopics`).
pub struct KafkaNavigationBackend {
    action_name: String,
    client_id: String,
    topics: ActionTopics,
    producer: FutureProducer,
    status_consumer: StreamConsumer,
    result_consumer: StreamConsumer,
}

impl KafkaNavigationBackend {
    pub fn new(config: &KafkaConfig, action_name: &str) -> NavigationResult<Self> {
        let brokers = config.brokers.join(",");
        let topics = ActionTopics::for_action(action_name);

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| transport("Failed to create Kafka producer", e))?;

        // Private groups: every client must see every status and result message.
        let status_consumer = reply_consumer(&brokers, &config.client_id, "status")?;
        status_consumer
            .subscribe(&[topics.status.as_str()])
            .map_err(|e| transport("Failed to subscribe to status topic", e))?;

        let result_consumer = reply_consumer(&brokers, &config.client_id, "result")?;
        result_consumer
            .subscribe(&[topics.result.as_str()])
            .map_err(|e| transport("Failed to subscribe to result topic", e))?;

        Ok(Self {
            action_name: action_name.to_string(),
            client_id: config.client_id.clone(),
            topics,
            producer,
            status_consumer,
            result_consumer,
        })
    }

    async fn publish(&self, topic: &str, key: &str, payload: &str) -> NavigationResult<()> {
        let record = FutureRecord::to(topic).key(key).payload(payload);
        self.producer
            .send(record, SEND_TIMEOUT)
            .await
            .map_err(|(e, _)| transport(&format!("Failed to publish to {}", topic), e))?;
        Ok(())
    }

    /// Results published before partition assignment would be lost with
    /// `auto.offset.reset = latest`, so drive the result consumer until it
    /// owns its partitions.
    async fn await_result_assignment(&self) -> NavigationResult<()> {
        loop {
            match self.result_consumer.assignment() {
                Ok(partitions) if partitions.count() > 0 => return Ok(()),
                Ok(_) => {}
                Err(e) => tracing::warn!("Failed to query result consumer assignment: {}", e),
            }
            // Anything received here predates our goals and is discarded.
            let _ = tokio::time::timeout(ASSIGNMENT_POLL, self.result_consumer.recv()).await;
        }
    }
}

#[async_trait]
impl NavigationBackend for KafkaNavigationBackend {
    fn action_name(&self) -> &str {
        &self.action_name
    }

    async fn wait_for_server(&self) -> NavigationResult<()> {
        self.await_result_assignment().await?;
        tracing::debug!("Result consumer assigned on {}", self.topics.result);

        loop {
            let payload = {
                let message = self
                    .status_consumer
                    .recv()
                    .await
                    .map_err(|e| transport("Failed to receive status", e))?;
                message.payload().map(<[u8]>::to_vec)
            };
            let Some(payload) = payload else { continue };

            match serde_json::from_slice::<StatusMessage>(&payload) {
                Ok(status) => {
                    tracing::info!(
                        "Navigation server {} alive ({} active goal(s))",
                        status.server_id,
                        status.active_goals.len()
                    );
                    return Ok(());
                }
                Err(e) => tracing::warn!("Ignoring malformed status message: {}", e),
            }
        }
    }

    async fn send_goal(&self, goal: &NavigationGoal) -> NavigationResult<Uuid> {
        let goal_id = Uuid::new_v4();
        let message = GoalMessage {
            goal_id,
            client_id: self.client_id.clone(),
            goal: goal.clone(),
        };
        let payload = serde_json::to_string(&message)?;
        self.publish(&self.topics.goal, &goal_id.to_string(), &payload)
            .await?;
        tracing::debug!("Published goal {} to {}", goal_id, self.topics.goal);
        Ok(goal_id)
    }

    async fn wait_for_result(&self, goal_id: Uuid) -> NavigationResult<GoalStatus> {
        loop {
            let payload = {
                let message = self
                    .result_consumer
                    .recv()
                    .await
                    .map_err(|e| transport("Failed to receive result", e))?;
                message.payload().map(<[u8]>::to_vec)
            };
            let Some(payload) = payload else { continue };

            let result = match serde_json::from_slice::<ResultMessage>(&payload) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Ignoring malformed result message: {}", e);
                    continue;
                }
            };
            if result.goal_id != goal_id {
                continue;
            }
            if !result.status.is_terminal() {
                tracing::debug!("Goal {} is {:?}", goal_id, result.status);
                continue;
            }
            if !result.text.is_empty() {
                tracing::info!("Goal {} finished: {}", goal_id, result.text);
            }
            return Ok(result.status);
        }
    }

    async fn cancel_goal(&self, goal_id: Uuid) -> NavigationResult<()> {
        let message = CancelMessage {
            goal_id,
            client_id: self.client_id.clone(),
        };
        let payload = serde_json::to_string(&message)?;
        self.publish(&self.topics.cancel, &goal_id.to_string(), &payload)
            .await
    }

    async fn release(&self) {
        self.status_consumer.unsubscribe();
        self.result_consumer.unsubscribe();
        if let Err(e) = self.producer.flush(Duration::from_secs(2)) {
            tracing::warn!("Failed to flush Kafka producer: {}", e);
        }
    }
}

fn reply_consumer(brokers: &str, client_id: &str, role: &str) -> NavigationResult<StreamConsumer> {
    ClientConfig::new()
        .set("group.id", format!("{}-{}-{}", client_id, role, Uuid::new_v4()))
        .set("bootstrap.servers", brokers)
        .set("client.id", client_id)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "latest")
        .create()
        .map_err(|e| transport(&format!("Failed to create {} consumer", role), e))
}

fn transport(context: &str, error: impl std::fmt::Display) -> NavigationError {
    NavigationError::Transport(format!("{}: {}", context, error))
}
