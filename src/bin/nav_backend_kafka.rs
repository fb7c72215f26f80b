// Simulated navigation action server speaking the Kafka wire protocol the
// runner's `KafkaNavigationBackend` expects. Goals are "driven" by the
// in-process simulated backend.

use chrono::Utc;
use clap::Parser;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use waypoint_navigator::adapters::outbound::{
    ActionTopics, CancelMessage, GoalMessage, ResultMessage, SimulatedNavigationBackend,
    StatusMessage,
};
use waypoint_navigator::domains::{GoalStatus, NavigationBackend};

const ASSIGNMENT_POLL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "nav_backend_kafka", about = "Simulated navigation action server over Kafka")]
struct Cli {
    #[arg(long, default_value = "localhost:9092")]
    brokers: String,

    /// Action server name; topics are derived from it
    #[arg(long, default_value = "move_base")]
    action: String,

    /// Seconds each goal takes to finish
    #[arg(long, default_value_t = 3.0)]
    travel_secs: f64,

    /// Probability that a goal is aborted
    #[arg(long, default_value_t = 0.0)]
    failure_rate: f64,

    /// Interval between status heartbeats in milliseconds
    #[arg(long, default_value_t = 1000)]
    heartbeat_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let server_id = format!("nav-sim-{}", Uuid::new_v4());
    let topics = ActionTopics::for_action(&cli.action);

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &cli.brokers)
        .set("client.id", &server_id)
        .set("message.timeout.ms", "5000")
        .create()
        .map_err(|e| format!("Failed to create Kafka producer: {}", e))?;

    let goal_consumer = server_consumer(&cli.brokers, &server_id, &topics.goal)?;
    let cancel_consumer = server_consumer(&cli.brokers, &server_id, &topics.cancel)?;

    let travel_time = Duration::try_from_secs_f64(cli.travel_secs.max(0.0))
        .map_err(|e| format!("Invalid --travel-secs {}: {}", cli.travel_secs, e))?;
    let simulator = Arc::new(
        SimulatedNavigationBackend::new(cli.action.clone())
            .with_travel_time(travel_time)
            .with_failure_rate(cli.failure_rate),
    );

    tracing::info!(
        "Navigation server {} serving '{}' (goals on {}, results on {})",
        server_id,
        cli.action,
        topics.goal,
        topics.result
    );

    // Clients treat the first heartbeat as readiness, so no heartbeat goes out
    // before both request consumers own their partitions.
    tokio::join!(
        await_assignment(&goal_consumer, &topics.goal),
        await_assignment(&cancel_consumer, &topics.cancel)
    );

    let heartbeat = tokio::spawn(publish_heartbeats(
        producer.clone(),
        topics.status.clone(),
        server_id.clone(),
        simulator.clone(),
        Duration::from_millis(cli.heartbeat_ms.max(1)),
    ));
    let cancels = tokio::spawn(serve_cancels(cancel_consumer, simulator.clone()));

    tokio::select! {
        _ = serve_goals(goal_consumer, producer.clone(), topics.result.clone(), simulator) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down navigation server {}", server_id);
        }
    }

    heartbeat.abort();
    cancels.abort();
    Ok(())
}

async fn serve_goals(
    consumer: StreamConsumer,
    producer: FutureProducer,
    result_topic: String,
    simulator: Arc<SimulatedNavigationBackend>,
) {
    loop {
        let Some(message) = next_message::<GoalMessage>(&consumer, "goal").await else {
            continue;
        };
        let position = message.goal.position();
        tracing::info!(
            "Goal {} from {}: ({:.2}, {:.2}) in '{}'",
            message.goal_id,
            message.client_id,
            position.x,
            position.y,
            message.goal.target_pose.header.frame_id
        );

        simulator.accept_goal(message.goal_id, &message.goal);
        let active = ResultMessage {
            goal_id: message.goal_id,
            status: GoalStatus::Active,
            text: String::new(),
        };
        publish(&producer, &result_topic, message.goal_id, &active).await;

        let producer = producer.clone();
        let result_topic = result_topic.clone();
        let simulator = simulator.clone();
        tokio::spawn(async move {
            let (status, text) = match simulator.wait_for_result(message.goal_id).await {
                Ok(status) => (status, format!("simulated goal finished as {:?}", status)),
                Err(e) => (GoalStatus::Lost, e.to_string()),
            };
            let result = ResultMessage {
                goal_id: message.goal_id,
                status,
                text,
            };
            publish(&producer, &result_topic, message.goal_id, &result).await;
            tracing::info!("Goal {} finished: {:?}", message.goal_id, status);
        });
    }
}

async fn serve_cancels(consumer: StreamConsumer, simulator: Arc<SimulatedNavigationBackend>) {
    loop {
        let Some(message) = next_message::<CancelMessage>(&consumer, "cancel").await else {
            continue;
        };
        tracing::info!(
            "Cancel requested for goal {} by {}",
            message.goal_id,
            message.client_id
        );
        if let Err(e) = simulator.cancel_goal(message.goal_id).await {
            tracing::warn!("Failed to cancel goal {}: {}", message.goal_id, e);
        }
    }
}

async fn publish_heartbeats(
    producer: FutureProducer,
    status_topic: String,
    server_id: String,
    simulator: Arc<SimulatedNavigationBackend>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let status = StatusMessage {
            server_id: server_id.clone(),
            stamp: Utc::now(),
            active_goals: simulator.active_goals(),
        };
        let payload = match serde_json::to_string(&status) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize status: {}", e);
                continue;
            }
        };
        let record = FutureRecord::to(&status_topic)
            .key(server_id.as_str())
            .payload(&payload);
        if let Err((e, _)) = producer.send(record, Duration::from_secs(5)).await {
            tracing::warn!("Failed to publish heartbeat: {}", e);
        }
    }
}

async fn await_assignment(consumer: &StreamConsumer, topic: &str) {
    loop {
        match consumer.assignment() {
            Ok(partitions) if partitions.count() > 0 => {
                tracing::debug!("Consumer for {} assigned", topic);
                return;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to query assignment for {}: {}", topic, e),
        }
        // Nothing is published to request topics before the first heartbeat.
        let _ = tokio::time::timeout(ASSIGNMENT_POLL, consumer.recv()).await;
    }
}

async fn next_message<T: serde::de::DeserializeOwned>(
    consumer: &StreamConsumer,
    kind: &str,
) -> Option<T> {
    let received = consumer
        .recv()
        .await
        .map(|message| message.payload().map(<[u8]>::to_vec));
    let payload = match received {
        Ok(payload) => payload?,
        Err(e) => {
            tracing::warn!("Failed to receive {} message: {}", kind, e);
            tokio::time::sleep(Duration::from_millis(200)).await;
            return None;
        }
    };
    match serde_json::from_slice(&payload) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("Ignoring malformed {} message: {}", kind, e);
            None
        }
    }
}

async fn publish<T: Serialize>(producer: &FutureProducer, topic: &str, goal_id: Uuid, message: &T) {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize message for goal {}: {}", goal_id, e);
            return;
        }
    };
    let key = goal_id.to_string();
    let record = FutureRecord::to(topic).key(&key).payload(&payload);
    if let Err((e, _)) = producer.send(record, Duration::from_secs(5)).await {
        tracing::error!("Failed to publish to {}: {}", topic, e);
    }
}

fn server_consumer(
    brokers: &str,
    server_id: &str,
    topic: &str,
) -> Result<StreamConsumer, Box<dyn std::error::Error>> {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("group.id", format!("{}-{}", server_id, topic))
        .set("bootstrap.servers", brokers)
        .set("enable.partition.eof", "false")
        .set("session.timeout.ms", "6000")
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "latest")
        .create()
        .map_err(|e| format!("Failed to create consumer for {}: {}", topic, e))?;
    consumer
        .subscribe(&[topic])
        .map_err(|e| format!("Failed to subscribe to {}: {}", topic, e))?;
    Ok(consumer)
}
