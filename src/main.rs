use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use waypoint_navigator::adapters::outbound::{
    flush_file_logger, init_combined_logger, FilesystemMissionSource, SimulatedNavigationBackend,
};
use waypoint_navigator::application::MissionExecutor;
use waypoint_navigator::config::BackendKind;
use waypoint_navigator::domains::{DynLogger, MissionSource, NavigationBackend, NavigationClient};
use waypoint_navigator::{ApplicationResult, Config};

#[derive(Parser, Debug)]
#[command(
    name = "waypoint-navigator",
    version,
    about = "Visit the waypoints of a mission file through a navigation action server"
)]
struct Cli {
    /// Settings file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the mission file
    #[arg(long)]
    mission_dir: Option<PathBuf>,

    /// Use the in-process simulated navigation server
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref()).await?;

    // fast_log owns the `log` facade, so tracing goes in without the log bridge.
    let logger = init_combined_logger(&config.logging.file);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waypoint_navigator=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("waypoint-navigator v{}", env!("CARGO_PKG_VERSION"));

    let mission_dir = cli.mission_dir.or_else(|| config.mission.directory.clone());
    let source: Arc<dyn MissionSource> = Arc::new(FilesystemMissionSource::new(
        mission_dir,
        &config.mission.file_name,
    ));
    let backend = build_backend(&config, cli.simulate)?;

    let outcome = tokio::select! {
        result = run_mission(&config, backend.clone(), source, logger) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, releasing navigation backend");
            backend.release().await;
            Ok(())
        }
    };

    flush_file_logger();
    outcome.map_err(Into::into)
}

async fn run_mission(
    config: &Config,
    backend: Arc<dyn NavigationBackend>,
    source: Arc<dyn MissionSource>,
    logger: DynLogger,
) -> ApplicationResult<()> {
    let mut client =
        NavigationClient::connect(backend, config.client_settings(), logger.clone()).await?;

    let executor = MissionExecutor::new(source, logger).with_settle_delay(config.settle_delay());
    match executor.run(&mut client).await {
        Ok(report) => tracing::debug!(
            "{} of {} waypoint(s) reached",
            report.reached(),
            report.total()
        ),
        Err(e) => tracing::debug!("Mission not started: {}", e),
    }

    client.shutdown().await;
    Ok(())
}

fn build_backend(config: &Config, simulate: bool) -> ApplicationResult<Arc<dyn NavigationBackend>> {
    let kind = if simulate {
        BackendKind::Simulated
    } else {
        config.navigation.backend
    };

    match kind {
        BackendKind::Simulated => Ok(Arc::new(
            SimulatedNavigationBackend::new(config.navigation.action_name.clone())
                .with_startup_delay(Duration::from_millis(500))
                .with_travel_time(Duration::from_secs(2)),
        )),
        BackendKind::Kafka => kafka_backend(config),
    }
}

#[cfg(feature = "kafka")]
fn kafka_backend(config: &Config) -> ApplicationResult<Arc<dyn NavigationBackend>> {
    let backend = waypoint_navigator::adapters::outbound::KafkaNavigationBackend::new(
        &config.kafka,
        &config.navigation.action_name,
    )?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "kafka"))]
fn kafka_backend(_config: &Config) -> ApplicationResult<Arc<dyn NavigationBackend>> {
    Err(waypoint_navigator::ApplicationError::Configuration(anyhow::anyhow!(
        "built without the `kafka` feature; use --simulate or backend = \"simulated\""
    )))
}
