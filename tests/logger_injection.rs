use std::sync::{Arc, Mutex};

use waypoint_navigator::adapters::outbound::{
    init_console_logger, init_noop_logger, MultiLogger, StaticMissionSource,
    SimulatedNavigationBackend,
};
use waypoint_navigator::application::MissionExecutor;
use waypoint_navigator::domains::logger::{DynLogger, MissionLogger};
use waypoint_navigator::domains::{ClientSettings, NavigationClient};

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl MissionLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[test]
fn test_multi_and_noop_logger() {
    let first = Arc::new(BridgeCapture::new());
    let second = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(vec![
        first.clone() as DynLogger,
        second.clone() as DynLogger,
    ]);

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&first, &second] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }

    // No-op and console loggers should accept calls and not panic
    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");

    let console = init_console_logger();
    console.info("console smoke test");
}

#[tokio::test]
async fn test_injected_logger_sees_whole_mission() {
    let capture = Arc::new(BridgeCapture::new());
    let logger = Arc::new(MultiLogger::new(vec![capture.clone() as DynLogger, init_noop_logger()]))
        as DynLogger;

    let backend = Arc::new(SimulatedNavigationBackend::new("move_base"));
    let mut client = NavigationClient::connect(backend, ClientSettings::default(), logger.clone())
        .await
        .unwrap();
    let source = StaticMissionSource::new("inline", "waypoints: [[1.0, 2.0]]");
    MissionExecutor::new(Arc::new(source), logger)
        .with_settle_delay(std::time::Duration::ZERO)
        .run(&mut client)
        .await
        .unwrap();

    let msgs = capture.messages.lock().unwrap();
    assert!(msgs.first().unwrap().contains("Waiting for navigation server"));
    assert!(msgs.iter().any(|m| m == "INFO:Heading to goal: X=1, Y=2"));
    assert_eq!(msgs.last().unwrap(), "INFO:All waypoints processed");
}
