use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

use waypoint_navigator::adapters::outbound::{install_config_dir, FilesystemMissionSource};
use waypoint_navigator::domains::logger::MissionLogger;
use waypoint_navigator::domains::{load_mission, MissionSource, Waypoint};
use waypoint_navigator::MissionLoadError;

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

fn write_mission(dir: &std::path::Path, body: &str) -> FilesystemMissionSource {
    fs::write(dir.join("mission.yaml"), body).unwrap();
    FilesystemMissionSource::new(Some(dir.to_path_buf()), "mission.yaml")
}

#[test]
fn test_load_from_disk_preserves_order() {
    let dir = tempdir().unwrap();
    let source = write_mission(
        dir.path(),
        "# kobuki patrol\nwaypoints:\n  - [1.0, 2.0]\n  - [3.0, -1.5]\n  - [1.0, 2.0]\n",
    );
    let capture = BridgeCapture::new();

    let plan = load_mission(&source, &capture).unwrap();

    assert_eq!(
        plan.waypoints(),
        &[
            Waypoint::new(1.0, 2.0),
            Waypoint::new(3.0, -1.5),
            Waypoint::new(1.0, 2.0)
        ]
    );
    let msgs = capture.messages.lock().unwrap();
    assert!(msgs[0].contains(&source.location()));
    assert!(msgs.iter().any(|m| m.contains("Mission file loaded: 3 waypoint(s)")));
    assert!(msgs.iter().all(|m| !m.starts_with("ERR:")));
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = tempdir().unwrap();
    let source = FilesystemMissionSource::new(Some(dir.path().to_path_buf()), "mission.yaml");
    let capture = BridgeCapture::new();

    let err = load_mission(&source, &capture).unwrap_err();

    match err {
        MissionLoadError::ConfigUnreadable { location, source: io } => {
            assert!(location.ends_with("mission.yaml"));
            assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {}", other),
    }
    // the loader leaves error reporting to its caller
    assert!(capture.messages.lock().unwrap().iter().all(|m| !m.starts_with("ERR:")));
}

#[test]
fn test_failure_kinds_are_distinguishable() {
    let dir = tempdir().unwrap();
    let capture = BridgeCapture::new();

    let source = write_mission(dir.path(), "waypoints: {x: 1}\n");
    assert!(matches!(
        load_mission(&source, &capture),
        Err(MissionLoadError::ConfigMalformed { .. })
    ));

    let source = write_mission(dir.path(), "targets:\n  - [1.0, 2.0]\n");
    assert!(matches!(
        load_mission(&source, &capture),
        Err(MissionLoadError::ConfigMissingWaypoints)
    ));

    let source = write_mission(dir.path(), "waypoints: []\n");
    assert!(matches!(
        load_mission(&source, &capture),
        Err(MissionLoadError::ConfigEmptyWaypoints)
    ));
}

#[test]
fn test_error_messages_name_the_cause() {
    let missing = MissionLoadError::ConfigMissingWaypoints.to_string();
    let empty = MissionLoadError::ConfigEmptyWaypoints.to_string();
    assert!(missing.contains("no 'waypoints'"));
    assert!(empty.contains("empty"));
    assert!(MissionLoadError::ConfigMissingWaypoints.is_missing_waypoints());
    assert!(MissionLoadError::ConfigEmptyWaypoints.is_missing_waypoints());
}

#[test]
fn test_default_location_is_anchored_on_executable() {
    let exe = std::env::current_exe().unwrap();
    let expected: PathBuf = install_config_dir(&exe);

    // Does not depend on the working directory.
    assert!(expected.is_absolute());
    assert!(expected.ends_with("config"));
    let exe_dir = exe.canonicalize().unwrap().parent().unwrap().to_path_buf();
    assert_eq!(expected.parent(), exe_dir.parent());
}
