use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domains::mission::ports::MissionSource;

/// Environment variable overriding the mission directory.
pub const MISSION_DIR_ENV: &str = "WAYPOINT_MISSION_DIR";

/// Mission file read from disk.
pub struct FilesystemMissionSource {
    path: PathBuf,
}

impl FilesystemMissionSource {
    /// Precedence for the directory: `dir` argument -> `WAYPOINT_MISSION_DIR`
    /// -> the `config` directory beside the executable's own directory.
    pub fn new(dir: Option<PathBuf>, file_name: &str) -> Self {
        let dir = dir
            .or_else(|| env::var_os(MISSION_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| match env::current_exe() {
                Ok(exe) => install_config_dir(&exe),
                // No executable path to anchor on; stay relative rather than fail here.
                Err(_) => PathBuf::from("config"),
            });
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MissionSource for FilesystemMissionSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read_mission(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// `<exe dir>/../config`: executables live in `bin/` (or `target/<profile>/`)
/// and the mission data sits in a sibling `config/` directory.
pub fn install_config_dir(exe: &Path) -> PathBuf {
    let exe = exe.canonicalize().unwrap_or_else(|_| exe.to_path_buf());
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    let root = exe_dir.parent().unwrap_or(exe_dir);
    root.join("config")
}

/// Mission document held in memory, for embedding and tests.
pub struct StaticMissionSource {
    label: String,
    text: String,
}

impl StaticMissionSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl MissionSource for StaticMissionSource {
    fn location(&self) -> String {
        self.label.clone()
    }

    fn read_mission(&self) -> io::Result<String> {
        Ok(self.text.clone())
    }
}
