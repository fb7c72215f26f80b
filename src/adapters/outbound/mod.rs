pub mod action_wire;
pub mod console_logger;
pub mod file_logger;
#[cfg(feature = "kafka")]
pub mod kafka_navigation;
pub mod mission_file;
pub mod multi_logger;
pub mod noop_logger;
pub mod simulated_navigation;

pub use action_wire::*;
pub use console_logger::*;
pub use file_logger::*;
#[cfg(feature = "kafka")]
pub use kafka_navigation::*;
pub use mission_file::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use simulated_navigation::*;
