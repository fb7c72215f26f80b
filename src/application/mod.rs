pub mod mission_executor;

pub use mission_executor::*;
