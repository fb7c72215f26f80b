pub mod loader;
pub mod ports;
pub mod types;

pub use loader::*;
pub use ports::*;
pub use types::*;
