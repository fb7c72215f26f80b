pub mod logger;
pub mod mission;
pub mod navigation;

pub use logger::*;
pub use mission::*;
pub use navigation::*;
