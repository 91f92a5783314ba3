pub mod analyze;
pub mod def;
pub mod opt;
pub mod verify;

pub use def::*;
