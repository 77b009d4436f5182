pub mod cors;
pub mod logging;
pub mod request_tracker;

pub use cors::*;
pub use request_tracker::*;
