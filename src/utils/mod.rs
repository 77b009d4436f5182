pub mod shutdown;
mod util;

pub use shutdown::*;
pub use util::*;
