pub mod dom;
pub mod navigator;
pub mod registry;
pub mod route_table;
pub mod upload_button;

pub use dom::*;
pub use navigator::*;
pub use registry::*;
pub use route_table::*;
pub use upload_button::*;
