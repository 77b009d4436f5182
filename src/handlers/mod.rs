pub mod auth_handler;
pub mod health_handler;
pub mod profile_handler;
pub mod spa_handler;
pub mod upload_handler;
pub mod view_handler;

pub use auth_handler::*;
pub use health_handler::*;
pub use profile_handler::*;
pub use spa_handler::*;
pub use upload_handler::*;
pub use view_handler::*;
