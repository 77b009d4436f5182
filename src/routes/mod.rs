pub mod auth_routes;
pub mod health_routes;
pub mod profile_routes;
pub mod upload_routes;
pub mod view_routes;

pub use auth_routes::*;
pub use health_routes::*;
pub use profile_routes::*;
pub use upload_routes::*;
pub use view_routes::*;
