pub mod auth_service;
pub mod memory_store;
pub mod mysql_store;
pub mod profile_service;
pub mod session_cleaner;
pub mod store;
pub mod upload_service;

pub use auth_service::*;
pub use memory_store::*;
pub use mysql_store::*;
pub use profile_service::*;
pub use session_cleaner::*;
pub use store::*;
pub use upload_service::*;
