pub mod database;
pub mod profile;
pub mod user;

pub use database::*;
pub use profile::*;
pub use user::*;
