//! Database models and queries

pub mod init;
pub mod models;
pub mod tags;

pub use init::*;
pub use models::*;
pub use tags::*;
