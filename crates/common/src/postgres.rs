mod client;
mod config;
mod device_repository;
mod errors;
mod organization_repository;
mod room_repository;

pub use client::*;
pub use config::*;
pub use device_repository::*;
pub use organization_repository::*;
pub use room_repository::*;
