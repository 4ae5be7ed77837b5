mod authorization_gate;
mod config;
mod context;
mod jwt;
mod ownership_resolver;
mod traits;

pub use authorization_gate::*;
pub use config::*;
pub use context::*;
pub use jwt::*;
pub use ownership_resolver::*;
pub use traits::*;
