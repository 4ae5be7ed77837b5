pub mod conversions;
pub mod device_handler;
pub mod error;
pub mod extract;
pub mod organization_handler;
pub mod room_handler;
pub mod router;
pub mod server;
pub mod state;

pub use error::*;
pub use extract::*;
pub use router::*;
pub use server::*;
pub use state::*;
