mod device;
mod device_validation;
mod ids;
mod organization;
mod result;
mod room;
mod store;

pub use device::*;
pub use device_validation::*;
pub use ids::*;
pub use organization::*;
pub use result::*;
pub use room::*;
pub use store::*;
