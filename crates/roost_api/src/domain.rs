mod device_service;
mod organization_service;
mod room_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use device_service::*;
pub use organization_service::*;
pub use room_service::*;
