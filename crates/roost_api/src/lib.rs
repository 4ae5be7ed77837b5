pub mod domain;
pub mod http;
pub mod roost_api;

pub use domain::*;
pub use http::*;
pub use roost_api::*;
