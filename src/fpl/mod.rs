//! Fantasy Premier League API access: the async trait the façade drives and
//! its reqwest implementation.

pub mod api;
pub mod http;
pub mod types;

pub use api::FplApi;
pub use http::FplClient;
