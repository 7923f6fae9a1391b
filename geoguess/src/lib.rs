pub use controller::*;
pub use errors::*;
pub use location::*;
pub use problem::*;
pub use protocol::*;
pub use round_state::*;
pub use service::*;
pub use session_state::*;

#[cfg(test)]
mod arbitrary;
mod controller;
mod errors;
mod location;
mod problem;
mod protocol;
mod round_state;
pub mod scoring;
mod service;
mod session_state;
