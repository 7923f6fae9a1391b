mod http;
mod offline;
pub use http::*;
pub use offline::*;
