//! Mode routing
//!
//! The only execution mode is the server: both listeners in one process.

pub mod server;

pub use server::{build_http_server, run_server};
