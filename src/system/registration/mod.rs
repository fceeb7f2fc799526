//! TCP registration front end
//!
//! Clients send one URL per connection and get back the generated key.

pub mod protocol;
pub mod server;

pub use protocol::{Reply, handle_line};
pub use server::{bind_registration_listener, handle_connection, start_registration_server};
