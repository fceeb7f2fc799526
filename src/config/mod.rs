//! Static configuration
//!
//! Loaded once at startup from an optional TOML file and `SHORTKEY__*`
//! environment variables, then passed down explicitly.

mod structs;
mod validators;

pub use structs::*;
