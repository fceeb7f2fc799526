//! System-level modules
//!
//! - Logging initialization
//! - TCP registration front end

pub mod logging;
pub mod registration;
