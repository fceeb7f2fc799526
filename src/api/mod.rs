//! HTTP API
//!
//! Only the redirect handler lives here; links are registered over TCP.

pub mod services;
