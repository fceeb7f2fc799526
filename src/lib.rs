//! shortkey - a tiny URL shortener
//!
//! Links are registered over a line-based TCP protocol and resolved over
//! HTTP with `302 Found` redirects. Both front ends share one in-memory
//! [`storage::UrlStore`].
//!
//! # Architecture
//! - `storage`: key generation and the mutex-guarded key → URL map
//! - `api`: HTTP redirect handler
//! - `system`: TCP registration front end, logging
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: startup, shutdown and the server mode
//! - `cli`: command-line arguments

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod storage;
pub mod system;
pub mod utils;
