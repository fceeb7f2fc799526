//! In-memory link storage
//!
//! - `key_generator`: random short keys with collision tracking
//! - `url_store`: the mutex-guarded key → URL map shared by both front ends

pub mod key_generator;
pub mod url_store;

pub use key_generator::{KEY_ALPHABET, KeyGenerator, is_valid_key};
pub use url_store::UrlStore;
