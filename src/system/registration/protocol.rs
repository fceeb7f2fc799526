//! Registration line protocol
//!
//! One request line in, one reply out:
//! ```text
//! client: https://example.com\n
//! server: key is k3x9ab\n
//! ```

use tracing::{debug, error};

use crate::errors::ShortkeyError;
use crate::storage::UrlStore;
use crate::utils::validate_request_uri;

pub const EMPTY_INPUT_MESSAGE: &str = "Don't send empty spaces!";
pub const INVALID_URL_PREFIX: &str = "Not a valid URL! ";
pub const KEY_REPLY_PREFIX: &str = "key is ";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Failed to generate key, try again later";

/// Outcome of one registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    EmptyInput,
    InvalidUrl(String),
    Registered(String),
    RegistrationFailed,
}

impl Reply {
    /// 回复给客户端的原始文本
    pub fn render(&self) -> String {
        match self {
            Reply::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            Reply::InvalidUrl(input) => format!("{}{}", INVALID_URL_PREFIX, input),
            Reply::Registered(key) => format!("{}{}\n", KEY_REPLY_PREFIX, key),
            Reply::RegistrationFailed => REGISTRATION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Decode the raw bytes read from a connection into the request line.
///
/// Invalid UTF-8 is replaced rather than rejected; exactly one trailing `\n`
/// is stripped.
pub fn decode_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    text.strip_suffix('\n').unwrap_or(&text).to_string()
}

/// Validate a request line and register it with the store.
pub fn handle_line(store: &UrlStore, line: &str) -> Reply {
    if line.trim().is_empty() {
        return Reply::EmptyInput;
    }

    if let Err(e) = validate_request_uri(line).map_err(ShortkeyError::from) {
        debug!("Rejected registration input {:?}: [{}] {}", line, e.code(), e);
        return Reply::InvalidUrl(line.to_string());
    }

    match store.register(line) {
        Ok(key) => Reply::Registered(key),
        Err(e) => {
            error!("Registration failed: {}", e);
            Reply::RegistrationFailed
        }
    }
}
