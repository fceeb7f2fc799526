//! 短码生成器
//!
//! Draws fixed-length keys from a small alphabet and remembers every key it
//! has handed out, so a generator instance never issues the same key twice.

use std::collections::HashSet;

use crate::errors::{Result, ShortkeyError};

/// 短码字符集：小写字母 + 数字 1-9（不含 0）
pub const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz123456789";

pub const DEFAULT_KEY_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1024;

/// Random key generator with an issued-key set.
///
/// Not synchronized: callers that share a generator must serialize access
/// (see [`super::UrlStore`]).
#[derive(Debug)]
pub struct KeyGenerator {
    issued: HashSet<String>,
    length: usize,
    max_attempts: u32,
}

impl KeyGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        Self {
            issued: HashSet::new(),
            length,
            max_attempts,
        }
    }

    /// Generate a key that this instance has never issued before.
    ///
    /// Gives up with [`ShortkeyError::KeySpaceExhausted`] after
    /// `max_attempts` consecutive collisions, or immediately when every
    /// possible key is already taken.
    pub fn generate(&mut self) -> Result<String> {
        if self.length == 0 || self.issued_count() as u128 >= self.capacity() {
            return Err(ShortkeyError::key_space_exhausted(format!(
                "all {} keys of length {} are taken",
                self.capacity(),
                self.length
            )));
        }

        for _ in 0..self.max_attempts {
            let key = random_key(self.length);
            // insert 返回 false 表示已被占用
            if self.issued.insert(key.clone()) {
                return Ok(key);
            }
        }

        Err(ShortkeyError::key_space_exhausted(format!(
            "no free key found after {} attempts ({} issued)",
            self.max_attempts,
            self.issued_count()
        )))
    }

    /// Number of distinct keys of the configured length.
    pub fn capacity(&self) -> u128 {
        (KEY_ALPHABET.len() as u128).saturating_pow(self.length as u32)
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

fn random_key(length: usize) -> String {
    std::iter::repeat_with(|| KEY_ALPHABET[rand::random_range(0..KEY_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 判断字符串是否可能是本生成器产生的短码
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| KEY_ALPHABET.contains(&b))
}
