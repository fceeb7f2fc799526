//! 配置值验证模块
//!
//! 启动前检查静态配置，拒绝无法运行的组合。

use super::StaticConfig;
use crate::errors::{Result, ShortkeyError};

const LOG_FORMATS: &[&str] = &["text", "json"];

impl StaticConfig {
    /// 验证配置是否可用
    pub fn validate(&self) -> Result<()> {
        if self.keys.length == 0 {
            return Err(ShortkeyError::config("keys.length must be at least 1"));
        }
        if self.keys.max_attempts == 0 {
            return Err(ShortkeyError::config("keys.max_attempts must be at least 1"));
        }
        // 端口 0 由系统分配，允许两者同时为 0
        if self.server.http_port != 0 && self.server.http_port == self.server.registration_port {
            return Err(ShortkeyError::config(format!(
                "server.http_port and server.registration_port are both {}",
                self.server.http_port
            )));
        }
        if self.server.workers == 0 {
            return Err(ShortkeyError::config("server.workers must be at least 1"));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ShortkeyError::config(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }
}
