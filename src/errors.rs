use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortkeyError {
    KeySpaceExhausted(String),
    Validation(String),
    Bind(String),
    Io(String),
    Config(String),
}

impl ShortkeyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortkeyError::KeySpaceExhausted(_) => "E001",
            ShortkeyError::Validation(_) => "E002",
            ShortkeyError::Bind(_) => "E003",
            ShortkeyError::Io(_) => "E004",
            ShortkeyError::Config(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortkeyError::KeySpaceExhausted(_) => "Key Space Exhausted",
            ShortkeyError::Validation(_) => "Validation Error",
            ShortkeyError::Bind(_) => "Listener Bind Error",
            ShortkeyError::Io(_) => "I/O Error",
            ShortkeyError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortkeyError::KeySpaceExhausted(msg) => msg,
            ShortkeyError::Validation(msg) => msg,
            ShortkeyError::Bind(msg) => msg,
            ShortkeyError::Io(msg) => msg,
            ShortkeyError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于日志）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortkeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortkeyError {}

// 便捷的构造函数
impl ShortkeyError {
    pub fn key_space_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::KeySpaceExhausted(msg.into())
    }

    pub fn bind<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Bind(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Io(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortkeyError::Config(msg.into())
    }
}

impl From<std::io::Error> for ShortkeyError {
    fn from(err: std::io::Error) -> Self {
        ShortkeyError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for ShortkeyError {
    fn from(err: config::ConfigError) -> Self {
        ShortkeyError::Config(err.to_string())
    }
}

impl From<crate::utils::url_validator::UrlValidationError> for ShortkeyError {
    fn from(err: crate::utils::url_validator::UrlValidationError) -> Self {
        ShortkeyError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortkeyError>;
