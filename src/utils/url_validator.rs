//! URL 验证模块
//!
//! 检查提交的 URL 是否是语法合法的请求 URI：
//! 以 `/` 开头的路径，或带 scheme 的绝对 URI。

use url::Url;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    ControlCharacter,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::ControlCharacter => write!(f, "URL contains a control character"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证输入是否可以作为请求 URI
///
/// 检查项目：
/// 1. 不为空
/// 2. 不含 ASCII 控制字符
/// 3. 以 `/` 开头的 origin-form 路径只检查百分号转义
/// 4. 否则必须能解析为带 scheme 的绝对 URI
///
/// 查询串之前的 `%` 必须跟两位十六进制数字。
/// `scheme://` 后的 authority 允许为空（如 `http://`）。
/// 输入不做 trim，前后的空白会导致解析失败。
pub fn validate_request_uri(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // url crate 会静默去掉制表符和换行，这里先拦截
    if input.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    if input.starts_with('/') {
        return check_percent_escapes(input);
    }

    if input.starts_with(' ') || input.ends_with(' ') {
        return Err(UrlValidationError::InvalidFormat(
            "leading or trailing whitespace".to_string(),
        ));
    }

    // opaque URI（如 mailto:）不做转义检查
    if let Some(rest) = hierarchical_part(input) {
        check_percent_escapes(rest)?;

        // url crate 对 http 等特殊 scheme 拒绝空 host
        if let Some(authority) = rest.strip_prefix("//")
            && (authority.is_empty() || authority.starts_with(['/', '?']))
        {
            return Ok(());
        }
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(())
}

/// `scheme:` 之后以 `/` 开头的部分；scheme 非法或为 opaque 形式时返回 `None`
fn hierarchical_part(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    (valid_scheme && rest.starts_with('/')).then_some(rest)
}

/// 查询串之前的每个 `%` 都必须是完整的 `%XX` 转义
fn check_percent_escapes(input: &str) -> Result<(), UrlValidationError> {
    let head = input.split('?').next().unwrap_or(input).as_bytes();

    for (i, _) in head.iter().enumerate().filter(|&(_, &b)| b == b'%') {
        let escape = &head[i..head.len().min(i + 3)];
        if escape.len() < 3 || !escape[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(UrlValidationError::InvalidFormat(format!(
                "invalid URL escape {:?}",
                String::from_utf8_lossy(escape)
            )));
        }
    }

    Ok(())
}
