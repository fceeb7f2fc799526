use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::debug;

use crate::config::StaticConfig;
use crate::storage::UrlStore;
use crate::system::registration::bind_registration_listener;

pub struct StartupContext {
    pub store: Arc<UrlStore>,
    pub registration_listener: TcpListener,
}

/// 准备服务器启动的上下文
///
/// 创建共享的 UrlStore 并绑定 TCP 注册端口。端口绑定失败直接返回错误。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = Arc::new(UrlStore::from_config(&config.keys));
    debug!(
        "UrlStore created (key length {}, max attempts {})",
        config.keys.length, config.keys.max_attempts
    );

    let registration_listener = bind_registration_listener(&config.registration_bind_address())
        .await
        .context("Failed to start registration front end")?;

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        registration_listener,
    })
}
