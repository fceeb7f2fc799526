//! Registration server
//!
//! Accepts TCP connections and answers exactly one request line on each.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::protocol::{decode_line, handle_line};
use crate::errors::{Result, ShortkeyError};
use crate::storage::UrlStore;

/// Bind the registration listener.
///
/// A bind failure is fatal for the process, so it is reported as
/// [`ShortkeyError::Bind`] rather than logged here.
pub async fn bind_registration_listener(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ShortkeyError::bind(format!("registration listener on {}: {}", addr, e)))
}

/// Start the registration server
///
/// Spawns the accept loop as a background task. Every accepted connection is
/// handled on its own task; the loop never waits for a handler.
pub fn start_registration_server(
    listener: TcpListener,
    store: Arc<UrlStore>,
) -> tokio::task::JoinHandle<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Registration server listening on tcp://{}", addr);
    }

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        handle_connection(stream, peer, store).await;
                    });
                }
                Err(e) => {
                    warn!("Failed to accept registration connection: {}", e);
                }
            }
        }
    })
}

/// Handle a single registration connection
///
/// Reads up to the first newline (or EOF), writes one reply and shuts the
/// write side down.
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, store: Arc<UrlStore>)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut raw = Vec::new();

    // 读取失败时按已读到的内容处理
    if let Err(e) = reader.read_until(b'\n', &mut raw).await {
        debug!("Registration read error from {}: {}", peer, e);
    }

    let line = decode_line(&raw);
    let reply = handle_line(&store, &line);
    debug!("Registration from {}: {:?}", peer, reply);

    let mut stream = reader.into_inner();
    if let Err(e) = stream.write_all(reply.render().as_bytes()).await {
        debug!("Failed to send registration reply to {}: {}", peer, e);
        return;
    }
    if let Err(e) = stream.shutdown().await {
        debug!("Failed to close registration connection to {}: {}", peer, e);
    }
}
