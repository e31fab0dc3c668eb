//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Acceptor loop
//!
//! The [`BridgeServer`] owns the listening socket and hands every accepted
//! client to the [`Bridge`]. The newest client always wins: installing it
//! closes whoever was attached before.

use crate::{Bridge, BridgeConfig, Result};
use metrics::counter;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Listener feeding a [`Bridge`]
///
/// # Example
///
/// ```no_run
/// use rrepl_service::{BridgeConfig, BridgeServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = BridgeServer::bind(BridgeConfig::default()).await?;
///     let bridge = server.bridge();
///     let acceptor = server.spawn();
///
///     // Hand `bridge` to the console thread...
///     # drop(bridge);
///     acceptor.await?;
///     Ok(())
/// }
/// ```
pub struct BridgeServer {
    config: BridgeConfig,
    listener: TcpListener,
    local_addr: SocketAddr,
    bridge: Bridge,
}

impl BridgeServer {
    /// Bind the listening socket described by `config`.
    ///
    /// No client is accepted until [`BridgeServer::run`] or
    /// [`BridgeServer::spawn`] is called.
    pub async fn bind(config: BridgeConfig) -> Result<Self> {
        config.validate()?;

        let socket = if config.bind_address.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(config.bind_address)?;
        let listener = socket.listen(config.backlog)?;
        let local_addr = listener.local_addr()?;

        info!(
            "Console bridge bound to {} ({} mode, backlog {})",
            local_addr, config.mode, config.backlog
        );

        Ok(Self {
            bridge: Bridge::new(&config),
            config,
            listener,
            local_addr,
        })
    }

    /// The address actually bound
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle for the console consumer
    pub fn bridge(&self) -> Bridge {
        self.bridge.clone()
    }

    /// Get the server configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Accept clients for as long as the process lives.
    ///
    /// Accept failures are logged and retried after
    /// [`BridgeConfig::accept_backoff`]; this future never completes.
    pub async fn run(self) {
        info!("Accepting console clients on {}", self.local_addr);
        loop {
            match self.listener.accept().await {
                Ok((socket, peer_addr)) => self.admit(socket, peer_addr).await,
                Err(err) => {
                    error!("Failed to accept console client: {}", err);
                    self.bridge.metrics().accept_error();
                    counter!("rrepl.accept.errors").increment(1);
                    tokio::time::sleep(self.config.accept_backoff).await;
                }
            }
        }
    }

    /// Run the accept loop on the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn admit(&self, socket: TcpStream, peer_addr: SocketAddr) {
        debug!("Accepted connection from {}", peer_addr);
        // try_write reports WouldBlock until the reactor has seen the socket writable.
        if let Err(err) = socket.writable().await {
            warn!("Dropping connection from {}: {}", peer_addr, err);
            return;
        }
        self.bridge.install(socket, peer_addr);
    }
}

impl std::fmt::Debug for BridgeServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeServer")
            .field("local_addr", &self.local_addr)
            .field("mode", &self.config.mode)
            .field("bridge", &self.bridge)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BridgeError, BridgeMode};

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let config = BridgeConfig::new("127.0.0.1:0".parse().unwrap());
        let server = BridgeServer::bind(config).await.unwrap();

        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(server.bridge().mode(), BridgeMode::Telnet);
        assert!(!server.bridge().is_connected());
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_config() {
        let config = BridgeConfig::new("127.0.0.1:0".parse().unwrap()).with_backlog(0);
        let result = BridgeServer::bind(config).await;
        assert!(matches!(result, Err(BridgeError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_bind_address_in_use() {
        let first = BridgeServer::bind(BridgeConfig::new("127.0.0.1:0".parse().unwrap()))
            .await
            .unwrap();
        // Listening sockets cannot share a port even with SO_REUSEADDR.
        let config = BridgeConfig::new(first.local_addr());
        let result = BridgeServer::bind(config).await;
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
