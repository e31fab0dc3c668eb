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


//! Bridge configuration

use crate::{BridgeError, Result};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// Conventional port for the raw (non-telnet) console variant.
pub const RAW_PORT: u16 = 2323;

/// Wire behaviour of the bridge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BridgeMode {
    /// Telnet framing: preamble on connect, negotiation, `0xFF` stuffing
    #[default]
    Telnet,
    /// Bytes pass through untouched in both directions
    Raw,
}

impl fmt::Display for BridgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeMode::Telnet => write!(f, "telnet"),
            BridgeMode::Raw => write!(f, "raw"),
        }
    }
}

/// Bridge configuration
///
/// The listen address is the only setting most deployments touch; the rest
/// exist for tests and unusual hosts.
///
/// # Example
///
/// ```
/// use rrepl_service::{BridgeConfig, BridgeMode};
///
/// let config = BridgeConfig::default()
///     .with_port(2300)
///     .with_mode(BridgeMode::Raw);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Address to listen on
    pub bind_address: SocketAddr,

    /// Telnet or raw byte pass-through
    pub mode: BridgeMode,

    /// Listen backlog; one pending client is enough for a single-seat console
    pub backlog: u32,

    /// Upper bound on bytes pulled from the socket by one non-blocking read
    pub read_chunk_size: usize,

    /// Pause after a failed `accept` before trying again
    pub accept_backoff: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 23)),
            mode: BridgeMode::Telnet,
            backlog: 1,
            read_chunk_size: 100,
            accept_backoff: Duration::from_millis(100),
        }
    }
}

impl BridgeConfig {
    /// Create a new telnet configuration with the given bind address
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Raw pass-through configuration on [`RAW_PORT`]
    pub fn raw() -> Self {
        Self::default().with_port(RAW_PORT).with_mode(BridgeMode::Raw)
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    /// Keep the bind IP, change the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_address.set_port(port);
        self
    }

    /// Set the wire mode
    pub fn with_mode(mut self, mode: BridgeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the listen backlog
    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Set the per-read chunk size
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    /// Set the accept retry backoff
    pub fn with_accept_backoff(mut self, backoff: Duration) -> Self {
        self.accept_backoff = backoff;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backlog == 0 {
            return Err(BridgeError::InvalidConfig(
                "backlog must be greater than 0".to_string(),
            ));
        }

        if self.read_chunk_size == 0 {
            return Err(BridgeError::InvalidConfig(
                "read_chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.accept_backoff.is_zero() {
            return Err(BridgeError::InvalidConfig(
                "accept_backoff must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
