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


//! Telnet Console Bridge
//!
//! This crate exposes an interactive console (a read-eval-print loop) over a
//! TCP socket in place of a local serial line. Exactly one client is attached
//! at a time; a new client always evicts the old one.
//!
//! - Non-blocking `rx`/`tx` callable from any thread, runtime or not
//! - Minimal Telnet negotiation with server-side echo
//! - `0xFF` byte stuffing for transparent binary transfer
//! - A raw pass-through mode for clients that do not speak Telnet
//!
//! # Architecture
//!
//! ```text
//! BridgeServer (accept loop)
//!     ↓ install
//! Bridge ── Mutex ── Transport + TelnetFramer
//!     ↑ rx / tx
//! console consumer (ConsoleIo)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rrepl_service::{BridgeConfig, BridgeServer, ConsoleIo};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = BridgeServer::bind(BridgeConfig::default()).await?;
//!     let console = server.bridge();
//!     std::thread::spawn(move || {
//!         console.tx_str_cooked("console ready\n");
//!         // poll console.rx() from the interpreter loop
//!     });
//!     server.run().await;
//!     Ok(())
//! }
//! ```

mod bridge;
mod config;
mod console;
mod error;
mod metrics;
mod server;
mod transport;
mod types;

pub use self::bridge::Bridge;
pub use self::config::{BridgeConfig, BridgeMode, RAW_PORT};
pub use self::console::ConsoleIo;
pub use self::error::{BridgeError, Result};
pub use self::metrics::{BridgeMetrics, MetricsSnapshot};
pub use self::server::BridgeServer;
pub use self::transport::{ReadOutcome, Transport};
pub use self::types::{ConnectionId, ConnectionInfo};
