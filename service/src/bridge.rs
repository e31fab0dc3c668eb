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


//! The console-facing bridge

use crate::transport::{ReadOutcome, Transport};
use crate::{BridgeConfig, BridgeMetrics, BridgeMode, ConnectionId, ConnectionInfo};
use bytes::BytesMut;
use metrics::counter;
use rrepl_telnetcodec::{FramerEvent, TelnetFramer, consts};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpStream;
use tokio_util::codec::Encoder;
use tracing::{debug, info, instrument, warn};

/// Connection and decode state, always locked together.
struct BridgeState {
    transport: Transport,
    framer: TelnetFramer,
    outgoing: BytesMut,
}

/// Shared handle to the console bridge.
///
/// A `Bridge` stands in for a serial line: the console pulls input with
/// [`Bridge::rx`] and pushes output with [`Bridge::tx`], and neither call ever
/// blocks. Cloning is cheap; every clone drives the same connection.
///
/// The connection, its receive buffer and the Telnet decode state sit behind
/// one mutex. Accepting a new client, reading and writing all serialize on
/// it, so a byte is always exchanged with a live connection whose decode
/// state belongs to it.
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
///     std::thread::spawn(move || loop {
///         match bridge.rx() {
///             Some(byte) => bridge.tx(byte),
///             None => std::thread::sleep(std::time::Duration::from_millis(10)),
///         }
///     });
///     server.run().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<Mutex<BridgeState>>,
    mode: BridgeMode,
    metrics: Arc<BridgeMetrics>,
    next_id: Arc<AtomicU64>,
}

impl Bridge {
    /// Create a bridge with no client attached
    pub fn new(config: &BridgeConfig) -> Self {
        let metrics = Arc::new(BridgeMetrics::new());
        Self {
            shared: Arc::new(Mutex::new(BridgeState {
                transport: Transport::new(config.read_chunk_size, metrics.clone()),
                framer: TelnetFramer::new(),
                outgoing: BytesMut::with_capacity(64),
            })),
            mode: config.mode,
            metrics,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wire mode this bridge speaks
    pub fn mode(&self) -> BridgeMode {
        self.mode
    }

    /// Bridge metrics
    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        self.metrics.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        // The state is consistent after every statement, so a panic elsewhere
        // cannot leave it half-updated.
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach `stream` as the console connection, evicting any current client.
    ///
    /// The decode state is reset and, in telnet mode, the negotiation preamble
    /// is sent before the lock is released. The stream should already be
    /// writable so the preamble is not dropped.
    #[instrument(skip_all, fields(peer_addr = %peer_addr))]
    pub fn install(&self, stream: TcpStream, peer_addr: SocketAddr) -> ConnectionId {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);

        let mut state = self.lock();
        let replaced = state.transport.install(stream, peer_addr, id);
        state.framer.reset();
        if self.mode == BridgeMode::Telnet {
            state.transport.write_raw(&consts::PREAMBLE);
        }
        drop(state);

        info!(connection = %id, replaced, mode = %self.mode, "Console client attached");
        id
    }

    /// Next decoded input byte, or `None` if nothing is available.
    ///
    /// Negotiation requests found along the way are answered inline. Returns
    /// `None` without waiting when the socket has nothing buffered, when the
    /// connection was just lost, or when no client is attached.
    pub fn rx(&self) -> Option<u8> {
        let mut state = self.lock();
        let BridgeState {
            transport, framer, ..
        } = &mut *state;

        loop {
            match transport.read_byte() {
                ReadOutcome::Byte(byte) if self.mode == BridgeMode::Raw => return Some(byte),
                ReadOutcome::Byte(byte) => match framer.step(byte) {
                    Some(FramerEvent::Data(data)) => return Some(data),
                    Some(FramerEvent::Respond(reply)) => {
                        transport.write_raw(&reply);
                        self.metrics.negotiation_reply();
                        counter!("rrepl.negotiation.replies").increment(1);
                    }
                    None => {}
                },
                ReadOutcome::Closed => {
                    framer.reset();
                    return None;
                }
                ReadOutcome::Empty => return None,
            }
        }
    }

    /// Send one output byte, best effort.
    ///
    /// In telnet mode `0xFF` goes out as `0xFF 0xFF`. Output is silently
    /// dropped when no client is attached or the socket is full.
    pub fn tx(&self, byte: u8) {
        self.tx_bytes(&[byte]);
    }

    /// Send a run of output bytes under a single lock acquisition.
    pub fn tx_bytes(&self, bytes: &[u8]) {
        let mut state = self.lock();
        match self.mode {
            BridgeMode::Raw => state.transport.write_raw(bytes),
            BridgeMode::Telnet => {
                let BridgeState {
                    transport,
                    framer,
                    outgoing,
                } = &mut *state;
                outgoing.clear();
                if let Err(err) = framer.encode(bytes, outgoing) {
                    warn!("Unable to encode console output: {}", err);
                    return;
                }
                transport.write_raw(&outgoing[..]);
            }
        }
    }

    /// Close the current client, if any.
    pub fn disconnect(&self) -> bool {
        let mut state = self.lock();
        state.framer.reset();
        let closed = state.transport.close_if_present();
        if closed {
            debug!("Console client disconnected locally");
        }
        closed
    }

    /// Check if a client is attached
    pub fn is_connected(&self) -> bool {
        self.lock().transport.is_connected()
    }

    /// Snapshot of the attached client
    pub fn connection(&self) -> Option<ConnectionInfo> {
        self.lock().transport.info()
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("mode", &self.mode)
            .field("connection", &self.connection())
            .finish()
    }
}
