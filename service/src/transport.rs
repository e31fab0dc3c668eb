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


//! Raw byte I/O for the single active connection

use crate::{BridgeMetrics, ConnectionId, ConnectionInfo};
use bytes::{Buf, BytesMut};
use metrics::{counter, gauge};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Result of a non-blocking single-byte read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The next raw byte from the wire
    Byte(u8),
    /// Nothing buffered and the socket would block, or no client at all
    Empty,
    /// The peer closed or the socket failed; the connection is gone
    Closed,
}

struct ActiveConnection {
    id: ConnectionId,
    stream: TcpStream,
    peer_addr: SocketAddr,
    established_at: Instant,
    received: BytesMut,
}

/// Owner of the one live client socket.
///
/// Every operation returns immediately: reads report [`ReadOutcome::Empty`]
/// instead of waiting and writes drop whatever the socket will not take.
/// Received bytes are staged in a per-connection buffer, so nothing read
/// from one client can surface after it has been replaced.
pub struct Transport {
    connection: Option<ActiveConnection>,
    read_chunk_size: usize,
    metrics: Arc<BridgeMetrics>,
}

impl Transport {
    /// Create a transport with no connection
    pub fn new(read_chunk_size: usize, metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            connection: None,
            read_chunk_size: read_chunk_size.max(1),
            metrics,
        }
    }

    /// Make `stream` the active connection, closing any previous one.
    ///
    /// Returns `true` if an older connection was evicted.
    pub fn install(&mut self, stream: TcpStream, peer_addr: SocketAddr, id: ConnectionId) -> bool {
        let replaced = match self.connection.take() {
            Some(old) => {
                info!(
                    old = %old.id,
                    old_peer = %old.peer_addr,
                    new = %id,
                    "Replacing console connection"
                );
                self.metrics.connection_replaced();
                counter!("rrepl.connections.replaced").increment(1);
                drop(old);
                true
            }
            None => false,
        };

        if let Err(err) = stream.set_nodelay(true) {
            debug!(connection = %id, "Unable to disable Nagle: {}", err);
        }

        self.connection = Some(ActiveConnection {
            id,
            stream,
            peer_addr,
            established_at: Instant::now(),
            received: BytesMut::with_capacity(self.read_chunk_size),
        });
        self.metrics.connection_accepted();
        counter!("rrepl.connections.total").increment(1);
        gauge!("rrepl.connections.active").set(1.0);

        replaced
    }

    /// Pull the next raw byte without blocking.
    pub fn read_byte(&mut self) -> ReadOutcome {
        let Some(conn) = self.connection.as_mut() else {
            return ReadOutcome::Empty;
        };

        if conn.received.has_remaining() {
            return ReadOutcome::Byte(conn.received.get_u8());
        }

        conn.received.resize(self.read_chunk_size, 0);
        let result = conn.stream.try_read(&mut conn.received[..]);
        match result {
            Ok(0) => {
                conn.received.clear();
                self.lose(None);
                ReadOutcome::Closed
            }
            Ok(count) => {
                conn.received.truncate(count);
                trace!(connection = %conn.id, count, "Read from socket");
                self.metrics.bytes_received(count as u64);
                counter!("rrepl.bytes.received").increment(count as u64);
                ReadOutcome::Byte(conn.received.get_u8())
            }
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                conn.received.clear();
                ReadOutcome::Empty
            }
            Err(err) => {
                conn.received.clear();
                self.lose(Some(("read", err)));
                ReadOutcome::Closed
            }
        }
    }

    /// Best-effort write of `bytes`.
    ///
    /// Whatever the socket does not accept right away is dropped. A hard
    /// error closes the connection.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let Some(conn) = self.connection.as_mut() else {
            self.metrics.bytes_dropped(bytes.len() as u64);
            counter!("rrepl.bytes.dropped").increment(bytes.len() as u64);
            return;
        };

        let mut written = 0;
        let mut failure = None;
        while written < bytes.len() {
            match conn.stream.try_write(&bytes[written..]) {
                Ok(0) => break,
                Ok(count) => written += count,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        if written > 0 {
            self.metrics.bytes_sent(written as u64);
            counter!("rrepl.bytes.sent").increment(written as u64);
        }
        let dropped = bytes.len() - written;
        if dropped > 0 {
            trace!(connection = %conn.id, dropped, "Dropping console output");
            self.metrics.bytes_dropped(dropped as u64);
            counter!("rrepl.bytes.dropped").increment(dropped as u64);
        }

        if let Some(err) = failure {
            self.lose(Some(("write", err)));
        }
    }

    /// Close the active connection, if any.
    ///
    /// Returns `true` if a connection was closed.
    pub fn close_if_present(&mut self) -> bool {
        match self.connection.take() {
            Some(conn) => {
                debug!(
                    connection = %conn.id,
                    peer_addr = %conn.peer_addr,
                    uptime = ?conn.established_at.elapsed(),
                    "Closing console connection"
                );
                gauge!("rrepl.connections.active").set(0.0);
                true
            }
            None => false,
        }
    }

    /// Check if a client is attached
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Snapshot of the active connection
    pub fn info(&self) -> Option<ConnectionInfo> {
        self.connection.as_ref().map(|conn| ConnectionInfo {
            id: conn.id,
            peer_addr: conn.peer_addr,
            established_at: conn.established_at,
        })
    }

    /// Tear down after the peer went away. `failure` names the failed
    /// operation and its error; `None` is an orderly close.
    fn lose(&mut self, failure: Option<(&str, io::Error)>) {
        if let Some(info) = self.info() {
            match failure {
                None => info!(
                    connection = %info.id,
                    peer_addr = %info.peer_addr,
                    age = ?info.age(),
                    "Console client closed the connection"
                ),
                Some((operation, err)) => warn!(
                    connection = %info.id,
                    peer_addr = %info.peer_addr,
                    age = ?info.age(),
                    "Console connection lost, {} failed: {}",
                    operation,
                    err
                ),
            }
        }
        if self.close_if_present() {
            self.metrics.connection_lost();
            counter!("rrepl.connections.lost").increment(1);
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("connection", &self.info())
            .field("read_chunk_size", &self.read_chunk_size)
            .finish()
    }
}
