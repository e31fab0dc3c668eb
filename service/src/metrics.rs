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


//! Lock-free metrics for the console bridge

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free bridge metrics
///
/// Counters are plain atomics so the console thread never waits on them.
/// The same events are also reported through the `metrics` facade by the
/// components that record them.
#[derive(Debug)]
pub struct BridgeMetrics {
    // Connection lifecycle
    connections_accepted: AtomicU64,
    connections_replaced: AtomicU64,
    connections_lost: AtomicU64,
    accept_errors: AtomicU64,

    // Throughput
    bytes_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_dropped: AtomicU64,
    negotiation_replies: AtomicU64,

    started_at: Instant,
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            connections_accepted: AtomicU64::new(0),
            connections_replaced: AtomicU64::new(0),
            connections_lost: AtomicU64::new(0),
            accept_errors: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_dropped: AtomicU64::new(0),
            negotiation_replies: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record a newly installed connection
    pub fn connection_accepted(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection evicted by a newer client
    pub fn connection_replaced(&self) {
        self.connections_replaced.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection torn down after a hard error or peer close
    pub fn connection_lost(&self) {
        self.connections_lost.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed `accept`
    pub fn accept_error(&self) {
        self.accept_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record raw bytes read from the socket
    pub fn bytes_received(&self, count: u64) {
        self.bytes_received.fetch_add(count, Ordering::Relaxed);
    }

    /// Record raw bytes written to the socket
    pub fn bytes_sent(&self, count: u64) {
        self.bytes_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record output discarded because it could not be written
    pub fn bytes_dropped(&self, count: u64) {
        self.bytes_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a negotiation reply sent to the peer
    pub fn negotiation_reply(&self) {
        self.negotiation_replies.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    ///
    /// Counters are read one by one, so a snapshot taken during traffic may
    /// be off by a few bytes between fields.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_replaced: self.connections_replaced.load(Ordering::Relaxed),
            connections_lost: self.connections_lost.load(Ordering::Relaxed),
            accept_errors: self.accept_errors.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_dropped: self.bytes_dropped.load(Ordering::Relaxed),
            negotiation_replies: self.negotiation_replies.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

/// A snapshot of bridge metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Connections installed since start
    pub connections_accepted: u64,
    /// Connections evicted by a newer client
    pub connections_replaced: u64,
    /// Connections torn down after loss
    pub connections_lost: u64,
    /// Failed `accept` calls
    pub accept_errors: u64,
    /// Raw bytes read from the wire
    pub bytes_received: u64,
    /// Raw bytes written to the wire
    pub bytes_sent: u64,
    /// Output bytes discarded
    pub bytes_dropped: u64,
    /// Negotiation replies sent
    pub negotiation_replies: u64,
    /// Time since the metrics were created
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Connections that ended for any reason
    pub fn connections_closed(&self) -> u64 {
        self.connections_replaced + self.connections_lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_connection_tracking() {
        let metrics = BridgeMetrics::new();

        metrics.connection_accepted();
        metrics.connection_accepted();
        metrics.connection_replaced();
        metrics.connection_lost();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connections_accepted, 2);
        assert_eq!(snapshot.connections_replaced, 1);
        assert_eq!(snapshot.connections_lost, 1);
        assert_eq!(snapshot.connections_closed(), 2);
    }

    #[test]
    fn test_throughput_tracking() {
        let metrics = BridgeMetrics::new();

        metrics.bytes_sent(100);
        metrics.bytes_received(200);
        metrics.bytes_dropped(3);
        metrics.negotiation_reply();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.bytes_sent, 100);
        assert_eq!(snapshot.bytes_received, 200);
        assert_eq!(snapshot.bytes_dropped, 3);
        assert_eq!(snapshot.negotiation_replies, 1);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = Arc::new(BridgeMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.bytes_sent(1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.snapshot().bytes_sent, 4000);
    }
}
