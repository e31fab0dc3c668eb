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


//! Console I/O seam
//!
//! An interpreter's console layer only needs "next input byte, if any" and
//! "emit this byte". [`ConsoleIo`] captures exactly that, so the same console
//! code can run on a serial line, the network bridge, or a test double.

use crate::Bridge;
use std::sync::Arc;

/// Non-blocking byte console
pub trait ConsoleIo: Send + Sync {
    /// Next input byte, or `None` if nothing is pending. Must not block.
    fn rx(&self) -> Option<u8>;

    /// Emit one output byte, best effort. Must not block.
    fn tx(&self, byte: u8);

    /// Emit a run of bytes
    fn tx_bytes(&self, bytes: &[u8]) {
        for &byte in bytes {
            self.tx(byte);
        }
    }

    /// Emit a string as-is
    fn tx_str(&self, text: &str) {
        self.tx_bytes(text.as_bytes());
    }

    /// Emit a string, turning every `\n` into `\r\n`
    fn tx_str_cooked(&self, text: &str) {
        let mut lines = text.as_bytes().split(|&byte| byte == b'\n');
        if let Some(first) = lines.next() {
            self.tx_bytes(first);
        }
        for line in lines {
            self.tx_bytes(b"\r\n");
            self.tx_bytes(line);
        }
    }
}

impl ConsoleIo for Bridge {
    fn rx(&self) -> Option<u8> {
        Bridge::rx(self)
    }

    fn tx(&self, byte: u8) {
        Bridge::tx(self, byte);
    }

    fn tx_bytes(&self, bytes: &[u8]) {
        Bridge::tx_bytes(self, bytes);
    }
}

impl<T: ConsoleIo + ?Sized> ConsoleIo for Arc<T> {
    fn rx(&self) -> Option<u8> {
        (**self).rx()
    }

    fn tx(&self, byte: u8) {
        (**self).tx(byte);
    }

    fn tx_bytes(&self, bytes: &[u8]) {
        (**self).tx_bytes(bytes);
    }
}
