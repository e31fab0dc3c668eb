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


//! # rrepl Telnet Framer
//!
//! A deliberately small subset of the Telnet protocol (RFC 854) for carrying an
//! interactive console over TCP. It covers exactly what a line-printer style
//! console needs:
//!
//! - **Data transmission**: raw bytes, with `0xFF` escaped as `IAC IAC` on the wire
//! - **Option negotiation**: answers `DO ECHO`, `DO SUPPRESS-GO-AHEAD` and `DO STATUS`,
//!   silently swallows every other command
//! - **Session preamble**: [`consts::PREAMBLE`] announces server-side echo
//!
//! ## Core Components
//!
//! ### [`TelnetFramer`]
//!
//! A byte-at-a-time state machine ([`TelnetFramer::step`]) that also implements
//! [`Decoder`] and [`Encoder`] from `tokio_util::codec`, so the same type can sit
//! behind a `Framed` stream or be driven by hand from a non-blocking poll loop.
//!
//! ### [`FramerEvent`]
//!
//! What a received byte turned into: a data byte for the consumer, or a reply that
//! has to be written back to the peer.
//!
//! ## Usage Example
//!
//! ```rust
//! use rrepl_telnetcodec::{FramerEvent, TelnetFramer};
//!
//! let mut framer = TelnetFramer::new();
//! let mut data = Vec::new();
//! let mut replies = Vec::new();
//! for byte in b"hi\xFF\xFD\x01\xFF\xFF" {
//!     match framer.step(*byte) {
//!         Some(FramerEvent::Data(byte)) => data.push(byte),
//!         Some(FramerEvent::Respond(reply)) => replies.extend_from_slice(&reply),
//!         None => {}
//!     }
//! }
//! assert_eq!(data, b"hi\xFF");
//! assert_eq!(replies, [0xFF, 0xFB, 0x01]);
//! ```
//!
//! ## Thread Safety
//!
//! `TelnetFramer` is plain data with no interior locking. Its state belongs to
//! one connection and must be guarded together with that connection.
//!
//! [`Decoder`]: tokio_util::codec::Decoder
//! [`Encoder`]: tokio_util::codec::Encoder

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

pub mod consts;
mod event;
mod framer;
mod result;

pub use self::event::FramerEvent;
pub use self::framer::{CommandKind, FramerState, TelnetFramer};
pub use self::result::{CodecError, CodecResult};

#[cfg(test)]
mod tests {
    use super::{FramerEvent, TelnetFramer, consts};
    use bytes::BytesMut;
    use tokio_util::codec::{Decoder, Encoder};

    #[test]
    fn telnet_decode() {
        let mut framer = TelnetFramer::new();
        let mut input_buffer = BytesMut::from("print(1)\r\n");
        let mut actual_output = Vec::new();
        while let Some(event) = framer.decode(&mut input_buffer).unwrap() {
            actual_output.push(event)
        }
        let expected_output: Vec<FramerEvent> =
            b"print(1)\r\n".iter().map(|&byte| FramerEvent::Data(byte)).collect();
        assert_eq!(expected_output, actual_output, "telnet_decode didn't match");
    }

    #[test]
    fn telnet_encode() {
        let mut framer = TelnetFramer::new();
        let mut actual_output = BytesMut::with_capacity(20);
        for byte in b">>> " {
            framer.encode(*byte, &mut actual_output).unwrap();
        }
        assert_eq!(&actual_output[..], b">>> ", "telnet_encode didn't match");
    }

    #[test]
    fn decode_negotiation_between_data() {
        let mut framer = TelnetFramer::new();
        let mut input_buffer = BytesMut::from(
            &[
                b'o',
                b'k',
                consts::CR,
                consts::LF,
                // DO Echo
                consts::IAC,
                consts::DO,
                consts::option::ECHO,
                // WILL Suppress Go Ahead
                consts::IAC,
                consts::WILL,
                consts::option::SUPPRESS_GO_AHEAD,
                b'>',
                // DO Status
                consts::IAC,
                consts::DO,
                consts::option::STATUS,
            ][..],
        );
        let expected_output = vec![
            FramerEvent::Data(b'o'),
            FramerEvent::Data(b'k'),
            FramerEvent::Data(consts::CR),
            FramerEvent::Data(consts::LF),
            FramerEvent::Respond([consts::IAC, consts::WILL, consts::option::ECHO]),
            FramerEvent::Data(b'>'),
            FramerEvent::Respond([consts::IAC, consts::WONT, consts::option::STATUS]),
        ];
        let mut actual_output = Vec::new();
        while let Some(event) = framer.decode(&mut input_buffer).unwrap() {
            actual_output.push(event)
        }

        assert_eq!(expected_output, actual_output);
    }
}
