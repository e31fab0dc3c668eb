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


use super::{CodecError, FramerEvent, consts};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

/// The class of negotiation command awaiting its option byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `IAC DO`, the only verb the framer answers
    Do,
    /// `IAC DONT`, `IAC WILL` or `IAC WONT`
    Other,
}

/// Escape-sequence progress of a [`TelnetFramer`].
///
/// Only one unresolved escape is tracked at a time. Every complete command,
/// and every data byte, leaves the framer in [`FramerState::Idle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FramerState {
    /// No pending escape
    #[default]
    Idle,
    /// Just saw the IAC byte
    SawIac,
    /// Saw a negotiation verb, the next byte is its option
    SawCommand(CommandKind),
}

/// Minimal Telnet framer.
///
/// `TelnetFramer` splits an inbound byte stream into plain data and Telnet
/// control sequences, and produces the replies for the handful of `DO`
/// requests the console bridge answers:
///
/// | Request                     | Reply                        |
/// |-----------------------------|------------------------------|
/// | `IAC DO ECHO`               | `IAC WILL ECHO`              |
/// | `IAC DO SUPPRESS-GO-AHEAD`  | `IAC WILL SUPPRESS-GO-AHEAD` |
/// | `IAC DO STATUS`             | `IAC WONT STATUS`            |
///
/// Everything else introduced by IAC is swallowed without a reply, and
/// `IAC IAC` collapses into a single `0xFF` data byte. No byte belonging to a
/// control sequence is ever reported as data.
///
/// On the transmit side the framer is an [`Encoder`] that doubles every
/// `0xFF` so payload can never be mistaken for IAC.
///
/// The framer holds per-connection state; call [`TelnetFramer::reset`] whenever
/// the peer changes.
#[derive(Clone, Debug, Default)]
pub struct TelnetFramer {
    state: FramerState,
}

impl TelnetFramer {
    /// Creates a framer in the [`FramerState::Idle`] state.
    pub fn new() -> TelnetFramer {
        TelnetFramer::default()
    }

    /// Current escape-sequence state.
    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Discards any partially received escape sequence.
    pub fn reset(&mut self) {
        if self.state != FramerState::Idle {
            trace!(state = ?self.state, "Discarding partial telnet sequence");
        }
        self.state = FramerState::Idle;
    }

    /// Feeds a single received byte through the state machine.
    ///
    /// Returns `None` when the byte was absorbed into a control sequence.
    pub fn step(&mut self, byte: u8) -> Option<FramerEvent> {
        let (next, event) = match (self.state, byte) {
            (FramerState::Idle, consts::IAC) => (FramerState::SawIac, None),
            (FramerState::Idle, _) => (FramerState::Idle, Some(FramerEvent::Data(byte))),
            (FramerState::SawIac, consts::IAC) => {
                (FramerState::Idle, Some(FramerEvent::Data(consts::IAC)))
            }
            (FramerState::SawIac, consts::DO) => {
                (FramerState::SawCommand(CommandKind::Do), None)
            }
            (FramerState::SawIac, consts::DONT | consts::WILL | consts::WONT) => {
                (FramerState::SawCommand(CommandKind::Other), None)
            }
            (FramerState::SawIac, _) => {
                debug!("Ignoring unsupported telnet command {:#04X}", byte);
                (FramerState::Idle, None)
            }
            (FramerState::SawCommand(CommandKind::Do), option) => {
                let reply = reply_to_do(option);
                match reply {
                    Some(_) => debug!("Answering DO {:#04X}", option),
                    None => trace!("Ignoring DO {:#04X}", option),
                }
                (FramerState::Idle, reply.map(FramerEvent::Respond))
            }
            (FramerState::SawCommand(CommandKind::Other), option) => {
                trace!("Ignoring negotiation for option {:#04X}", option);
                (FramerState::Idle, None)
            }
        };
        self.state = next;
        event
    }
}

/// The reply for `IAC DO <option>`, if the option is one we answer.
fn reply_to_do(option: u8) -> Option<[u8; 3]> {
    match option {
        consts::option::ECHO => Some([consts::IAC, consts::WILL, consts::option::ECHO]),
        consts::option::SUPPRESS_GO_AHEAD => Some([
            consts::IAC,
            consts::WILL,
            consts::option::SUPPRESS_GO_AHEAD,
        ]),
        consts::option::STATUS => Some([consts::IAC, consts::WONT, consts::option::STATUS]),
        _ => None,
    }
}

impl Decoder for TelnetFramer {
    type Item = FramerEvent;
    type Error = CodecError;

    /// Consumes bytes from `src` until one produces a [`FramerEvent`].
    ///
    /// Absorbed bytes are consumed silently. When `src` runs dry mid-sequence
    /// the partial escape is remembered for the next call.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<FramerEvent>, Self::Error> {
        while src.has_remaining() {
            if let Some(event) = self.step(src.get_u8()) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}

impl Encoder<u8> for TelnetFramer {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<&[u8]> for TelnetFramer {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        let escapes = item.iter().filter(|&&byte| byte == consts::IAC).count();
        dst.reserve(item.len() + escapes);
        for &byte in item {
            if byte == consts::IAC {
                dst.put_u8(consts::IAC);
            }
            dst.put_u8(byte);
        }
        Ok(())
    }
}
