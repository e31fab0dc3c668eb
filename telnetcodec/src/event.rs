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


use std::fmt;

///
/// `FramerEvent` is the outcome of feeding one byte to the [`TelnetFramer`](crate::TelnetFramer)
/// that the caller has to act on. Bytes absorbed into a control sequence produce no event.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramerEvent {
    /// Plain data byte for the console consumer
    Data(u8),
    /// Negotiation reply that must be written back to the peer unescaped
    Respond([u8; 3]),
}

impl FramerEvent {
    /// Returns the data byte, if this is a data event.
    pub fn data(self) -> Option<u8> {
        match self {
            FramerEvent::Data(byte) => Some(byte),
            FramerEvent::Respond(_) => None,
        }
    }

    /// Returns the reply bytes, if this is a response event.
    pub fn response(self) -> Option<[u8; 3]> {
        match self {
            FramerEvent::Respond(reply) => Some(reply),
            FramerEvent::Data(_) => None,
        }
    }
}

impl fmt::Display for FramerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramerEvent::Data(byte) => write!(f, "Data(0x{:02X})", byte),
            FramerEvent::Respond([iac, verb, option]) => {
                write!(f, "Respond({:02X} {:02X} {:02X})", iac, verb, option)
            }
        }
    }
}
