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

//! Telnet protocol constants (RFC 854 / RFC 855)

/// Interpret As Command
pub const IAC: u8 = 0xFF;
/// Demand the peer stop performing an option
pub const DONT: u8 = 0xFE;
/// Request the peer perform an option
pub const DO: u8 = 0xFD;
/// Refuse to perform an option
pub const WONT: u8 = 0xFC;
/// Offer to perform an option
pub const WILL: u8 = 0xFB;
/// Subnegotiation Begin
pub const SB: u8 = 0xFA;
/// Go Ahead
pub const GA: u8 = 0xF9;
/// No Operation
pub const NOP: u8 = 0xF1;
/// Subnegotiation End
pub const SE: u8 = 0xF0;

/// Carriage Return
pub const CR: u8 = b'\r';
/// Line Feed
pub const LF: u8 = b'\n';

/// Option codes understood by the framer.
pub mod option {
    /// Echo (RFC 857)
    pub const ECHO: u8 = 0x01;
    /// Suppress Go Ahead (RFC 858)
    pub const SUPPRESS_GO_AHEAD: u8 = 0x03;
    /// Status (RFC 859)
    pub const STATUS: u8 = 0x05;
}

/// Sent to every new telnet client: `IAC WILL ECHO, IAC DONT ECHO`.
///
/// The server takes over echoing and asks the client not to echo locally.
pub const PREAMBLE: [u8; 6] = [IAC, WILL, option::ECHO, IAC, DONT, option::ECHO];
