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


//! Error types for the console bridge

use thiserror::Error;

/// Result type for bridge setup operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
///
/// Only setup can fail. Once running, connection loss and would-block
/// conditions are absorbed by the bridge and never reach the console.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I/O error from the listening socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error from the codec layer.
    ///
    /// The bridge itself never fails to frame; this is for callers that drive
    /// [`TelnetFramer`](rrepl_telnetcodec::TelnetFramer) through a `Framed`
    /// stream and want one error type.
    #[error("Protocol error: {0}")]
    Protocol(#[from] rrepl_telnetcodec::CodecError),

    /// Configuration rejected by [`BridgeConfig::validate`](crate::BridgeConfig::validate)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BridgeError {
    /// Check if the error is recoverable
    ///
    /// Transient socket failures are worth retrying; a bad configuration is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BridgeError::Io(err) => !matches!(
                err.kind(),
                std::io::ErrorKind::AddrInUse
                    | std::io::ErrorKind::AddrNotAvailable
                    | std::io::ErrorKind::PermissionDenied
            ),
            BridgeError::Protocol(_) => true,
            BridgeError::InvalidConfig(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rrepl_telnetcodec::CodecError;
    use std::io;

    #[test]
    fn test_error_is_recoverable() {
        assert!(BridgeError::Io(io::Error::from(io::ErrorKind::ConnectionAborted)).is_recoverable());
        assert!(!BridgeError::Io(io::Error::from(io::ErrorKind::AddrInUse)).is_recoverable());
        assert!(!BridgeError::InvalidConfig("backlog".to_string()).is_recoverable());
    }

    #[test]
    fn test_codec_error_converts() {
        fn framed_read() -> Result<()> {
            let err = CodecError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
            Err::<(), CodecError>(err)?;
            Ok(())
        }

        let err = framed_read().unwrap_err();
        assert!(matches!(err, BridgeError::Protocol(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::InvalidConfig("backlog must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: backlog must be greater than 0"
        );
    }
}
