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


//! Line Echo Console Example
//!
//! Drives a toy read-eval-print loop over the console bridge:
//! - Waits for a Telnet client on port 2300 (2323 is left to raw mode)
//! - Echoes typed characters and handles backspace
//! - Answers each completed line with its reversed text
//!
//! The console loop runs on a plain OS thread and only ever talks to the
//! [`ConsoleIo`] trait, the way an embedded interpreter would.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example echo_repl
//! telnet localhost 2300
//! ```

use rrepl_service::{BridgeConfig, BridgeServer, ConsoleIo};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_PORT: u16 = 2300;
const PROMPT: &str = ">>> ";
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BridgeConfig::new("127.0.0.1:0".parse()?).with_port(DEMO_PORT);
    let server = BridgeServer::bind(config).await?;
    println!("Connect with: telnet localhost {}", server.local_addr().port());
    println!("Press Ctrl+C to stop\n");

    let console = server.bridge();
    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || console_loop(&console))?;

    tokio::select! {
        _ = server.run() => {}
        result = tokio::signal::ctrl_c() => result?,
    }
    info!("Console example stopped");
    Ok(())
}

fn console_loop(console: &dyn ConsoleIo) {
    let mut line = Vec::new();
    let mut skip_lf = false;
    console.tx_str(PROMPT);
    loop {
        let Some(byte) = console.rx() else {
            std::thread::sleep(Duration::from_millis(10));
            continue;
        };
        match byte {
            b'\n' if skip_lf => skip_lf = false,
            b'\r' | b'\n' => {
                skip_lf = byte == b'\r';
                console.tx_str_cooked("\n");
                evaluate(console, &line);
                line.clear();
                console.tx_str(PROMPT);
            }
            BACKSPACE | DELETE => {
                skip_lf = false;
                if line.pop().is_some() {
                    console.tx_bytes(b"\x08 \x08");
                }
            }
            // Telnet clients send CR NUL for a bare carriage return.
            0 => {}
            _ => {
                skip_lf = false;
                line.push(byte);
                console.tx(byte);
            }
        }
    }
}

fn evaluate(console: &dyn ConsoleIo, line: &[u8]) {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let reversed: String = text.chars().rev().collect();
    console.tx_str_cooked(&format!("{}\n", reversed));
}
