//! UCI (Universal Chess Interface) protocol library, client side.
//!
//! This crate provides types for driving a UCI chess engine: formatting the
//! commands a client sends and parsing the lines an engine answers with.
//! It does no I/O; a transport layer feeds it one line at a time.
//!
//! # Outbound (client to engine)
//!
//! - `uci` - Initialize engine, get id and options
//! - `isready` / `readyok` - Synchronization
//! - `setoption name <name> value <value>` - Configure the engine
//! - `ucinewgame` - Reset search state
//! - `position fen <fen>` / `position startpos [moves <move>...]` - Set position
//! - `go [depth <d>] [movetime <ms>]` - Start search
//! - `quit` - Exit engine
//!
//! # Inbound (engine to client)
//!
//! - `id name <name>` / `id author <author>`
//! - `uciok` / `readyok`
//! - `info ... multipv <n> ... score ... pv <move>...`
//! - `bestmove <move> [ponder <move>]`

mod command;
mod info;

pub use command::{EngineCommand, GoOptions};
pub use info::{EngineInfo, Score};

/// Messages sent from engine to client.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Best move found.
    BestMove { mv: String, ponder: Option<String> },
    /// Anything else (for forward compatibility).
    Unknown(String),
}

impl EngineMessage {
    /// Classify a single line of engine output.
    ///
    /// Never fails: lines that fit no known message shape come back as
    /// [`EngineMessage::Unknown`] and the caller decides whether to care.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "uciok" {
            return EngineMessage::UciOk;
        }
        if line == "readyok" {
            return EngineMessage::ReadyOk;
        }
        if let Some(rest) = line.strip_prefix("id name ") {
            return EngineMessage::Id {
                name: Some(rest.trim().to_string()),
                author: None,
            };
        }
        if let Some(rest) = line.strip_prefix("id author ") {
            return EngineMessage::Id {
                name: None,
                author: Some(rest.trim().to_string()),
            };
        }
        if line.starts_with("bestmove") {
            let mut parts = line.split_whitespace().skip(1);
            match parts.next() {
                Some(mv) => {
                    let ponder = match (parts.next(), parts.next()) {
                        (Some("ponder"), Some(p)) => Some(p.to_string()),
                        _ => None,
                    };
                    return EngineMessage::BestMove {
                        mv: mv.to_string(),
                        ponder,
                    };
                }
                // "bestmove" with no move token is malformed
                None => return EngineMessage::Unknown(line.to_string()),
            }
        }
        if let Some(info) = EngineInfo::parse(line) {
            return EngineMessage::Info(info);
        }

        EngineMessage::Unknown(line.to_string())
    }
}
