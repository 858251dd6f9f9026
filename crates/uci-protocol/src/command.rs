//! Outbound UCI command formatting.

use std::fmt;

/// Commands sent from the client to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Reset search state for a new game.
    UciNewGame,
    /// Set an engine option.
    SetOption { name: String, value: String },
    /// Set up position. `fen: None` means the standard starting position.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
}

/// Options for the `go` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Search to this depth.
    pub depth: Option<u32>,
}

impl EngineCommand {
    /// `setoption name <name> value <value>`.
    pub fn set_option(name: impl Into<String>, value: impl ToString) -> Self {
        EngineCommand::SetOption {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// `position fen <fen>`.
    pub fn position_fen(fen: impl Into<String>) -> Self {
        EngineCommand::Position {
            fen: Some(fen.into()),
            moves: Vec::new(),
        }
    }

    /// `position startpos`.
    pub fn startpos() -> Self {
        EngineCommand::Position {
            fen: None,
            moves: Vec::new(),
        }
    }

    /// `go depth <depth>`.
    pub fn go_depth(depth: u32) -> Self {
        EngineCommand::Go(GoOptions {
            depth: Some(depth),
            ..GoOptions::default()
        })
    }

    /// Format command as a UCI wire line (without trailing newline).
    pub fn to_uci(&self) -> String {
        match self {
            EngineCommand::Uci => "uci".to_string(),
            EngineCommand::IsReady => "isready".to_string(),
            EngineCommand::UciNewGame => "ucinewgame".to_string(),
            EngineCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            EngineCommand::Position { fen, moves } => {
                let mut line = match fen {
                    Some(fen) => format!("position fen {}", fen),
                    None => "position startpos".to_string(),
                };
                if !moves.is_empty() {
                    line.push_str(" moves ");
                    line.push_str(&moves.join(" "));
                }
                line
            }
            EngineCommand::Go(opts) => {
                let mut parts = vec!["go".to_string()];
                if let Some(d) = opts.depth {
                    parts.push(format!("depth {}", d));
                }
                if let Some(t) = opts.movetime {
                    parts.push(format!("movetime {}", t));
                }
                parts.join(" ")
            }
            EngineCommand::Stop => "stop".to_string(),
            EngineCommand::Quit => "quit".to_string(),
        }
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
