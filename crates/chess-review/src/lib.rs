//! Whole-game evaluation over an external UCI engine.
//!
//! This crate drives a UCI-compatible engine (like Stockfish) as a black box
//! behind a line-oriented transport, evaluates every position of a game in
//! order, and aggregates the results into per-side accuracy scores.
//!
//! # Overview
//!
//! - [`EngineSession`] - engine lifecycle and the exclusive transport handle
//! - [`CommandSequencer`] - one serialized command batch at a time, collected
//!   up to its terminal line
//! - [`parse_move_eval`] - response lines into a ranked [`MoveEval`]
//! - [`GameEvaluator`] - per-position evaluation across a whole game
//! - [`accuracy`] - running totals into a percentage per side
//!
//! # Example
//!
//! ```ignore
//! use chess_review::{EngineConfig, EngineSession, GameEvaluator};
//!
//! let session = EngineSession::spawn("stockfish", EngineConfig::default())?;
//! let mut evaluator = GameEvaluator::new(session);
//! evaluator.session_mut().initialize().await?;
//!
//! let game = evaluator.evaluate_game(&fens, 16).await?;
//! if let Some(white) = game.accuracy.white {
//!     println!("White accuracy: {:.1}%", white);
//! }
//! evaluator.shutdown().await;
//! ```

pub mod accuracy;
pub mod eval;
pub mod parser;
pub mod review;
pub mod sequencer;
pub mod session;
pub mod transport;

pub use accuracy::accuracy;
pub use eval::{Accuracy, Color, GameEval, LineEval, MoveEval};
pub use parser::parse_move_eval;
pub use review::{GameEvaluator, ReviewError};
pub use sequencer::CommandSequencer;
pub use session::{EngineConfig, EngineSession, SessionError, SessionState};
pub use transport::EngineTransport;
