//! Whole-game evaluation.

use thiserror::Error;
use uci_protocol::EngineCommand;

use crate::accuracy::accuracy;
use crate::eval::{Accuracy, Color, GameEval, LineEval, MoveEval};
use crate::parser::parse_move_eval;
use crate::session::{EngineSession, SessionError, SessionState};

/// Errors that can occur while evaluating a game.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Error from the engine session.
    #[error("Engine session error: {0}")]
    Session(#[from] SessionError),
    /// A position descriptor carries no recognizable side to move.
    #[error("Position descriptor has no side to move: {0}")]
    InvalidPosition(String),
    /// The engine failed part way through a game. Everything evaluated
    /// before the failing ply is carried along rather than thrown away.
    #[error("Evaluation failed at ply {ply}: {source}")]
    Ply {
        ply: usize,
        completed: Vec<MoveEval>,
        source: SessionError,
    },
}

/// Evaluates every position of a game, in order, and derives per-side
/// accuracy from the accumulated evaluations.
///
/// Owns the [`EngineSession`]; one evaluator serves many games against the
/// same engine process.
pub struct GameEvaluator {
    session: EngineSession,
}

impl GameEvaluator {
    /// Wrap an initialized (or soon-to-be-initialized) session.
    pub fn new(session: EngineSession) -> Self {
        Self { session }
    }

    /// Access to the underlying session, e.g. for initialization.
    pub fn session_mut(&mut self) -> &mut EngineSession {
        &mut self.session
    }

    /// Shut the underlying session down.
    pub async fn shutdown(&mut self) {
        self.session.shutdown().await;
    }

    /// Evaluate a single position at `depth`.
    ///
    /// Sends `position fen <fen>` + `go depth <d>` and aggregates the
    /// response lines up to `bestmove`. Requires a session in `Ready` or
    /// `Evaluating` state; anything else is rejected before any command
    /// goes out.
    pub async fn evaluate_position(
        &mut self,
        fen: &str,
        depth: u32,
    ) -> Result<MoveEval, SessionError> {
        match self.session.state() {
            SessionState::Ready | SessionState::Evaluating => {}
            state => return Err(SessionError::InvalidState(state)),
        }

        let commands = [
            EngineCommand::position_fen(fen),
            EngineCommand::go_depth(depth),
        ];
        let lines = self
            .session
            .sequencer()
            .send_commands(&commands, "bestmove")
            .await?;
        Ok(parse_move_eval(&lines))
    }

    /// Evaluate every position of a game, in order, and score both sides.
    ///
    /// `fens` holds one position descriptor per ply, in game order. The
    /// engine's search state is reset first (`ucinewgame` + `isready`) so
    /// nothing leaks from a previous game. For each position the principal
    /// line's score is credited to the mover's ceiling and to the opponent's
    /// loss sum; the two totals become each side's accuracy.
    ///
    /// An empty `fens` yields an empty result with accuracy undefined for
    /// both sides.
    pub async fn evaluate_game(
        &mut self,
        fens: &[String],
        depth: u32,
    ) -> Result<GameEval, ReviewError> {
        if !self.session.is_ready() {
            return Err(SessionError::InvalidState(self.session.state()).into());
        }
        if fens.is_empty() {
            return Ok(GameEval {
                moves: Vec::new(),
                accuracy: Accuracy::default(),
            });
        }

        // Reject bad descriptors before the engine sees anything.
        let movers = fens
            .iter()
            .map(|fen| Color::from_fen(fen).ok_or_else(|| ReviewError::InvalidPosition(fen.clone())))
            .collect::<Result<Vec<Color>, ReviewError>>()?;

        self.session.set_state(SessionState::Evaluating);
        let result = self.evaluate_all(fens, &movers, depth).await;
        // Ready again even after a failed ply, so the caller may retry.
        if self.session.state() == SessionState::Evaluating {
            self.session.set_state(SessionState::Ready);
        }
        result
    }

    async fn evaluate_all(
        &mut self,
        fens: &[String],
        movers: &[Color],
        depth: u32,
    ) -> Result<GameEval, ReviewError> {
        tracing::info!(positions = fens.len(), depth, "evaluating game");

        // Fresh search state for a new game.
        self.session
            .sequencer()
            .send_commands(
                &[EngineCommand::UciNewGame, EngineCommand::IsReady],
                "readyok",
            )
            .await?;
        self.session.send(&EngineCommand::startpos())?;

        let mut totals = AccuracyAccumulator::default();
        let mut moves: Vec<MoveEval> = Vec::with_capacity(fens.len());

        for (ply, (fen, mover)) in fens.iter().zip(movers).enumerate() {
            tracing::debug!(ply, %fen, "evaluating position");
            let eval = match self.evaluate_position(fen, depth).await {
                Ok(eval) => eval,
                Err(source) => {
                    return Err(ReviewError::Ply {
                        ply,
                        completed: moves,
                        source,
                    })
                }
            };

            let best = eval.lines.first().map(LineEval::score_cp).unwrap_or(0);
            totals.record(*mover, i64::from(best));
            moves.push(eval);
        }

        let accuracy = totals.finish();
        tracing::info!(?accuracy, "game evaluation complete");
        Ok(GameEval { moves, accuracy })
    }
}

#[derive(Debug, Default)]
struct SideTotals {
    sum: i64,
    ceiling: i64,
}

/// Per-side running totals, consumed once per game.
///
/// The best available evaluation of each position caps what the mover could
/// have gained (their ceiling) and measures what the opponent was exposed
/// to (the opponent's sum).
#[derive(Debug, Default)]
struct AccuracyAccumulator {
    white: SideTotals,
    black: SideTotals,
}

impl AccuracyAccumulator {
    fn record(&mut self, mover: Color, best_score: i64) {
        let (mover_totals, opponent_totals) = match mover {
            Color::White => (&mut self.white, &mut self.black),
            Color::Black => (&mut self.black, &mut self.white),
        };
        mover_totals.ceiling += best_score;
        opponent_totals.sum += best_score;
    }

    fn finish(self) -> Accuracy {
        Accuracy {
            white: accuracy(self.white.sum, self.white.ceiling),
            black: accuracy(self.black.sum, self.black.ceiling),
        }
    }
}
