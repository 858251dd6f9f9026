//! Evaluation result types.

use serde::{Deserialize, Serialize};

/// The two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Side to move of a FEN position descriptor (its second field).
    pub fn from_fen(fen: &str) -> Option<Self> {
        match fen.split_whitespace().nth(1)? {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Sort keys for mate lines sit strictly outside the centipawn range.
const MATE_KEY: i64 = 1i64 << 32;

/// One principal variation for a position.
///
/// Scores are signed from the side-to-move's perspective. `cp` and `mate`
/// stay `None` when the engine did not report them; absence of data is
/// never collapsed into a zero here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEval {
    /// Rank the engine delivered this line under (`multipv`, 1 = best).
    pub multipv: u32,
    /// The move sequence of the variation.
    pub pv: Vec<String>,
    /// Centipawn score, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cp: Option<i32>,
    /// Mate-in-N score, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate: Option<i32>,
}

impl LineEval {
    /// Total-order key; higher is better for the side to move.
    ///
    /// Winning mates rank above every centipawn score, shorter mates first.
    /// Losing mates rank below every centipawn score, with longer survival
    /// ranking higher. In between, plain centipawns.
    pub fn sort_key(&self) -> i64 {
        match (self.mate, self.cp) {
            (Some(m), _) if m > 0 => MATE_KEY - m as i64,
            (Some(m), _) => -MATE_KEY - m as i64,
            (None, Some(cp)) => cp as i64,
            (None, None) => 0,
        }
    }

    /// Centipawn score with the documented fallback: a line without any
    /// reported score counts as 0, so callers aggregating scores never see
    /// an implicit default sneak in elsewhere.
    pub fn score_cp(&self) -> i32 {
        self.cp.unwrap_or(0)
    }
}

/// Evaluation result for one position: the best move and the ranked lines,
/// `lines[0]` being the engine's preferred one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEval {
    pub best_move: String,
    pub lines: Vec<LineEval>,
}

/// Accuracy per side. `None` means undefined (nothing to score against),
/// which is distinct from any numeric value on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Accuracy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black: Option<f64>,
}

/// Whole-game evaluation: one [`MoveEval`] per submitted position, in
/// submission order, plus the derived per-side accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEval {
    pub moves: Vec<MoveEval>,
    pub accuracy: Accuracy,
}
