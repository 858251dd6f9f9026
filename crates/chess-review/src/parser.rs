//! Aggregation of a response batch into a [`MoveEval`].

use std::collections::BTreeMap;

use uci_protocol::{EngineMessage, Score};

use crate::eval::{LineEval, MoveEval};

/// Turn the collected response lines of one `go` batch into a [`MoveEval`].
///
/// `bestmove` sets the best move. An `info` line contributes a [`LineEval`]
/// only when it carries both a `multipv` rank and a non-empty `pv`; a later
/// line for the same rank replaces the earlier one, since deeper search
/// iterations supersede shallower ones. Malformed fields within a line never
/// abort the batch. The surviving lines come out densely packed and sorted
/// best-first.
pub fn parse_move_eval(lines: &[String]) -> MoveEval {
    let mut best_move = String::new();
    let mut by_rank: BTreeMap<u32, LineEval> = BTreeMap::new();

    for line in lines {
        match EngineMessage::parse(line) {
            EngineMessage::BestMove { mv, .. } => {
                best_move = mv;
            }
            EngineMessage::Info(info) => {
                let Some(rank) = info.multipv else { continue };
                if info.pv.is_empty() {
                    continue;
                }
                let (cp, mate) = match info.score {
                    Some(Score::Cp(v)) => (Some(v), None),
                    Some(Score::Mate(v)) => (None, Some(v)),
                    None => (None, None),
                };
                by_rank.insert(
                    rank,
                    LineEval {
                        multipv: rank,
                        pv: info.pv,
                        cp,
                        mate,
                    },
                );
            }
            _ => {}
        }
    }

    let mut lines: Vec<LineEval> = by_rank.into_values().collect();
    lines.sort_by_key(|l| std::cmp::Reverse(l.sort_key()));

    MoveEval { best_move, lines }
}
