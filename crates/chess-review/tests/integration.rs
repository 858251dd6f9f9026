//! Integration tests for the chess-review crate.
//!
//! These tests require Stockfish to be installed and available in PATH.
//! Run with: `cargo test -p chess-review --test integration -- --ignored`

use chess_review::{EngineConfig, EngineSession, GameEvaluator, SessionState};

/// Check if Stockfish is available in PATH.
fn stockfish_available() -> bool {
    std::process::Command::new("stockfish")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn session_lifecycle_against_real_engine() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let session = EngineSession::spawn("stockfish", EngineConfig::default())
        .expect("Failed to spawn Stockfish");
    let mut evaluator = GameEvaluator::new(session);

    evaluator
        .session_mut()
        .initialize()
        .await
        .expect("UCI handshake failed");
    assert!(evaluator.session_mut().is_ready());
    assert!(
        evaluator
            .session_mut()
            .name()
            .to_lowercase()
            .contains("stockfish"),
        "Engine name should contain 'Stockfish', got: {}",
        evaluator.session_mut().name()
    );

    evaluator.shutdown().await;
    assert_eq!(evaluator.session_mut().state(), SessionState::Terminated);
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn evaluate_starting_position() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let session = EngineSession::spawn("stockfish", EngineConfig::default())
        .expect("Failed to spawn Stockfish");
    let mut evaluator = GameEvaluator::new(session);
    evaluator
        .session_mut()
        .initialize()
        .await
        .expect("UCI handshake failed");

    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let eval = evaluator
        .evaluate_position(fen, 10)
        .await
        .expect("Failed to analyze starting position");

    assert!(!eval.best_move.is_empty(), "Best move should not be empty");
    assert!(
        !eval.lines.is_empty(),
        "MultiPV evaluation should produce at least one line"
    );
    assert_eq!(eval.lines[0].multipv, 1);

    evaluator.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn evaluate_short_game_produces_accuracies() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let session = EngineSession::spawn("stockfish", EngineConfig::default())
        .expect("Failed to spawn Stockfish");
    let mut evaluator = GameEvaluator::new(session);
    evaluator
        .session_mut()
        .initialize()
        .await
        .expect("UCI handshake failed");

    // 1. e4 e5 2. Nf3
    let fens = vec![
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2".to_string(),
    ];

    let game = evaluator
        .evaluate_game(&fens, 10)
        .await
        .expect("Game evaluation failed");

    assert_eq!(game.moves.len(), fens.len());
    for eval in &game.moves {
        assert!(!eval.best_move.is_empty());
        assert!(!eval.lines.is_empty());
    }
    assert!(game.accuracy.white.is_some());
    assert!(game.accuracy.black.is_some());

    evaluator.shutdown().await;
}
