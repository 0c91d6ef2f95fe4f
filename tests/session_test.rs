//! Integration test: local session orchestration
//!
//! Drives the self-running turn loop end to end: human input routing, the
//! thinking indicator around computer moves, terminal detection, and
//! cancellation semantics.

use gomoku::board::{Position, StoneColor};
use gomoku::session::{
    GameMode, GameOutcome, GameSession, PlayerInfo, PlayerKind, SessionConfig, SessionEvent,
    SessionInput,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

fn human(name: &str) -> PlayerInfo {
    PlayerInfo::new(name, name, PlayerKind::Human)
}

fn computer(name: &str) -> PlayerInfo {
    PlayerInfo::new(name, name, PlayerKind::Ai)
}

/// Submit a move once the turn loop is actually awaiting one.
async fn submit(input: &SessionInput, pos: Position) {
    for _ in 0..10_000 {
        if input.submit_move(pos) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("no player ever awaited move {pos:?}");
}

/// Abandon the session once the turn loop is back in a wait, so the
/// cancellation cannot race the wait's installation.
async fn abandon(input: &SessionInput) {
    while !input.is_awaiting_move() {
        tokio::task::yield_now().await;
    }
    input.cancel_all();
}

async fn next_event(events: &mut UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("event channel closed")
}

#[tokio::test(start_paused = true)]
async fn test_human_vs_ai_first_exchange() {
    let (mut session, mut events) = GameSession::new(SessionConfig::default());
    let input = session.setup_game(GameMode::VsAi, human("alice"), computer("cpu"), 2);

    let game = tokio::spawn(async move {
        let outcome = session.run().await;
        (session, outcome)
    });

    // Setup announces Black to move.
    match next_event(&mut events).await {
        SessionEvent::TurnChanged { turn, player } => {
            assert_eq!(turn, StoneColor::Black);
            assert_eq!(player.name, "alice");
        }
        other => panic!("expected TurnChanged, got {other:?}"),
    }

    submit(&input, (7, 7)).await;

    match next_event(&mut events).await {
        SessionEvent::MoveRecorded(record) => {
            assert_eq!(record.position, (7, 7));
            assert_eq!(record.player, StoneColor::Black);
            assert_eq!(record.move_number, 1);
        }
        other => panic!("expected MoveRecorded, got {other:?}"),
    }

    assert!(matches!(
        next_event(&mut events).await,
        SessionEvent::TurnChanged {
            turn: StoneColor::White,
            ..
        }
    ));
    assert_eq!(next_event(&mut events).await, SessionEvent::Thinking(true));
    assert_eq!(next_event(&mut events).await, SessionEvent::Thinking(false));

    // The computer replies somewhere adjacent to the lone black stone.
    match next_event(&mut events).await {
        SessionEvent::MoveRecorded(record) => {
            assert_eq!(record.player, StoneColor::White);
            assert_eq!(record.move_number, 2);
            let (row, col) = record.position;
            assert!(row.abs_diff(7) <= 1 && col.abs_diff(7) <= 1);
        }
        other => panic!("expected MoveRecorded, got {other:?}"),
    }

    // Abandon the session: the pending human wait resolves to "no move".
    abandon(&input).await;
    let (session, outcome) = game.await.unwrap();
    assert_eq!(outcome, None);
    assert_eq!(session.move_count(), 2);
}

#[tokio::test]
async fn test_human_vs_human_to_a_win() {
    let (mut session, mut events) = GameSession::new(SessionConfig::default());
    let input = session.setup_game(GameMode::LocalPvp, human("alice"), human("bob"), 0);

    let game = tokio::spawn(async move { session.run().await });

    // Black marches to five in a row; White wanders along the edge.
    for i in 0..4usize {
        submit(&input, (7, 3 + i)).await; // Black
        submit(&input, (0, i)).await; // White
    }
    submit(&input, (7, 7)).await; // Black completes the five.

    let outcome = timeout(Duration::from_secs(5), game)
        .await
        .expect("session did not finish")
        .unwrap();
    assert_eq!(outcome, Some(GameOutcome::BlackWins));

    let mut saw_end = false;
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::GameEnded { outcome, winner } = event {
            assert_eq!(outcome, GameOutcome::BlackWins);
            assert_eq!(winner.unwrap().name, "alice");
            saw_end = true;
        }
    }
    assert!(saw_end, "expected a GameEnded event");
}

#[tokio::test]
async fn test_occupied_cell_rejected_then_turn_continues() {
    let (mut session, mut events) = GameSession::new(SessionConfig::default());
    let input = session.setup_game(GameMode::LocalPvp, human("alice"), human("bob"), 0);

    let game = tokio::spawn(async move { session.run().await });

    submit(&input, (7, 7)).await; // Black takes the center.
    submit(&input, (7, 7)).await; // White clicks the same cell: ignored.
    submit(&input, (7, 8)).await; // White plays a real move.

    // Drain until White's move shows up; the rejected click must not have
    // produced a record.
    let mut records = Vec::new();
    while records.len() < 2 {
        if let SessionEvent::MoveRecorded(record) = next_event(&mut events).await {
            records.push(record);
        }
    }
    assert_eq!(records[0].position, (7, 7));
    assert_eq!(records[0].player, StoneColor::Black);
    assert_eq!(records[1].position, (7, 8));
    assert_eq!(records[1].player, StoneColor::White);

    abandon(&input).await;
    assert_eq!(game.await.unwrap(), None);
}

#[tokio::test]
async fn test_click_routing_via_pixels() {
    let (mut session, mut events) = GameSession::new(SessionConfig::default());
    let input = session.setup_game(GameMode::LocalPvp, human("alice"), human("bob"), 0);

    let game = tokio::spawn(async move { session.run().await });

    // Pixel center of intersection (7, 7) with default geometry.
    loop {
        if input.submit_click(300.0, 300.0) {
            break;
        }
        tokio::task::yield_now().await;
    }

    match next_event(&mut events).await {
        SessionEvent::TurnChanged { .. } => {}
        other => panic!("expected TurnChanged, got {other:?}"),
    }
    match next_event(&mut events).await {
        SessionEvent::MoveRecorded(record) => assert_eq!(record.position, (7, 7)),
        other => panic!("expected MoveRecorded, got {other:?}"),
    }

    // A click in the dead zone between intersections resolves to nothing.
    assert!(!input.submit_click(300.0, 280.0));

    abandon(&input).await;
    assert_eq!(game.await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_ai_vs_ai_runs_to_completion() {
    let (mut session, _events) = GameSession::new(SessionConfig::default());
    session.setup_game(GameMode::VsAi, computer("cpu-b"), computer("cpu-w"), 1);

    let outcome = timeout(Duration::from_secs(600), session.run())
        .await
        .expect("ai-vs-ai game did not terminate");
    assert!(outcome.is_some(), "two computers must reach a terminal state");
}
