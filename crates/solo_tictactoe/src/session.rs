//! Single-player game session management.
//!
//! [`Session`] owns the board, turn sequencing, and the computer's
//! simulated thinking delay. It is UI-agnostic: the view layer forwards
//! cell clicks, difficulty selections, and reset requests, and observes
//! state through [`SessionView`] snapshots published on a watch channel.
//!
//! All mutation happens under one mutex on the embedder's event path, so
//! there is no true parallelism to coordinate; the only asynchronous
//! piece is the deferred computer move, which is cancelled whenever a
//! reset or difficulty change invalidates it.

use crate::board::{Board, Cell, Marker};
use crate::outcome::{Outcome, evaluate};
use crate::strategy::{Difficulty, choose_move};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// How long the computer pretends to think before moving.
pub const THINKING_DELAY: Duration = Duration::from_millis(500);

/// Phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for the human to click a cell.
    PlayerTurn,
    /// A computer move is scheduled but not yet applied.
    ComputerThinking,
    /// The game reached a win or draw.
    GameOver,
}

/// Read-only projection of session state for the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// All 9 cells in row-major order.
    pub cells: [Cell; 9],
    /// Completed line to highlight, if the game was won.
    pub winning_line: Option<[usize; 3]>,
    /// Status text for display.
    pub status: String,
    /// Whether the game has ended (shows the play-again affordance).
    pub game_over: bool,
    /// Current phase.
    pub phase: SessionPhase,
    /// Current difficulty (reflects the selector state).
    pub difficulty: Difficulty,
}

/// Mutable session state behind the lock.
#[derive(Debug)]
struct SessionState {
    board: Board,
    phase: SessionPhase,
    outcome: Outcome,
    difficulty: Difficulty,
    /// Bumped on reset; a pending computer move with a stale generation
    /// is discarded instead of applied.
    generation: u64,
    /// Handle for the scheduled computer move, aborted on reset.
    pending: Option<JoinHandle<()>>,
}

impl SessionState {
    fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            phase: SessionPhase::PlayerTurn,
            outcome: Outcome::InProgress,
            difficulty,
            generation: 0,
            pending: None,
        }
    }

    fn project(&self) -> SessionView {
        let status = match (self.phase, self.outcome) {
            (SessionPhase::PlayerTurn, _) => "Your turn".to_string(),
            (SessionPhase::ComputerThinking, _) => "Computer's turn…".to_string(),
            (
                SessionPhase::GameOver,
                Outcome::Won {
                    marker: Marker::Human,
                    ..
                },
            ) => "You win!".to_string(),
            (
                SessionPhase::GameOver,
                Outcome::Won {
                    marker: Marker::Computer,
                    ..
                },
            ) => "Computer wins!".to_string(),
            (SessionPhase::GameOver, _) => "It's a draw!".to_string(),
        };
        let winning_line = match self.outcome {
            Outcome::Won { line, .. } => Some(line),
            _ => None,
        };
        SessionView {
            cells: *self.board.cells(),
            winning_line,
            status,
            game_over: self.phase == SessionPhase::GameOver,
            phase: self.phase,
            difficulty: self.difficulty,
        }
    }

    /// Invalidates any scheduled computer move.
    fn cancel_pending(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Clears the board back to the initial player-turn state.
    fn clear(&mut self) {
        self.cancel_pending();
        self.board = Board::new();
        self.phase = SessionPhase::PlayerTurn;
        self.outcome = Outcome::InProgress;
    }
}

/// A single-player game session versus the computer.
///
/// Cheap to clone; clones share the same underlying state. Methods that
/// start the computer's turn must run inside a Tokio runtime, since the
/// thinking delay is a spawned timer task.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    views: watch::Sender<SessionView>,
    thinking_delay: Duration,
}

impl Session {
    /// Creates a session at the given difficulty with the standard
    /// thinking delay.
    #[instrument]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_thinking_delay(difficulty, THINKING_DELAY)
    }

    /// Creates a session with a custom thinking delay.
    #[instrument]
    pub fn with_thinking_delay(difficulty: Difficulty, thinking_delay: Duration) -> Self {
        info!(?difficulty, "Creating game session");
        let state = SessionState::new(difficulty);
        let (views, _) = watch::channel(state.project());
        Self {
            state: Arc::new(Mutex::new(state)),
            views,
            thinking_delay,
        }
    }

    /// Returns a receiver that observes every state transition.
    #[instrument(skip(self))]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.views.subscribe()
    }

    /// Returns a snapshot of the current state.
    #[instrument(skip(self))]
    pub fn view(&self) -> SessionView {
        self.state.lock().unwrap().project()
    }

    /// Handles a click on cell `pos` (0-8).
    ///
    /// Outside the player's turn, on an occupied cell, or out of bounds,
    /// the click is a silent no-op. Otherwise the human mark is placed
    /// and, unless the game ended, the computer's reply is scheduled
    /// after the thinking delay.
    #[instrument(skip(self))]
    pub fn handle_cell_click(&self, pos: usize) {
        let mut state = self.state.lock().unwrap();
        if state.phase != SessionPhase::PlayerTurn {
            debug!(pos, phase = ?state.phase, "Ignoring click outside player turn");
            return;
        }
        if pos >= 9 || !state.board.is_empty(pos) {
            debug!(pos, "Ignoring click on unavailable cell");
            return;
        }

        state
            .board
            .place(pos, Marker::Human)
            .expect("empty cell accepts the player mark");
        state.outcome = evaluate(&state.board);
        if state.outcome.is_terminal() {
            info!(pos, outcome = ?state.outcome, "Player move ended the game");
            state.phase = SessionPhase::GameOver;
        } else {
            state.phase = SessionPhase::ComputerThinking;
            self.schedule_computer_move(&mut state);
        }
        self.views.send_replace(state.project());
    }

    /// Changes difficulty and starts a fresh game.
    #[instrument(skip(self))]
    pub fn set_difficulty(&self, difficulty: Difficulty) {
        let mut state = self.state.lock().unwrap();
        info!(?difficulty, "Difficulty changed, resetting session");
        state.difficulty = difficulty;
        state.clear();
        self.views.send_replace(state.project());
    }

    /// Starts a fresh game at the current difficulty.
    ///
    /// A computer move still pending from the previous game is discarded.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        info!("Resetting session");
        state.clear();
        self.views.send_replace(state.project());
    }

    /// Schedules the computer's move after the thinking delay.
    ///
    /// The task captures the current generation; if a reset lands before
    /// the timer fires, the abort or the generation check discards it.
    fn schedule_computer_move(&self, state: &mut SessionState) {
        let session = self.clone();
        let generation = state.generation;
        let delay = self.thinking_delay;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.complete_computer_move(generation);
        }));
    }

    /// Applies the scheduled computer move, unless it went stale.
    #[instrument(skip(self))]
    fn complete_computer_move(&self, generation: u64) {
        let mut state = self.state.lock().unwrap();
        if state.generation != generation || state.phase != SessionPhase::ComputerThinking {
            debug!(generation, phase = ?state.phase, "Discarding stale computer move");
            return;
        }

        // The outcome was InProgress when the move was scheduled, so at
        // least one cell is open; a full board here is a sequencing bug.
        let mut rng = rand::rng();
        let pos = choose_move(&state.board, Marker::Computer, state.difficulty, &mut rng)
            .expect("strategy invoked on a board with no empty cells");
        state
            .board
            .place(pos, Marker::Computer)
            .expect("strategy returned an empty cell");
        state.outcome = evaluate(&state.board);
        state.phase = if state.outcome.is_terminal() {
            info!(pos, outcome = ?state.outcome, "Computer move ended the game");
            SessionPhase::GameOver
        } else {
            SessionPhase::PlayerTurn
        };
        state.pending = None;
        self.views.send_replace(state.project());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}
