//! Solo tic-tac-toe - single-player game engine
//!
//! This library provides the full game core for a human-vs-computer
//! tic-tac-toe game: board state, win/draw detection, three computer
//! difficulty tiers (random, heuristic, minimax), and a session
//! controller that sequences turns behind a subscribe/notify contract.
//!
//! # Architecture
//!
//! - **Board**: 3x3 grid of cells, pure data
//! - **Outcome**: win/draw evaluation over the 8 fixed lines
//! - **Strategy**: easy/medium/hard move selection for the computer
//! - **Session**: turn sequencing, thinking delay, view projection
//!
//! The view layer is external: it forwards clicks, difficulty changes,
//! and reset requests into a [`Session`] and renders the [`SessionView`]
//! snapshots published on the session's watch channel.
//!
//! # Example
//!
//! ```no_run
//! use solo_tictactoe::{Difficulty, Session};
//!
//! # async fn example() {
//! let session = Session::new(Difficulty::Hard);
//! let mut views = session.subscribe();
//!
//! session.handle_cell_click(0);
//! while views.changed().await.is_ok() {
//!     let view = views.borrow().clone();
//!     println!("{}", view.status);
//!     if view.game_over {
//!         break;
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod outcome;
mod session;
mod strategy;

// Crate-level exports - Board model
pub use board::{Board, Cell, Marker, MoveError};

// Crate-level exports - Outcome evaluation
pub use outcome::{LINES, Outcome, evaluate};

// Crate-level exports - Move strategies
pub use strategy::{Difficulty, choose_move, winning_move};

// Crate-level exports - Session management
pub use session::{Session, SessionPhase, SessionView, THINKING_DELAY};
