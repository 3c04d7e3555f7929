//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for creating boards and agents.
//!
//! ```text
//!   app::App ──owns──▶ adapters (MsgPackRepository, InMemoryRepository)
//!       │                    │ implements
//!       │ creates            ▼
//!       ▼              ports::LearnedDataRepository
//!   Board, LearningAgent, SearchAgent
//! ```
//!
//! # Usage
//!
//! ```
//! use jokettt::app::{App, SearchConfig};
//! use jokettt::tictactoe::Mark;
//!
//! let app = App::new();
//! let (data, _warning) = app.load_learned_data(None);
//! let board = app.create_board(Mark::X, data.keys);
//! let opponent = app.create_search_agent(Mark::O, &SearchConfig::minimax());
//! ```

pub mod config;
pub mod container;

pub use config::{LearnerConfig, SearchConfig};
pub use container::{App, AppBuilder};
