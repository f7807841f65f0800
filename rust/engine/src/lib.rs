//! # holdem-engine: Multi-seat Texas Hold'em Core
//!
//! A deterministic state machine for one table of two to eight seats:
//! dealing, blinds, turn-ordered betting over four streets, all-in
//! handling, and showdown with main and side pots.
//!
//! Every transition takes a [`game::TableState`] snapshot and returns a new
//! one; chips are conserved across every transition.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Shuffled deck consumed from the front
//! - [`engine`] - Hand lifecycle: [`engine::start_hand`] and [`engine::apply_action`]
//! - [`game`] - Table snapshot, phases and table configuration
//! - [`hand`] - Best-five-of-seven hand evaluation
//! - [`player`] - Seats and the actions they submit
//! - [`pot`] - Main and side pots, payout with odd-chip rule
//! - [`rules`] - Action validation and turn order
//! - [`logger`] - HandRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::engine::{apply_action, start_hand};
//! use holdem_engine::game::{Phase, TableConfig, TableState};
//! use holdem_engine::player::{PlayerAction, Seat};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let seats = vec![
//!     Seat::new(0, "You", 1000, false),
//!     Seat::new(1, "Bot", 1000, true),
//! ];
//! let table = TableState::new(TableConfig::default(), seats)?;
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let hand = start_hand(&table, &mut rng)?;
//! let actor = hand.current_seat().expect("someone acts preflop");
//! let after = apply_action(&hand, actor, PlayerAction::Fold)?;
//! assert_eq!(after.phase(), Phase::Complete);
//! assert_eq!(after.total_chips(), 2000);
//! # Ok::<(), holdem_engine::errors::GameError>(())
//! ```
//!
//! ## Deterministic Gameplay
//!
//! ```rust
//! use holdem_engine::deck::Deck;
//!
//! assert_eq!(Deck::new_with_seed(42), Deck::new_with_seed(42));
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
