//! # Tahadi Game Library
//!
//! This library provides the core game logic for Tahadi, a turn-based
//! Jeopardy-style trivia game for two or more teams. It handles the question
//! catalog, the pre-game category draft, team rosters and scoring, one-time
//! lifelines, and the per-question countdown timer. Rendering and input are
//! the responsibility of a presentation layer that consumes [`game::Game`].
//!
//! The flow of a game:
//!
//! 1. Load a [`catalog::Catalog`] from a JSON document.
//! 2. Edit the roster and run the category draft until every team has
//!    claimed its categories, then finalize to build the board.
//! 3. Teams take turns answering questions; each question runs a
//!    [`timer::QuestionTimer`] that the presentation layer drives through
//!    a scheduled alarm callback.
//! 4. The game is over once every question on the board has been answered.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod catalog;
pub mod constants;
pub mod draft;
pub mod game;
pub mod id;
pub mod team;
pub mod timer;

pub use game::Game;
pub use id::Id;
