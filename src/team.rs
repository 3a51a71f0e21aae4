//! Team entities and lifeline tracking
//!
//! This module defines the teams competing in a game and their one-time
//! lifelines. A lifeline is a per-team, per-kind resource that can be
//! consumed exactly once per game; consuming it does not itself alter
//! score, turn, or board state. Its gameplay effect is applied by the
//! presentation layer reacting to the flag change.

use std::fmt::Display;

use enum_map::{Enum, EnumMap, enum_map};
use serde::{Deserialize, Serialize};

use crate::id::Id;

/// The kinds of one-time lifelines every team starts the game with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum Lifeline {
    /// Swap the current question for another one
    ChangeQuestion,
    /// Pass the turn without answering
    PassTurn,
    /// Ask the audience for a suggestion
    AudienceSuggestion,
}

impl Display for Lifeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ChangeQuestion => "change question",
            Self::PassTurn => "pass turn",
            Self::AudienceSuggestion => "audience suggestion",
        })
    }
}

/// A competing team
///
/// Created during roster editing, never removed mid-game. The score and
/// lifeline availability mutate during play; the id and name do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier assigned at creation
    pub id: Id,
    /// Display name; uniqueness is not enforced
    pub name: String,
    /// Accumulated points
    pub score: u64,
    /// Availability of each lifeline; `true` means still unused
    pub lifelines: EnumMap<Lifeline, bool>,
}

impl Team {
    /// Creates a team with a zero score and all lifelines available
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::new(),
            name: name.into(),
            score: 0,
            lifelines: enum_map! { _ => true },
        }
    }

    /// Whether the given lifeline is still unused
    pub fn lifeline_available(&self, lifeline: Lifeline) -> bool {
        self.lifelines[lifeline]
    }

    /// Consumes a lifeline if it is still available
    ///
    /// Returns `true` if the lifeline was consumed by this call and `false`
    /// if it had already been used. The flag is a one-way latch; nothing
    /// short of a full game reset turns it back on.
    pub fn use_lifeline(&mut self, lifeline: Lifeline) -> bool {
        std::mem::replace(&mut self.lifelines[lifeline], false)
    }

    /// Restores the team to its start-of-game state
    pub fn reset(&mut self) {
        self.score = 0;
        self.lifelines = enum_map! { _ => true };
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_new_team_defaults() {
        let team = Team::new("Team 1");
        assert_eq!(team.name, "Team 1");
        assert_eq!(team.score, 0);
        assert!(team.lifeline_available(Lifeline::ChangeQuestion));
        assert!(team.lifeline_available(Lifeline::PassTurn));
        assert!(team.lifeline_available(Lifeline::AudienceSuggestion));
    }

    #[test]
    fn test_use_lifeline_is_one_way() {
        let mut team = Team::new("Team 1");
        assert!(team.use_lifeline(Lifeline::PassTurn));
        assert!(!team.lifeline_available(Lifeline::PassTurn));

        // second use is a no-op
        assert!(!team.use_lifeline(Lifeline::PassTurn));
        assert!(!team.lifeline_available(Lifeline::PassTurn));

        // other lifelines are unaffected
        assert!(team.lifeline_available(Lifeline::ChangeQuestion));
    }

    #[test]
    fn test_reset_restores_lifelines_and_score() {
        let mut team = Team::new("Team 1");
        team.score = 800;
        team.use_lifeline(Lifeline::AudienceSuggestion);

        team.reset();
        assert_eq!(team.score, 0);
        assert!(team.lifeline_available(Lifeline::AudienceSuggestion));
    }
}
