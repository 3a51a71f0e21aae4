//! Core game state and transitions
//!
//! This module contains the aggregate game state: the team roster, the
//! finalized board of categories, the turn pointer, the answered set, and
//! the timer configuration. All transitions are synchronous, deterministic
//! mutations invoked by the presentation layer; the only autonomous
//! activity in the whole system is the question timer's tick, which lives
//! in [`crate::timer`] and feeds back in through the same intent flow.
//!
//! Invariant-violating calls (removing a team below the roster floor,
//! answering an unknown or already-answered question, claiming an
//! unavailable category) are silent no-ops on the permissive surface.
//! Each has a `try_` twin returning a typed error for callers that want
//! to know why nothing happened.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use thiserror::Error;
use web_time::Duration;

use crate::{
    catalog::{Catalog, Category, Question},
    constants::roster::MIN_TEAMS,
    constants::timer::{DEFAULT_DURATION_SECONDS, MAX_DURATION_SECONDS, MIN_DURATION_SECONDS},
    draft::{Draft, DraftError, Stage},
    id::Id,
    team::{Lifeline, Team},
    timer::{AlarmMessage, QuestionTimer},
};

/// Errors surfaced by the fallible roster operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterError {
    /// Removing the team would leave fewer than the minimum number of teams
    #[error("roster cannot drop below {MIN_TEAMS} teams")]
    RosterFloor,
    /// No team with that id exists
    #[error("no such team")]
    UnknownTeam,
}

/// Errors surfaced by the fallible play operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No question with that id exists on the board
    #[error("no such question on the board")]
    UnknownQuestion,
    /// The question has already been answered
    #[error("question was already answered")]
    AlreadyAnswered,
}

/// The aggregate game state
///
/// Constructed once per session around a loaded catalog; a reset re-seeds
/// everything from that catalog without reloading it.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Competing teams in roster order; at least two by construction
    teams: Vec<Team>,
    /// Index of the team whose turn it is; always within the roster
    current_team_index: usize,
    /// The finalized board; empty until the draft is finalized
    categories: Vec<Category>,
    /// Ids of answered questions in answer order; grows monotonically and
    /// never holds a duplicate
    answered_questions: Vec<Id>,
    /// True once every question on the board has been answered
    game_over: bool,
    /// Countdown duration for future question timers
    #[serde_as(as = "DurationSeconds<u64>")]
    question_timer_duration: Duration,
    /// Pre-game draft state; irrelevant once the board is finalized
    draft: Draft,
    /// The loaded catalog, kept for re-seeding the draft on reset
    catalog: Catalog,
}

impl Game {
    /// Creates a new game around a loaded catalog
    ///
    /// The roster is seeded with two default teams so the minimum-roster
    /// invariant holds from the start; the draft pool holds the whole
    /// catalog and the board is empty.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            teams: vec![Team::new("Team 1"), Team::new("Team 2")],
            current_team_index: 0,
            categories: Vec::new(),
            answered_questions: Vec::new(),
            game_over: false,
            question_timer_duration: Duration::from_secs(DEFAULT_DURATION_SECONDS),
            draft: Draft::new(&catalog),
            catalog,
        }
    }

    // Roster

    /// Appends a new team with a zero score and all lifelines available
    ///
    /// Names are not required to be unique. Returns the new team's id.
    pub fn add_team(&mut self, name: impl Into<String>) -> Id {
        let team = Team::new(name);
        let id = team.id;
        self.teams.push(team);
        id
    }

    /// Removes a team from the roster
    ///
    /// The team's claimed categories return to the shared pool, and the
    /// turn pointer is reset to the first team if it pointed at the removed
    /// slot or past the shortened roster.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::RosterFloor`] if removal would leave fewer
    /// than two teams and [`RosterError::UnknownTeam`] if no team has that
    /// id.
    pub fn try_remove_team(&mut self, team_id: Id) -> Result<(), RosterError> {
        let index = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(RosterError::UnknownTeam)?;
        if self.teams.len() <= MIN_TEAMS {
            return Err(RosterError::RosterFloor);
        }

        self.draft.release_all(team_id);
        self.teams.remove(index);
        if self.current_team_index == index || self.current_team_index >= self.teams.len() {
            self.current_team_index = 0;
        }
        Ok(())
    }

    /// Removes a team, silently doing nothing if the roster floor or an
    /// unknown id prevents it
    pub fn remove_team(&mut self, team_id: Id) {
        let _ = self.try_remove_team(team_id);
    }

    // Draft

    /// The current setup stage
    pub fn setup_stage(&self) -> Stage {
        self.draft.stage()
    }

    /// Moves setup from roster editing to category selection
    pub fn begin_category_selection(&mut self) {
        self.draft.begin_category_selection();
    }

    /// Categories still available in the shared pool
    pub fn available_categories(&self) -> impl Iterator<Item = &Category> {
        self.draft.available()
    }

    /// Categories a team has claimed, in claim order
    pub fn claimed_categories(&self, team_id: Id) -> impl Iterator<Item = &Category> {
        self.draft.claimed_by(team_id)
    }

    /// Claims a category from the pool for a team
    ///
    /// # Errors
    ///
    /// Returns the [`DraftError`] describing why the claim was refused.
    pub fn try_select_category_for_team(
        &mut self,
        team_id: Id,
        category_id: Id,
    ) -> Result<(), DraftError> {
        self.draft.try_claim(team_id, category_id)
    }

    /// Claims a category for a team, silently doing nothing if it cannot
    pub fn select_category_for_team(&mut self, team_id: Id, category_id: Id) {
        self.draft.claim(team_id, category_id);
    }

    /// Returns a team's claimed category to the pool, silently doing
    /// nothing if that team does not hold it
    pub fn remove_category_from_team(&mut self, team_id: Id, category_id: Id) {
        self.draft.release(team_id, category_id);
    }

    /// Whether every team has claimed exactly its quota of categories
    pub fn are_all_categories_selected(&self) -> bool {
        self.draft.all_claimed(self.teams.iter().map(|t| t.id))
    }

    /// Whether the pool cannot supply a full draft for the current roster
    pub fn is_draft_starved(&self) -> bool {
        self.draft.is_starved(self.teams.len())
    }

    /// Builds the board from the draft and starts play
    ///
    /// Categories land in roster order, then claim order within each team.
    /// A one-way transition; callers gate it on
    /// [`Game::are_all_categories_selected`].
    pub fn finalize_categories(&mut self) {
        let roster = self.teams.iter().map(|t| t.id).collect_vec();
        self.categories = self.draft.finalize(roster);
    }

    // Play

    /// Records an answer to a board question
    ///
    /// A correct answer credits the question's value to the team whose turn
    /// it is. Either way the question joins the answered set, and the game
    /// is over once that set covers the board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownQuestion`] if the id is not on the board
    /// and [`GameError::AlreadyAnswered`] on resubmission; neither changes
    /// any state.
    pub fn try_answer_question(
        &mut self,
        question_id: Id,
        is_correct: bool,
    ) -> Result<(), GameError> {
        let question = self
            .categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .find(|q| q.id == question_id)
            .ok_or(GameError::UnknownQuestion)?;
        if self.answered_questions.contains(&question_id) {
            return Err(GameError::AlreadyAnswered);
        }
        let value = question.value;

        if is_correct {
            self.teams[self.current_team_index].score += value;
        }
        self.answered_questions.push(question_id);
        self.game_over = self.answered_questions.len() == self.total_question_count();
        Ok(())
    }

    /// Records an answer, silently doing nothing for an unknown or
    /// already-answered question
    pub fn answer_question(&mut self, question_id: Id, is_correct: bool) {
        let _ = self.try_answer_question(question_id, is_correct);
    }

    /// Advances the turn to the next team in roster order, cyclically
    pub fn next_turn(&mut self) {
        self.current_team_index = (self.current_team_index + 1) % self.teams.len();
    }

    /// Consumes a team's lifeline if it is still available
    ///
    /// Only the availability flag changes; any gameplay effect is applied
    /// by the presentation layer reacting to it. Returns `true` if the
    /// lifeline was consumed by this call; a repeat call for the same team
    /// and lifeline is a no-op.
    pub fn trigger_lifeline(&mut self, team_id: Id, lifeline: Lifeline) -> bool {
        self.teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .is_some_and(|t| t.use_lifeline(lifeline))
    }

    /// Sets the countdown duration for future question timers
    ///
    /// The input is clamped to the configured bounds. A timer already
    /// running keeps its original duration.
    pub fn set_question_timer_duration(&mut self, seconds: u64) {
        self.question_timer_duration = Duration::from_secs(
            seconds.clamp(MIN_DURATION_SECONDS, MAX_DURATION_SECONDS),
        );
    }

    /// Starts a countdown for the question being displayed
    ///
    /// The timer runs for the configured duration; ticks are scheduled
    /// through the caller's alarm callback and routed back to the returned
    /// timer.
    pub fn start_question_timer<S: FnMut(AlarmMessage, Duration)>(
        &self,
        schedule: S,
    ) -> QuestionTimer {
        QuestionTimer::start(self.question_timer_duration, schedule)
    }

    /// Restores the whole session to its pre-draft state
    ///
    /// Teams keep their roster slots but drop back to a zero score with all
    /// lifelines available; the board and answered set clear, the turn
    /// pointer returns to the first team, the timer duration returns to its
    /// default, and the draft pool is re-seeded with the full catalog.
    pub fn reset_game(&mut self) {
        for team in &mut self.teams {
            team.reset();
        }
        self.current_team_index = 0;
        self.categories.clear();
        self.answered_questions.clear();
        self.game_over = false;
        self.question_timer_duration = Duration::from_secs(DEFAULT_DURATION_SECONDS);
        self.draft = Draft::new(&self.catalog);
    }

    // Reads

    /// Teams in roster order
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Index of the team whose turn it is
    pub fn current_team_index(&self) -> usize {
        self.current_team_index
    }

    /// The team whose turn it is
    pub fn current_team(&self) -> &Team {
        &self.teams[self.current_team_index]
    }

    /// The finalized board; empty until the draft is finalized
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Ids of answered questions in answer order
    pub fn answered_questions(&self) -> &[Id] {
        &self.answered_questions
    }

    /// Whether a question has been answered
    pub fn is_answered(&self, question_id: Id) -> bool {
        self.answered_questions.contains(&question_id)
    }

    /// Whether every question on the board has been answered
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// The configured countdown duration for question timers
    pub fn question_timer_duration(&self) -> Duration {
        self.question_timer_duration
    }

    /// Total number of questions on the finalized board
    pub fn total_question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    /// Looks up a board question by id
    pub fn find_question(&self, question_id: Id) -> Option<&Question> {
        self.categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .find(|q| q.id == question_id)
    }

    /// The team with the highest score; ties go to the earlier roster slot
    pub fn winner(&self) -> &Team {
        self.teams
            .iter()
            .rev()
            .max_by_key(|t| t.score)
            .expect("roster never drops below two teams")
    }

    /// Teams ordered by score, highest first; roster order breaks ties
    pub fn standings(&self) -> Vec<&Team> {
        self.teams
            .iter()
            .sorted_by_key(|t| std::cmp::Reverse(t.score))
            .collect_vec()
    }
}
