//! Pre-game category draft
//!
//! Before play starts every team claims exactly three categories from a
//! shared pool. The pool and the per-team claims are kept as one owned
//! partition: a single authoritative list of draft entries, each tagged
//! with its current owner. Categories are never copied between containers,
//! so no claim sequence can lose or duplicate one.
//!
//! The draft is transient. [`Draft::finalize`] drains it into the board
//! and the coordinator is irrelevant afterward, until a game reset
//! re-seeds it from the catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Catalog, Category},
    constants::draft::CATEGORIES_PER_TEAM,
    id::Id,
};

/// The two stages of the pre-game setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Editing the team roster
    Teams,
    /// Claiming categories from the shared pool
    Categories,
}

/// Errors surfaced by the fallible draft operations
///
/// The permissive operations on [`crate::game::Game`] swallow these and
/// no-op; they exist so tests and hardened callers can observe why a call
/// changed nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    /// The team already holds its full quota of categories
    #[error("team already holds {CATEGORIES_PER_TEAM} categories")]
    TeamFull,
    /// The category is not currently in the shared pool
    #[error("category is not available in the pool")]
    NotAvailable,
    /// The category is not claimed by that team
    #[error("category is not claimed by that team")]
    NotClaimed,
}

/// Who currently holds a draft entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Owner {
    /// In the shared pool, claimable by any team
    Pool,
    /// Claimed by the team with this id
    Team(Id),
}

/// One category together with its current owner
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DraftEntry {
    category: Category,
    owner: Owner,
}

/// Coordinates the category draft over one owned partition of the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    /// Every catalog category, tagged with its owner. Claiming and releasing
    /// move an entry to the back of the list, so filtering by owner yields
    /// claim order for teams and arrival order for the pool.
    entries: Vec<DraftEntry>,
    stage: Stage,
}

impl Draft {
    /// Seeds a fresh draft with the whole catalog in the pool
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            entries: catalog
                .categories
                .iter()
                .cloned()
                .map(|category| DraftEntry {
                    category,
                    owner: Owner::Pool,
                })
                .collect(),
            stage: Stage::Teams,
        }
    }

    /// The current setup stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Moves from roster editing to category selection
    pub fn begin_category_selection(&mut self) {
        self.stage = Stage::Categories;
    }

    /// Categories currently in the shared pool, in arrival order
    pub fn available(&self) -> impl Iterator<Item = &Category> {
        self.entries
            .iter()
            .filter(|e| e.owner == Owner::Pool)
            .map(|e| &e.category)
    }

    /// Categories claimed by a team, in claim order
    pub fn claimed_by(&self, team_id: Id) -> impl Iterator<Item = &Category> {
        self.entries
            .iter()
            .filter(move |e| e.owner == Owner::Team(team_id))
            .map(|e| &e.category)
    }

    /// Number of categories a team has claimed
    pub fn claimed_count(&self, team_id: Id) -> usize {
        self.claimed_by(team_id).count()
    }

    /// Claims a category from the pool for a team
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::TeamFull`] if the team already holds its quota
    /// and [`DraftError::NotAvailable`] if the category is not in the pool,
    /// including when that team or another already claimed it.
    pub fn try_claim(&mut self, team_id: Id, category_id: Id) -> Result<(), DraftError> {
        if self.claimed_count(team_id) >= CATEGORIES_PER_TEAM {
            return Err(DraftError::TeamFull);
        }
        let index = self
            .entries
            .iter()
            .position(|e| e.owner == Owner::Pool && e.category.id == category_id)
            .ok_or(DraftError::NotAvailable)?;

        // move to the back so per-team filtering preserves claim order
        let mut entry = self.entries.remove(index);
        entry.owner = Owner::Team(team_id);
        self.entries.push(entry);
        Ok(())
    }

    /// Claims a category for a team, silently doing nothing if it cannot
    pub fn claim(&mut self, team_id: Id, category_id: Id) {
        let _ = self.try_claim(team_id, category_id);
    }

    /// Returns a claimed category from a team back to the pool
    ///
    /// The category is appended at the back of the pool, not re-sorted
    /// into catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::NotClaimed`] if that team does not hold the
    /// category.
    pub fn try_release(&mut self, team_id: Id, category_id: Id) -> Result<(), DraftError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.owner == Owner::Team(team_id) && e.category.id == category_id)
            .ok_or(DraftError::NotClaimed)?;

        let mut entry = self.entries.remove(index);
        entry.owner = Owner::Pool;
        self.entries.push(entry);
        Ok(())
    }

    /// Returns a claimed category to the pool, silently doing nothing if it
    /// is not claimed by that team
    pub fn release(&mut self, team_id: Id, category_id: Id) {
        let _ = self.try_release(team_id, category_id);
    }

    /// Returns everything a team holds back to the pool
    ///
    /// Used when a team is removed from the roster mid-draft.
    pub fn release_all(&mut self, team_id: Id) {
        for entry in &mut self.entries {
            if entry.owner == Owner::Team(team_id) {
                entry.owner = Owner::Pool;
            }
        }
    }

    /// Whether every roster team holds exactly its quota of categories
    ///
    /// False for an empty roster.
    pub fn all_claimed<I: IntoIterator<Item = Id>>(&self, roster: I) -> bool {
        let mut any = false;
        for team_id in roster {
            any = true;
            if self.claimed_count(team_id) != CATEGORIES_PER_TEAM {
                return false;
            }
        }
        any
    }

    /// Whether the pool cannot supply a full draft for this many teams
    ///
    /// The draft does not refuse to proceed in this state; the helper only
    /// lets a caller warn before teams get stuck.
    pub fn is_starved(&self, team_count: usize) -> bool {
        self.entries.len() < CATEGORIES_PER_TEAM * team_count
    }

    /// Drains the draft into the finalized board
    ///
    /// Categories are ordered by roster order, then claim order within a
    /// team. Unclaimed pool entries are discarded; a one-way transition
    /// into play.
    pub fn finalize<I: IntoIterator<Item = Id>>(&mut self, roster: I) -> Vec<Category> {
        let mut entries = std::mem::take(&mut self.entries);
        let mut board = Vec::new();
        for team_id in roster {
            let (claimed, rest): (Vec<_>, Vec<_>) = entries
                .into_iter()
                .partition(|e| e.owner == Owner::Team(team_id));
            board.extend(claimed.into_iter().map(|e| e.category));
            entries = rest;
        }
        board
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn draft_and_ids() -> (Draft, Vec<Id>) {
        let catalog = Catalog::sample();
        let ids = catalog.categories.iter().map(|c| c.id).collect();
        (Draft::new(&catalog), ids)
    }

    /// The pool and all claims together always partition the catalog.
    fn assert_partition(draft: &Draft, teams: &[Id], total: usize) {
        let pooled = draft.available().count();
        let claimed: usize = teams.iter().map(|t| draft.claimed_count(*t)).sum();
        assert_eq!(pooled + claimed, total);

        let mut seen: Vec<Id> = draft.available().map(|c| c.id).collect();
        for team in teams {
            seen.extend(draft.claimed_by(*team).map(|c| c.id));
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }

    #[test]
    fn test_claim_moves_category_out_of_pool() {
        let (mut draft, ids) = draft_and_ids();
        let team = Id::new();

        draft.try_claim(team, ids[0]).unwrap();
        assert_eq!(draft.claimed_count(team), 1);
        assert!(draft.available().all(|c| c.id != ids[0]));
        assert_partition(&draft, &[team], 4);
    }

    #[test]
    fn test_claim_quota_enforced() {
        let (mut draft, ids) = draft_and_ids();
        let team = Id::new();

        for id in &ids[..3] {
            draft.try_claim(team, *id).unwrap();
        }
        assert_eq!(draft.try_claim(team, ids[3]), Err(DraftError::TeamFull));
        assert_eq!(draft.claimed_count(team), 3);
    }

    #[test]
    fn test_claimed_category_unavailable_to_others() {
        let (mut draft, ids) = draft_and_ids();
        let (a, b) = (Id::new(), Id::new());

        draft.try_claim(a, ids[0]).unwrap();
        assert_eq!(draft.try_claim(b, ids[0]), Err(DraftError::NotAvailable));
        assert_eq!(draft.try_claim(a, ids[0]), Err(DraftError::NotAvailable));
        assert_partition(&draft, &[a, b], 4);
    }

    #[test]
    fn test_release_appends_to_pool_back() {
        let (mut draft, ids) = draft_and_ids();
        let team = Id::new();

        draft.try_claim(team, ids[0]).unwrap();
        draft.try_release(team, ids[0]).unwrap();

        // released entry arrives at the back of the pool, not its old slot
        let pool: Vec<Id> = draft.available().map(|c| c.id).collect();
        assert_eq!(pool, vec![ids[1], ids[2], ids[3], ids[0]]);
        assert_eq!(draft.claimed_count(team), 0);
    }

    #[test]
    fn test_release_requires_ownership() {
        let (mut draft, ids) = draft_and_ids();
        let (a, b) = (Id::new(), Id::new());

        draft.try_claim(a, ids[0]).unwrap();
        assert_eq!(draft.try_release(b, ids[0]), Err(DraftError::NotClaimed));
        assert_eq!(draft.try_release(a, ids[1]), Err(DraftError::NotClaimed));
    }

    #[test]
    fn test_partition_preserved_across_interleaving() {
        let (mut draft, ids) = draft_and_ids();
        let (a, b) = (Id::new(), Id::new());

        draft.claim(a, ids[0]);
        draft.claim(b, ids[1]);
        draft.release(a, ids[0]);
        draft.claim(b, ids[0]);
        draft.claim(a, ids[2]);
        draft.release(b, ids[1]);
        draft.claim(a, ids[1]);

        assert_partition(&draft, &[a, b], 4);
        assert_eq!(draft.claimed_count(a), 2);
        assert_eq!(draft.claimed_count(b), 1);
    }

    #[test]
    fn test_all_claimed() {
        let catalog = Catalog::sample();
        let extra = Catalog::sample();
        let mut combined = catalog.clone();
        combined.categories.extend(extra.categories);
        let ids: Vec<Id> = combined.categories.iter().map(|c| c.id).collect();
        let mut draft = Draft::new(&combined);

        let (a, b) = (Id::new(), Id::new());
        assert!(!draft.all_claimed(std::iter::empty()));
        assert!(!draft.all_claimed([a, b]));

        for id in &ids[..3] {
            draft.claim(a, *id);
        }
        assert!(!draft.all_claimed([a, b]));
        assert!(draft.all_claimed([a]));

        for id in &ids[3..6] {
            draft.claim(b, *id);
        }
        assert!(draft.all_claimed([a, b]));
    }

    #[test]
    fn test_finalize_orders_by_roster_then_claim() {
        let catalog = Catalog::sample();
        let extra = Catalog::sample();
        let mut combined = catalog;
        combined.categories.extend(extra.categories);
        let ids: Vec<Id> = combined.categories.iter().map(|c| c.id).collect();
        let mut draft = Draft::new(&combined);

        let (a, b) = (Id::new(), Id::new());
        // interleave the claims; finalize must still group by team
        draft.claim(b, ids[4]);
        draft.claim(a, ids[0]);
        draft.claim(b, ids[5]);
        draft.claim(a, ids[2]);
        draft.claim(a, ids[1]);
        draft.claim(b, ids[3]);

        let board = draft.finalize([a, b]);
        let board_ids: Vec<Id> = board.iter().map(|c| c.id).collect();
        assert_eq!(board_ids, vec![ids[0], ids[2], ids[1], ids[4], ids[5], ids[3]]);

        // one-way transition: the draft is drained
        assert_eq!(draft.available().count(), 0);
    }

    #[test]
    fn test_release_all_returns_claims() {
        let (mut draft, ids) = draft_and_ids();
        let team = Id::new();
        draft.claim(team, ids[0]);
        draft.claim(team, ids[1]);

        draft.release_all(team);
        assert_eq!(draft.claimed_count(team), 0);
        assert_eq!(draft.available().count(), 4);
    }

    #[test]
    fn test_starvation_detection() {
        let (draft, _) = draft_and_ids();
        assert!(!draft.is_starved(1));
        assert!(draft.is_starved(2)); // 4 categories cannot cover 2 * 3
    }

    #[test]
    fn test_stage_transition() {
        let (mut draft, _) = draft_and_ids();
        assert_eq!(draft.stage(), Stage::Teams);
        draft.begin_category_selection();
        assert_eq!(draft.stage(), Stage::Categories);
    }
}
