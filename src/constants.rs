//! Configuration constants for the Tahadi game system
//!
//! This module contains the numeric limits and fixed shapes used throughout
//! the game core: timer bounds, draft quotas, board geometry, and the
//! roster floor.

/// Question timer configuration constants
pub mod timer {
    /// Minimum configurable duration of a question timer in seconds
    pub const MIN_DURATION_SECONDS: u64 = 10;
    /// Maximum configurable duration of a question timer in seconds
    pub const MAX_DURATION_SECONDS: u64 = 120;
    /// Default duration of a question timer in seconds
    pub const DEFAULT_DURATION_SECONDS: u64 = 30;
    /// Interval between countdown ticks in seconds
    pub const TICK_SECONDS: u64 = 1;
}

/// Category draft configuration constants
pub mod draft {
    /// Number of categories every team must claim before the game can start
    pub const CATEGORIES_PER_TEAM: usize = 3;
}

/// Board geometry constants
pub mod board {
    /// Number of questions every category carries
    pub const QUESTIONS_PER_CATEGORY: usize = 6;
    /// The point values a question may carry; each appears twice per category
    pub const QUESTION_VALUES: [u64; 3] = [200, 400, 600];
}

/// Team roster configuration constants
pub mod roster {
    /// Minimum number of teams; removal below this floor is refused
    pub const MIN_TEAMS: usize = 2;
}
