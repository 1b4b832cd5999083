//! Suggested-rehearsal-time ranking.
//!
//! The engine is a pure function over a snapshot of a band's polls and its
//! active roster. It never touches the repository; [`crate::services::suggestions`]
//! takes the snapshot and hands it over.
//!
//! ```text
//! polls ──► open polls ──► options inside window ──► long enough?
//!                                                        │
//!   roster ──► count AVAILABLE / MAYBE per option ◄──────┘
//!                          │
//!                quorum filter ──► stable 3-key sort ──► top 10
//! ```

pub mod error;
pub mod ranking;

pub use error::{SchedulingError, SchedulingResult};
pub use ranking::{
    compare_slots, rank_slots, MemberSummary, RankedSlot, ResolvedConstraints, SuggestionParams, Suggestions,
    DEFAULT_DURATION_MINUTES, MAX_SUGGESTIONS,
};
