//! Tutor Match - ranks verified tutors against a student's learning preferences
//!
//! The [`core`] module holds the matching engine: hard constraints on topic and
//! time, a weighted score over topic, language, time and tutor quality, and a
//! ranked, thresholded result. [`routes`] and [`services`] expose it over HTTP
//! with PostgreSQL as the tutor store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use core::{MatchResult, Matcher};
pub use models::{MatchingConfig, MatchingWeights, ScoredMatch, StudentPreferences, TutorCandidate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.config().max_results, 5);
        assert!((matcher.config().weights.total() - 1.0).abs() < 1e-9);
    }
}
