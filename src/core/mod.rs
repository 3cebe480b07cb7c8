// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod rating;
pub mod scoring;
pub mod time;

pub use filters::{language_matches, time_matches, topic_matches, ANY_LANGUAGE};
pub use matcher::{passes_hard_constraints, MatchResult, Matcher};
pub use normalize::normalize;
pub use rating::{next_average, RatingUpdate};
pub use scoring::{calculate_rating_score, extract_features, weighted_score};
pub use time::TimePeriod;
