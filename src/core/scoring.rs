use crate::models::{MatchFeatures, MatchingWeights, TutorCandidate};

/// Years of experience that earn the full experience bonus
const EXPERIENCE_CAP_YEARS: f64 = 10.0;

/// Completed sessions that earn the full volume bonus
const SESSIONS_CAP: f64 = 100.0;

/// Calculate a tutor's quality score (0-1)
///
/// Scoring formula:
/// score = clamp(
///     rating / 5 * 0.7 +                      # Average rating dominates
///     min(years / 10, 1) * 0.2 +              # Tenure bonus, capped
///     min(sessions / 100, 1) * 0.1,           # Volume bonus, capped
///     0, 1)
///
/// The caps keep a new tutor with a handful of perfect ratings below an
/// experienced, broadly rated one.
pub fn calculate_rating_score(tutor: &TutorCandidate) -> f64 {
    let rating = tutor.rating / 5.0;
    let experience = (tutor.years_of_experience / EXPERIENCE_CAP_YEARS).min(1.0);
    let sessions = (f64::from(tutor.total_sessions_completed) / SESSIONS_CAP).min(1.0);

    // Integer coefficients over a single division keep the bounds exact
    let combined = (rating * 7.0 + experience * 2.0 + sessions) / 10.0;

    combined.clamp(0.0, 1.0)
}

/// Build the feature vector for a tutor that already passed the hard constraints
///
/// Topic and time are always 1 at this point; language is 1 or 0 and rating
/// is continuous.
#[inline]
pub fn extract_features(tutor: &TutorCandidate, language_match: bool) -> MatchFeatures {
    MatchFeatures {
        topic: 1.0,
        language: if language_match { 1.0 } else { 0.0 },
        time: 1.0,
        rating: calculate_rating_score(tutor),
    }
}

/// Weighted sum of the features, Σ weight_i * feature_i
#[inline]
pub fn weighted_score(features: &MatchFeatures, weights: &MatchingWeights) -> f64 {
    // Smallest reference weights first so the reference configuration sums to exactly 1.0
    weights.rating * features.rating
        + weights.time * features.time
        + weights.language * features.language
        + weights.topic * features.topic
}

/// Display score on a 0-100 scale
#[inline]
pub fn display_score(normalized: f64) -> u32 {
    (normalized * 100.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn create_test_tutor(rating: f64, years: f64, sessions: u32) -> TutorCandidate {
        TutorCandidate {
            id: Uuid::new_v4(),
            name: "Test Tutor".to_string(),
            email: "tutor@example.com".to_string(),
            is_verified: true,
            subject_domains: vec!["Math".to_string()],
            teaching_languages: vec!["English".to_string()],
            available_slots: vec!["Evening".to_string()],
            rating,
            total_ratings: 3,
            years_of_experience: years,
            total_sessions_completed: sessions,
        }
    }

    #[test]
    fn test_rating_score_bounds_are_exact() {
        assert_eq!(calculate_rating_score(&create_test_tutor(5.0, 10.0, 100)), 1.0);
        assert_eq!(calculate_rating_score(&create_test_tutor(0.0, 0.0, 0)), 0.0);
    }

    #[test]
    fn test_rating_score_caps_bonuses() {
        let veteran = calculate_rating_score(&create_test_tutor(5.0, 40.0, 5000));
        assert_eq!(veteran, 1.0);

        let experienced = calculate_rating_score(&create_test_tutor(0.0, 25.0, 0));
        assert!((experienced - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_new_perfect_tutor_ranks_below_veteran() {
        let newcomer = calculate_rating_score(&create_test_tutor(5.0, 0.0, 3));
        let veteran = calculate_rating_score(&create_test_tutor(4.2, 8.0, 150));
        assert!(newcomer < veteran, "newcomer {} vs veteran {}", newcomer, veteran);
    }

    #[test]
    fn test_weighted_score_reference_weights() {
        let weights = MatchingWeights::default();
        let full = MatchFeatures { topic: 1.0, language: 1.0, time: 1.0, rating: 1.0 };
        assert_eq!(weighted_score(&full, &weights), 1.0);

        let no_language = MatchFeatures { language: 0.0, rating: 0.0, ..full };
        assert!((weighted_score(&no_language, &weights) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_extract_features() {
        let tutor = create_test_tutor(5.0, 10.0, 100);
        let features = extract_features(&tutor, false);
        assert_eq!(features.topic, 1.0);
        assert_eq!(features.language, 0.0);
        assert_eq!(features.time, 1.0);
        assert_eq!(features.rating, 1.0);
    }

    #[test]
    fn test_display_score() {
        assert_eq!(display_score(1.0), 100);
        assert_eq!(display_score(0.706), 71);
        assert_eq!(display_score(0.704), 70);
        assert_eq!(display_score(0.0), 0);
    }
}
