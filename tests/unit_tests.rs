// Unit tests for Tutor Match

use tutor_match::core::{
    filters::{language_matches, time_matches, topic_matches},
    normalize::normalize,
    rating::next_average,
    scoring::{calculate_rating_score, weighted_score},
    time::TimePeriod,
};
use tutor_match::models::{MatchFeatures, MatchingWeights, TutorCandidate};
use uuid::Uuid;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn create_test_tutor(rating: f64, years: f64, sessions: u32) -> TutorCandidate {
    TutorCandidate {
        id: Uuid::new_v4(),
        name: "Test Tutor".to_string(),
        email: "tutor@example.com".to_string(),
        is_verified: true,
        subject_domains: strings(&["Math"]),
        teaching_languages: strings(&["English"]),
        available_slots: strings(&["Evening"]),
        rating,
        total_ratings: 0,
        years_of_experience: years,
        total_sessions_completed: sessions,
    }
}

#[test]
fn test_normalize_trims_and_lowercases() {
    assert_eq!(normalize("  Evening (5-9 PM) "), "evening (5-9 pm)");
    assert_eq!(normalize(""), "");
}

#[test]
fn test_topic_substring_either_direction() {
    assert!(topic_matches(&strings(&["Physics 101"]), "physics"));
    assert!(topic_matches(&strings(&["Math"]), "Advanced MATH"));
    assert!(!topic_matches(&strings(&["Physics"]), "Math"));
    assert!(!topic_matches(&strings(&["Math"]), "   "));
    assert!(!topic_matches(&[], "Math"));
}

#[test]
fn test_any_language_matches_everyone() {
    assert!(language_matches(&strings(&["Hindi"]), "any"));
    assert!(language_matches(&strings(&["Hindi"]), " ANY "));
    assert!(language_matches(&[], "any"));
    assert!(!language_matches(&strings(&["Hindi"]), "English"));
    assert!(!language_matches(&strings(&["English"]), ""));
}

#[test]
fn test_time_keyword_matching() {
    // Request classified as afternoon, slot mentions "pm"
    assert!(time_matches(&strings(&["2 PM - 4 PM"]), "Afternoon"));
    // Direct text overlap
    assert!(time_matches(&strings(&["Weekday mornings"]), "morning"));
    assert!(!time_matches(&strings(&["Morning"]), "Evening"));
    assert!(!time_matches(&strings(&["Evening"]), ""));
}

#[test]
fn test_unclassifiable_request_needs_text_overlap() {
    assert_eq!(TimePeriod::classify("weekends"), None);
    assert!(time_matches(&strings(&["Weekends only"]), "weekends"));
    assert!(!time_matches(&strings(&["Evening"]), "weekends"));
}

#[test]
fn test_rating_score_bounds() {
    assert_eq!(calculate_rating_score(&create_test_tutor(0.0, 0.0, 0)), 0.0);
    assert_eq!(calculate_rating_score(&create_test_tutor(5.0, 10.0, 100)), 1.0);
    // Experience and sessions are capped
    assert_eq!(calculate_rating_score(&create_test_tutor(5.0, 25.0, 900)), 1.0);
    assert_eq!(calculate_rating_score(&create_test_tutor(2.5, 5.0, 50)), 0.5);
}

#[test]
fn test_weighted_score_reference_weights() {
    let weights = MatchingWeights::default();
    let all = MatchFeatures { topic: 1.0, language: 1.0, time: 1.0, rating: 1.0 };
    assert_eq!(weighted_score(&all, &weights), 1.0);

    let no_language = MatchFeatures { language: 0.0, rating: 0.0, ..all };
    assert!((weighted_score(&no_language, &weights) - 0.7).abs() < 1e-9);
}

#[test]
fn test_running_average() {
    let update = next_average(0.0, 0, 4.0);
    assert_eq!(update.rating, 4.0);
    assert_eq!(update.total_ratings, 1);

    let update = next_average(4.0, 2, 5.0);
    assert_eq!(update.rating, 4.3);
    assert_eq!(update.total_ratings, 3);
}
