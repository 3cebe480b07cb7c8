use serde::{Deserialize, Serialize};
use crate::models::{MatchDetails, MatchingConfig, ScoredMatch, StudentPreferences, TutorCandidate};
use crate::core::{
    filters::{language_matches, time_matches, topic_matches},
    scoring::{display_score, extract_features, weighted_score},
};

/// Result of the matching process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
}

impl MatchResult {
    /// True when the pool itself was empty, as opposed to nobody qualifying
    pub fn no_candidates(&self) -> bool {
        self.total_candidates == 0
    }
}

/// Main matching orchestrator - implements the filter-then-score pipeline
///
/// # Pipeline Stages
/// 1. Hard constraints: verified, topic, time (first failure excludes)
/// 2. Feature extraction and weighted scoring
/// 3. Ranking by normalized score (stable, input order breaks ties)
/// 4. Threshold filter and truncation to `max_results`
///
/// The matcher holds nothing but its configuration, so one instance can be
/// shared by every request.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score a single tutor, `None` if a hard constraint rejects it
    pub fn score_tutor(
        &self,
        tutor: &TutorCandidate,
        preferences: &StudentPreferences,
    ) -> Option<ScoredMatch> {
        if !passes_hard_constraints(tutor, preferences) {
            return None;
        }

        let language_match = language_matches(&tutor.teaching_languages, &preferences.preferred_language);
        let features = extract_features(tutor, language_match);
        let normalized_score = weighted_score(&features, &self.config.weights);

        Some(ScoredMatch {
            id: tutor.id,
            name: tutor.name.clone(),
            email: tutor.email.clone(),
            subject_domains: tutor.subject_domains.clone(),
            teaching_languages: tutor.teaching_languages.clone(),
            available_slots: tutor.available_slots.clone(),
            rating: tutor.rating,
            years_of_experience: tutor.years_of_experience,
            total_sessions_completed: tutor.total_sessions_completed,
            score: display_score(normalized_score),
            normalized_score,
            match_details: MatchDetails {
                topic: true,
                language: language_match,
                time: true,
                rating_score: features.rating,
                weights: self.config.weights,
            },
            features,
        })
    }

    /// Rank every eligible tutor without applying threshold or limit
    pub fn rank(
        &self,
        tutors: &[TutorCandidate],
        preferences: &StudentPreferences,
    ) -> Vec<ScoredMatch> {
        let mut scored: Vec<ScoredMatch> = tutors
            .iter()
            .filter_map(|tutor| self.score_tutor(tutor, preferences))
            .collect();

        // sort_by is stable, equal scores keep input order
        scored.sort_by(|a, b| {
            b.normalized_score
                .partial_cmp(&a.normalized_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored
    }

    /// Find the best tutors for a student's preferences
    ///
    /// # Arguments
    /// * `tutors` - Candidate pool supplied by the caller
    /// * `preferences` - The student's requested topic, language and time
    ///
    /// # Returns
    /// MatchResult with at most `max_results` matches, best first, none below
    /// `min_score_threshold`
    pub fn find_matches(
        &self,
        tutors: &[TutorCandidate],
        preferences: &StudentPreferences,
    ) -> MatchResult {
        let total_candidates = tutors.len();

        let mut matches: Vec<ScoredMatch> = self
            .rank(tutors, preferences)
            .into_iter()
            .filter(|m| m.normalized_score >= self.config.min_score_threshold)
            .collect();

        matches.truncate(self.config.max_results);

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Verified, then topic, then time; stops at the first failure
#[inline]
pub fn passes_hard_constraints(tutor: &TutorCandidate, preferences: &StudentPreferences) -> bool {
    tutor.is_verified
        && topic_matches(&tutor.subject_domains, &preferences.learning_topic)
        && time_matches(&tutor.available_slots, &preferences.time_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchingWeights;
    use uuid::Uuid;

    fn create_tutor(name: &str, subjects: &[&str], languages: &[&str], slots: &[&str], rating: f64) -> TutorCandidate {
        TutorCandidate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            is_verified: true,
            subject_domains: subjects.iter().map(|s| s.to_string()).collect(),
            teaching_languages: languages.iter().map(|s| s.to_string()).collect(),
            available_slots: slots.iter().map(|s| s.to_string()).collect(),
            rating,
            total_ratings: 10,
            years_of_experience: 2.0,
            total_sessions_completed: 20,
        }
    }

    fn create_preferences(topic: &str, language: &str, time: &str) -> StudentPreferences {
        StudentPreferences {
            learning_topic: topic.to_string(),
            preferred_language: language.to_string(),
            time_of_day: time.to_string(),
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_config();
        let preferences = create_preferences("Math", "English", "Evening");

        let tutors = vec![
            create_tutor("Ada", &["Math"], &["English"], &["Evening"], 4.5),     // Match
            create_tutor("Bob", &["Physics"], &["English"], &["Evening"], 5.0),  // Wrong subject
            create_tutor("Cyd", &["Math"], &["English"], &["Morning"], 5.0),     // Wrong time
        ];

        let result = matcher.find_matches(&tutors, &preferences);

        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].name, "Ada");
    }

    #[test]
    fn test_language_miss_is_penalized_not_excluded() {
        let matcher = Matcher::with_default_config();
        let preferences = create_preferences("Math", "English", "Evening");

        let tutors = vec![
            create_tutor("Hindi", &["Math"], &["Hindi"], &["Evening"], 3.0),
            create_tutor("English", &["Math"], &["English"], &["Evening"], 3.0),
        ];

        let result = matcher.find_matches(&tutors, &preferences);

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].name, "English");
        assert!(!result.matches[1].match_details.language);
        assert_eq!(result.matches[1].features.language, 0.0);
        let gap = result.matches[0].normalized_score - result.matches[1].normalized_score;
        assert!((gap - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_default_config();
        let preferences = create_preferences("Math", "any", "Evening");

        let tutors: Vec<TutorCandidate> = ["first", "second", "third"]
            .iter()
            .map(|n| create_tutor(n, &["Math"], &["English"], &["Evening"], 4.0))
            .collect();

        let result = matcher.find_matches(&tutors, &preferences);
        let names: Vec<&str> = result.matches.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_threshold_and_limit() {
        let config = MatchingConfig {
            weights: MatchingWeights::default(),
            max_results: 2,
            min_score_threshold: 0.8,
        };
        let matcher = Matcher::new(config);
        let preferences = create_preferences("Math", "English", "Evening");

        let tutors = vec![
            create_tutor("a", &["Math"], &["English"], &["Evening"], 5.0),
            create_tutor("b", &["Math"], &["English"], &["Evening"], 4.0),
            create_tutor("c", &["Math"], &["English"], &["Evening"], 3.0),
            create_tutor("d", &["Math"], &["French"], &["Evening"], 5.0), // 0.776
        ];

        let result = matcher.find_matches(&tutors, &preferences);

        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].name, "a");
        assert_eq!(result.matches[1].name, "b");

        let unlimited = Matcher::new(MatchingConfig { max_results: 10, ..config });
        let result = unlimited.find_matches(&tutors, &preferences);

        assert_eq!(result.matches.len(), 3);
        assert!(result.matches.iter().all(|m| m.normalized_score >= 0.8));
    }

    #[test]
    fn test_match_details_snapshot_weights() {
        let config = MatchingConfig {
            weights: MatchingWeights { topic: 0.4, language: 0.3, time: 0.2, rating: 0.1 },
            ..MatchingConfig::default()
        };
        let matcher = Matcher::new(config);
        let preferences = create_preferences("Math", "English", "Evening");
        let tutor = create_tutor("a", &["Math"], &["English"], &["Evening"], 5.0);

        let scored = matcher.score_tutor(&tutor, &preferences).unwrap();

        assert_eq!(scored.match_details.weights, config.weights);
        assert_eq!(scored.score, (scored.normalized_score * 100.0).round() as u32);
    }

    #[test]
    fn test_empty_pool() {
        let matcher = Matcher::default();
        let preferences = create_preferences("Math", "English", "Evening");

        let result = matcher.find_matches(&[], &preferences);

        assert!(result.matches.is_empty());
        assert!(result.no_candidates());
    }
}
