use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Tutor record as read from the store
///
/// Missing collections deserialize as empty and missing numbers as zero, so a
/// partially filled document never fails to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorCandidate {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "isVerified", default)]
    pub is_verified: bool,
    #[serde(rename = "subjectDomains", default)]
    pub subject_domains: Vec<String>,
    #[serde(rename = "teachingLanguages", default)]
    pub teaching_languages: Vec<String>,
    #[serde(rename = "availableSlots", default)]
    pub available_slots: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "totalRatings", default)]
    pub total_ratings: u32,
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: f64,
    #[serde(rename = "totalSessionsCompleted", default)]
    pub total_sessions_completed: u32,
}

/// What a student asked for in a single match request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPreferences {
    #[serde(rename = "learningTopic")]
    pub learning_topic: String,
    #[serde(rename = "preferredLanguage")]
    pub preferred_language: String,
    #[serde(rename = "timeOfDay")]
    pub time_of_day: String,
}

/// Weight of each scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingWeights {
    pub topic: f64,
    pub language: f64,
    pub time: f64,
    pub rating: f64,
}

impl MatchingWeights {
    pub fn total(&self) -> f64 {
        self.topic + self.language + self.time + self.rating
    }
}

impl Default for MatchingWeights {
    fn default() -> Self {
        Self {
            topic: 0.5,
            language: 0.2,
            time: 0.2,
            rating: 0.1,
        }
    }
}

/// Errors raised when a matching configuration is out of range
#[derive(Debug, Error, PartialEq)]
pub enum MatchingConfigError {
    #[error("Weight `{0}` must be a finite, non-negative number")]
    InvalidWeight(&'static str),

    #[error("max_results must be at least 1")]
    ZeroMaxResults,

    #[error("min_score_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

/// Engine configuration, fixed at start-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub weights: MatchingWeights,
    #[serde(rename = "maxResults")]
    pub max_results: usize,
    #[serde(rename = "minScoreThreshold")]
    pub min_score_threshold: f64,
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        let weights = [
            ("topic", self.weights.topic),
            ("language", self.weights.language),
            ("time", self.weights.time),
            ("rating", self.weights.rating),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchingConfigError::InvalidWeight(name));
            }
        }

        if self.max_results == 0 {
            return Err(MatchingConfigError::ZeroMaxResults);
        }

        if !(0.0..=1.0).contains(&self.min_score_threshold) {
            return Err(MatchingConfigError::ThresholdOutOfRange(self.min_score_threshold));
        }

        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: MatchingWeights::default(),
            max_results: 5,
            min_score_threshold: 0.3,
        }
    }
}

/// Raw feature values fed into the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchFeatures {
    pub topic: f64,
    pub language: f64,
    pub time: f64,
    pub rating: f64,
}

/// Per-dimension outcome plus the weights used, for transparency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub topic: bool,
    pub language: bool,
    pub time: bool,
    #[serde(rename = "ratingScore")]
    pub rating_score: f64,
    pub weights: MatchingWeights,
}

/// Scored match result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(rename = "subjectDomains")]
    pub subject_domains: Vec<String>,
    #[serde(rename = "teachingLanguages")]
    pub teaching_languages: Vec<String>,
    #[serde(rename = "availableSlots")]
    pub available_slots: Vec<String>,
    pub rating: f64,
    #[serde(rename = "yearsOfExperience")]
    pub years_of_experience: f64,
    #[serde(rename = "totalSessionsCompleted")]
    pub total_sessions_completed: u32,
    /// `normalized_score` on a 0-100 scale, rounded
    pub score: u32,
    #[serde(rename = "normalizedScore")]
    pub normalized_score: f64,
    #[serde(rename = "matchDetails")]
    pub match_details: MatchDetails,
    pub features: MatchFeatures,
}

/// Student profile as collected by the onboarding flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub grade: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "learningTopic")]
    pub learning_topic: Option<String>,
    #[serde(rename = "educationalBoard")]
    pub educational_board: Option<String>,
    pub exams: Option<String>,
    #[serde(rename = "tutorGender")]
    pub tutor_gender: Option<TutorGender>,
    #[serde(rename = "preferredLanguage")]
    pub preferred_language: Option<String>,
    pub mode: Option<LearningMode>,
    #[serde(rename = "sessionType")]
    pub session_type: Option<SessionType>,
    #[serde(rename = "daysPerWeek")]
    pub days_per_week: Option<u8>,
    #[serde(rename = "timeOfDay")]
    pub time_of_day: Option<String>,
    #[serde(rename = "classDuration")]
    pub class_duration: Option<String>,
    #[serde(rename = "weekPreference")]
    pub week_preference: Option<String>,
    #[serde(rename = "learningStyle")]
    pub learning_style: Option<String>,
    #[serde(rename = "wantsAssignments")]
    pub wants_assignments: Option<String>,
    #[serde(rename = "currentTutor")]
    pub current_tutor: Option<Uuid>,
}

impl StudentProfile {
    /// The three fields the matcher needs, if onboarding collected all of them
    pub fn preferences(&self) -> Option<StudentPreferences> {
        Some(StudentPreferences {
            learning_topic: self.learning_topic.clone()?,
            preferred_language: self.preferred_language.clone()?,
            time_of_day: self.time_of_day.clone()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tutor_gender")]
pub enum TutorGender {
    Male,
    Female,
    #[serde(rename = "No Preference")]
    #[sqlx(rename = "No Preference")]
    NoPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "learning_mode")]
pub enum LearningMode {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_type")]
pub enum SessionType {
    Group,
    Individual,
}
