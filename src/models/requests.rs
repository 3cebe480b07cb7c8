use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::domain::{LearningMode, SessionType, StudentPreferences, TutorGender};

/// Query string of the match endpoint
///
/// Fields are optional at the type level so a rejected request can echo
/// back what it received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    #[validate(required, length(min = 1))]
    #[serde(rename = "learningTopic")]
    pub learning_topic: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(rename = "preferredLanguage")]
    pub preferred_language: Option<String>,
    #[validate(required, length(min = 1))]
    #[serde(rename = "timeOfDay")]
    pub time_of_day: Option<String>,
}

impl MatchQuery {
    pub const REQUIRED: [&'static str; 3] = ["learningTopic", "preferredLanguage", "timeOfDay"];

    /// Validate and convert into preferences for the engine
    pub fn preferences(&self) -> Result<StudentPreferences, ValidationErrors> {
        self.validate()?;

        Ok(StudentPreferences {
            learning_topic: self.learning_topic.clone().unwrap_or_default(),
            preferred_language: self.preferred_language.clone().unwrap_or_default(),
            time_of_day: self.time_of_day.clone().unwrap_or_default(),
        })
    }
}

/// A list field that the signup form sends either as an array or as a
/// comma-separated string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    Items(Vec<String>),
    Csv(String),
}

impl ListInput {
    pub fn into_items(self) -> Vec<String> {
        let items: Vec<String> = match self {
            ListInput::Items(items) => items,
            ListInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };

        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for ListInput {
    fn default() -> Self {
        ListInput::Items(Vec::new())
    }
}

/// Register a tutor profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTutorRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(rename = "subjectDomains", default)]
    pub subject_domains: ListInput,
    #[serde(rename = "teachingLanguages", default)]
    pub teaching_languages: ListInput,
    #[serde(rename = "availableSlots", default)]
    pub available_slots: ListInput,
    #[validate(range(min = 0.0))]
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: f64,
}

/// Rate a tutor after a session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateTutorRequest {
    #[serde(rename = "tutorId")]
    pub tutor_id: Uuid,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
}

/// Link a student to a tutor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTutorRequest {
    #[serde(rename = "studentId")]
    pub student_id: Uuid,
    #[serde(rename = "tutorId")]
    pub tutor_id: Uuid,
}

/// Mark one session of a tutor as completed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleteRequest {
    #[serde(rename = "tutorId")]
    pub tutor_id: Uuid,
}

/// Preferences collected by the onboarding chat flow
///
/// Every preference is named; unknown keys are rejected rather than merged
/// into the stored profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OnboardStudentRequest {
    #[validate(email)]
    pub email: String,
    #[serde(rename = "fullName", alias = "name")]
    pub full_name: Option<String>,
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
    #[validate(range(min = 1, max = 7))]
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
}
