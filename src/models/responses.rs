use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{ScoredMatch, StudentProfile, TutorCandidate};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Rejection of a match request with missing criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingCriteriaResponse {
    pub error: String,
    pub message: String,
    pub required: Vec<String>,
    pub received: crate::models::MatchQuery,
}

/// Returned instead of a match list when no verified tutor exists at all
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoCandidatesResponse {
    pub message: String,
    pub tutors: Vec<ScoredMatch>,
    pub match_stats: MatchStats,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub total_candidates: usize,
    pub matched_count: usize,
}

/// Generic acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorResponse {
    pub message: String,
    pub tutor_id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTutorResponse {
    pub message: String,
    pub tutor: TutorCandidate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAllResponse {
    pub message: String,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub message: String,
    pub new_rating: f64,
    pub total_ratings: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardResponse {
    pub message: String,
    pub student: StudentProfile,
    /// Topic, language and time are all on file
    #[serde(rename = "readyToMatch")]
    pub ready_to_match: bool,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_tutors: usize,
    pub assigned_students: usize,
    pub unassigned_students: usize,
    pub assigned_tutors: usize,
    pub unassigned_tutors: usize,
    pub students: Vec<StudentSummary>,
    pub tutors: Vec<TutorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub assigned: bool,
    pub learning_topic: String,
    pub preferred_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub assigned: bool,
    pub assigned_count: usize,
    pub subject_domains: Vec<String>,
    pub teaching_languages: Vec<String>,
    pub is_verified: bool,
}

/// A tutor together with their roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorDashboard {
    pub tutor: TutorCandidate,
    pub assigned_students: Vec<AssignedStudent>,
    pub total_assigned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedStudent {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub learning_topic: String,
    pub preferred_language: String,
    pub grade: String,
    pub mode: String,
    pub time_of_day: String,
}
