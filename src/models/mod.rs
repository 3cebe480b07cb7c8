// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    LearningMode, MatchDetails, MatchFeatures, MatchingConfig, MatchingConfigError, MatchingWeights,
    ScoredMatch, SessionType, StudentPreferences, StudentProfile, TutorCandidate, TutorGender,
};
pub use requests::{
    AssignTutorRequest, CreateTutorRequest, ListInput, MatchQuery, OnboardStudentRequest,
    RateTutorRequest, SessionCompleteRequest,
};
pub use responses::{
    AssignedStudent, CreateTutorResponse, DashboardStats, ErrorResponse, HealthResponse,
    MatchStats, MessageResponse, MissingCriteriaResponse, NoCandidatesResponse, OnboardResponse,
    RatingResponse, StudentSummary, TutorDashboard, TutorSummary, VerifyAllResponse,
    VerifyTutorResponse,
};
