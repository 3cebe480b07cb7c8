use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{OnboardResponse, OnboardStudentRequest};
use crate::routes::{error_response, store_error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/students").route("/onboard", web::post().to(onboard)));
}

/// Store the preferences gathered during onboarding
///
/// POST /api/students/onboard
///
/// Profiles are keyed by email; a second submission fills in or replaces
/// only the fields it carries.
async fn onboard(
    state: web::Data<AppState>,
    req: web::Json<OnboardStudentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    match state.postgres.upsert_student_profile(&req).await {
        Ok(student) => {
            let ready_to_match = student.preferences().is_some();
            tracing::info!("Onboarded student {} (ready to match: {})", student.id, ready_to_match);
            HttpResponse::Ok().json(OnboardResponse {
                message: "Preferences saved".to_string(),
                student,
                ready_to_match,
            })
        }
        Err(e) => store_error_response("Failed to save preferences", e),
    }
}
