use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::core::MatchResult;
use crate::models::{
    AssignTutorRequest, CreateTutorRequest, CreateTutorResponse, MatchQuery, MatchStats,
    MessageResponse, MissingCriteriaResponse, NoCandidatesResponse, RateTutorRequest,
    RatingResponse, SessionCompleteRequest, VerifyAllResponse, VerifyTutorResponse,
};
use crate::routes::{error_response, store_error_response, AppState};
use crate::services::{CacheKey, NewTutor};

/// Configure all tutor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tutors")
            .route("", web::post().to(create_tutor))
            .route("/match", web::get().to(match_tutors))
            .route("/all", web::get().to(list_tutors))
            .route("/verify-all", web::patch().to(verify_all))
            .route("/rate", web::post().to(rate_tutor))
            .route("/assign", web::post().to(assign_tutor))
            .route("/session-complete", web::post().to(session_complete))
            .route("/{id}/verify", web::patch().to(verify_tutor)),
    );
}

/// Match endpoint
///
/// GET /api/tutors/match?learningTopic=Math&preferredLanguage=English&timeOfDay=Evening
///
/// Answers with the ranked matches, best first. Results are cached per
/// normalized query until the tutor pool changes.
async fn match_tutors(state: web::Data<AppState>, query: web::Query<MatchQuery>) -> impl Responder {
    let query = query.into_inner();

    let preferences = match query.preferences() {
        Ok(preferences) => preferences,
        Err(errors) => {
            tracing::info!("Rejected match request: {}", errors);
            return HttpResponse::BadRequest().json(MissingCriteriaResponse {
                error: "Missing required matching criteria".to_string(),
                message: "learningTopic, preferredLanguage and timeOfDay must all be provided".to_string(),
                required: MatchQuery::REQUIRED.iter().map(|s| s.to_string()).collect(),
                received: query,
            });
        }
    };

    // Read before the pool; a change after this point leaves our entry unreachable
    let cached = match &state.cache {
        Some(cache) => match cache.generation().await {
            Ok(generation) => Some((cache, CacheKey::matches(generation, &preferences))),
            Err(e) => {
                tracing::warn!("Match cache unavailable, skipping: {}", e);
                None
            }
        },
        None => None,
    };

    if let Some((cache, key)) = &cached {
        if let Ok(result) = cache.get::<MatchResult>(key).await {
            tracing::debug!("Returning cached matches for {}", key);
            return match_response(result);
        }
    }

    let tutors = match state.postgres.fetch_verified_tutors().await {
        Ok(tutors) => tutors,
        Err(e) => return store_error_response("Failed to fetch tutors", e),
    };

    let result = state.matcher.find_matches(&tutors, &preferences);

    tracing::info!(
        "Matched {} of {} tutors for topic={:?} language={:?} time={:?}",
        result.matches.len(),
        result.total_candidates,
        preferences.learning_topic,
        preferences.preferred_language,
        preferences.time_of_day
    );

    if let Some((cache, key)) = &cached {
        if let Err(e) = cache.set(key, &result).await {
            tracing::warn!("Failed to cache matches: {}", e);
        }
    }

    match_response(result)
}

/// Ranked array, or the explicit "no candidates" object when the verified
/// pool itself was empty
pub(crate) fn match_response(result: MatchResult) -> HttpResponse {
    if result.no_candidates() {
        tracing::info!("No verified tutors available for matching");
        return HttpResponse::Ok().json(NoCandidatesResponse {
            message: "No verified tutors are available yet".to_string(),
            tutors: Vec::new(),
            match_stats: MatchStats {
                total_candidates: 0,
                matched_count: 0,
            },
        });
    }

    HttpResponse::Ok().json(result.matches)
}

/// GET /api/tutors/all
async fn list_tutors(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.list_tutors().await {
        Ok(tutors) => HttpResponse::Ok().json(tutors),
        Err(e) => store_error_response("Failed to list tutors", e),
    }
}

/// Register a tutor
///
/// POST /api/tutors
///
/// List fields accept either a JSON array or a comma-separated string. At
/// least one subject is required.
async fn create_tutor(
    state: web::Data<AppState>,
    req: web::Json<CreateTutorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let tutor = NewTutor {
        name: req.name.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        subject_domains: req.subject_domains.into_items(),
        teaching_languages: req.teaching_languages.into_items(),
        available_slots: req.available_slots.into_items(),
        years_of_experience: req.years_of_experience,
    };

    if tutor.subject_domains.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "subjectDomains must contain at least one subject",
        );
    }

    match state.postgres.create_tutor(&tutor).await {
        Ok(created) => {
            state.invalidate_matches().await;
            HttpResponse::Created().json(CreateTutorResponse {
                message: "Tutor registered, pending verification".to_string(),
                tutor_id: created.id,
                name: created.name,
                email: created.email,
            })
        }
        Err(e) => store_error_response("Tutor signup failed", e),
    }
}

/// PATCH /api/tutors/{id}/verify
async fn verify_tutor(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let tutor_id = path.into_inner();

    match state.postgres.verify_tutor(tutor_id).await {
        Ok(tutor) => {
            state.invalidate_matches().await;
            tracing::info!("Verified tutor {}", tutor_id);
            HttpResponse::Ok().json(VerifyTutorResponse {
                message: "Tutor verified".to_string(),
                tutor,
            })
        }
        Err(e) => store_error_response("Failed to verify tutor", e),
    }
}

/// PATCH /api/tutors/verify-all
async fn verify_all(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.verify_all_tutors().await {
        Ok(modified_count) => {
            state.invalidate_matches().await;
            HttpResponse::Ok().json(VerifyAllResponse {
                message: format!("Verified {} tutors", modified_count),
                modified_count,
            })
        }
        Err(e) => store_error_response("Failed to verify tutors", e),
    }
}

/// Submit a rating
///
/// POST /api/tutors/rate
///
/// Request body:
/// ```json
/// { "tutorId": "uuid", "rating": 4.5 }
/// ```
async fn rate_tutor(state: web::Data<AppState>, req: web::Json<RateTutorRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid rating", errors.to_string());
    }

    match state.postgres.submit_rating(req.tutor_id, req.rating).await {
        Ok(update) => {
            state.invalidate_matches().await;
            HttpResponse::Ok().json(RatingResponse {
                message: "Rating submitted".to_string(),
                new_rating: update.rating,
                total_ratings: update.total_ratings,
            })
        }
        Err(e) => store_error_response("Failed to submit rating", e),
    }
}

/// POST /api/tutors/assign
async fn assign_tutor(state: web::Data<AppState>, req: web::Json<AssignTutorRequest>) -> impl Responder {
    match state.postgres.assign_tutor(req.student_id, req.tutor_id).await {
        Ok(added) => {
            state.invalidate_matches().await;
            let message = if added {
                "Tutor assigned"
            } else {
                "Tutor was already assigned to this student"
            };
            tracing::info!("Assigned tutor {} to student {}", req.tutor_id, req.student_id);
            HttpResponse::Ok().json(MessageResponse {
                message: message.to_string(),
            })
        }
        Err(e) => store_error_response("Failed to assign tutor", e),
    }
}

/// POST /api/tutors/session-complete
async fn session_complete(
    state: web::Data<AppState>,
    req: web::Json<SessionCompleteRequest>,
) -> impl Responder {
    match state.postgres.complete_session(req.tutor_id).await {
        Ok(total) => {
            state.invalidate_matches().await;
            HttpResponse::Ok().json(MessageResponse {
                message: format!("Session recorded, {} completed in total", total),
            })
        }
        Err(e) => store_error_response("Failed to record session", e),
    }
}
