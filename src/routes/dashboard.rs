use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::routes::{store_error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .route("/stats", web::get().to(stats))
            .route("/tutor/{id}", web::get().to(tutor))
            .route("/tutor-by-email/{email}", web::get().to(tutor_by_email)),
    );
}

/// GET /api/dashboard/stats
async fn stats(state: web::Data<AppState>) -> impl Responder {
    match state.postgres.dashboard_stats().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => store_error_response("Failed to load dashboard", e),
    }
}

/// GET /api/dashboard/tutor/{id}
async fn tutor(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.postgres.tutor_dashboard(path.into_inner()).await {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(e) => store_error_response("Failed to load tutor dashboard", e),
    }
}

/// GET /api/dashboard/tutor-by-email/{email}
async fn tutor_by_email(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.postgres.tutor_dashboard_by_email(&path).await {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(e) => store_error_response("Failed to load tutor dashboard", e),
    }
}
