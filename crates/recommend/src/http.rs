//! HTTP surface of the recommendation service
//!
//! A thin layer over [`RecommendationService`]: it derives the member's
//! read/want lists from storage, invokes the engine, and shapes the JSON
//! response. The engine itself never fails a request; the only hard HTTP
//! failure is storage being unreachable when fetching the member's
//! relations, since no fallback is possible without catalog access.

use crate::recommendation::RecommendationService;
use crate::store::BookStore;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use validator::Validate;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub service: Arc<RecommendationService>,
}

/// Recommendation request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    pub user_id: i64,

    /// Overrides the configured default count when present
    #[validate(range(min = 1, max = 100))]
    pub num_recommendations: Option<usize>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recommend_books", web::post().to(recommend_books))
        .route("/health", web::get().to(health_check));
}

async fn recommend_books(
    state: web::Data<AppState>,
    body: web::Json<RecommendRequest>,
) -> HttpResponse {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "detail": e.to_string()
        }));
    }

    let relations = match state.store.member_relations(body.user_id).await {
        Ok(relations) => relations,
        Err(e) => {
            error!(member_id = body.user_id, error = %e, "failed to load member relations");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "detail": "storage unavailable"
            }));
        }
    };

    let mut read_list = Vec::new();
    let mut want_list = Vec::new();
    for record in relations {
        if record.status.is_read() {
            read_list.push(record.book_id);
        } else {
            want_list.push(record.book_id);
        }
    }

    let recommendations = state
        .service
        .recommend(
            body.user_id,
            &read_list,
            &want_list,
            body.num_recommendations,
        )
        .await;

    HttpResponse::Ok().json(serde_json::json!({
        "recommendations": recommendations,
        "generated_at": Utc::now(),
    }))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "recommend-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
