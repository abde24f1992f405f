use crate::api_error::ApiError;
use crate::auth::{IdentityExt, IdentityMiddleware};
use crate::http::{ApiResponse, AppState};
use crate::models::UpdateTournamentStatusRequest;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

/// PATCH /api/admin/tournaments/:id/status
pub async fn update_tournament_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateTournamentStatusRequest>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    let tournament_id = path.into_inner();

    info!(
        tournament_id,
        status = %body.status,
        user_id = %identity.user_uuid,
        "Received tournament status change"
    );

    let tournament = state
        .tournaments
        .update_status(tournament_id, body.status, &identity.user_uuid)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({
        "tournament": tournament,
        "valid_next_states": tournament.status.valid_next_states(),
    }))))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(IdentityMiddleware)
            .route(
                "/tournaments/{id}/status",
                web::patch().to(update_tournament_status),
            ),
    );
}
