use crate::api_error::ApiError;
use crate::auth::{IdentityExt, IdentityMiddleware};
use crate::http::{ApiResponse, AppState};
use crate::models::{TournamentActionRequest, TournamentListQuery};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

/// GET /api/tournaments?status=
pub async fn list_tournaments(
    state: web::Data<AppState>,
    query: web::Query<TournamentListQuery>,
) -> Result<impl Responder, ApiError> {
    let tournaments = state.tournaments.list_tournaments(query.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "tournaments": tournaments }))))
}

/// GET /api/tournaments/:id
pub async fn get_tournament(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, ApiError> {
    let tournament = state.tournaments.get_tournament(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "tournament": tournament }))))
}

/// GET /api/tournaments/:id/players
pub async fn list_players(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<impl Responder, ApiError> {
    let players = state.tournaments.list_players(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "players": players }))))
}

/// POST /api/tournaments/join
pub async fn join_tournament(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<TournamentActionRequest>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    info!(
        tournament_id = body.tournament_id,
        user_id = %identity.user_uuid,
        "Received join request"
    );

    let receipt = state
        .tournaments
        .join(body.tournament_id, &identity)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(receipt)))
}

/// POST /api/tournaments/unregister
pub async fn unregister_tournament(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<TournamentActionRequest>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    info!(
        tournament_id = body.tournament_id,
        user_id = %identity.user_uuid,
        "Received unregister request"
    );

    let receipt = state
        .tournaments
        .unregister(body.tournament_id, &identity)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(receipt)))
}

/// Configure tournament routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tournaments")
            .route("", web::get().to(list_tournaments))
            .service(
                web::resource("/join")
                    .wrap(IdentityMiddleware)
                    .route(web::post().to(join_tournament)),
            )
            .service(
                web::resource("/unregister")
                    .wrap(IdentityMiddleware)
                    .route(web::post().to(unregister_tournament)),
            )
            .route("/{id}", web::get().to(get_tournament))
            .route("/{id}/players", web::get().to(list_players)),
    );
}
