use crate::api_error::ApiError;
use crate::auth::{IdentityExt, IdentityMiddleware};
use crate::http::{ApiResponse, AppState};
use crate::models::TeamAction;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

/// POST /api/teams
/// Multi-action team endpoint; the body's `action` field selects the operation.
pub async fn team_action(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<TeamAction>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    let caller = identity.user_uuid;

    match body.into_inner() {
        TeamAction::Create(request) => {
            info!(user_id = %caller, name = %request.name, "Received create team request");
            let team = state.teams.create_team(request, &identity).await?;
            Ok(HttpResponse::Created().json(ApiResponse::ok(json!({ "team": team }))))
        }
        TeamAction::Update(request) => {
            info!(user_id = %caller, team_id = request.team_id, "Received update team request");
            let team = state.teams.update_team(request, &caller).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "team": team }))))
        }
        TeamAction::Get { team_id } => {
            let details = state.teams.get_team(team_id, &caller).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
        }
        TeamAction::Delete { team_id } => {
            info!(user_id = %caller, team_id, "Received delete team request");
            state.teams.delete_team(team_id, &caller).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "message": "Team deleted" }))))
        }
        TeamAction::List => {
            let teams = state.teams.list_my_teams(&caller).await?;
            Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "teams": teams }))))
        }
    }
}

/// Configure team routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/teams")
            .wrap(IdentityMiddleware)
            .route(web::post().to(team_action)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::USER_UUID_HEADER;
    use crate::http::test_support::app_state;
    use crate::store::MemoryStore;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    #[actix_web::test]
    async fn test_team_lifecycle_over_http() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(Arc::new(MemoryStore::new()), vec![]))
                .configure(crate::http::configure_routes),
        )
        .await;
        let captain = Uuid::new_v4().to_string();
        let stranger = Uuid::new_v4().to_string();

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, captain.as_str()))
            .set_json(json!({ "action": "create", "name": "Alpha", "tag": "ALP", "gameId": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        let team_id = body["team"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, stranger.as_str()))
            .set_json(json!({ "action": "update", "teamId": team_id, "name": "Taken Over" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, captain.as_str()))
            .set_json(json!({ "action": "get", "teamId": team_id }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["team"]["name"], "Alpha");
        assert_eq!(body["members"].as_array().unwrap().len(), 1);
        assert_eq!(body["members"][0]["role"], "captain");

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, captain.as_str()))
            .set_json(json!({ "action": "create", "name": "Alpha", "gameId": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "A team with this name already exists");
    }

    #[actix_web::test]
    async fn test_unknown_action_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(Arc::new(MemoryStore::new()), vec![]))
                .configure(crate::http::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, Uuid::new_v4().to_string()))
            .set_json(json!({ "action": "disband", "teamId": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("disband"));

        let req = test::TestRequest::post()
            .uri("/api/teams")
            .insert_header((USER_UUID_HEADER, Uuid::new_v4().to_string()))
            .set_json(json!({ "action": "create", "gameId": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("name"));
    }
}
