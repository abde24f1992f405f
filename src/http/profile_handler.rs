use crate::api_error::ApiError;
use crate::auth::{IdentityExt, IdentityMiddleware};
use crate::http::{ApiResponse, AppState};
use crate::models::UpsertProfileRequest;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

/// GET /api/profile
pub async fn get_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    let profile = state.profiles.get_profile(identity.user_uuid).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "profile": profile }))))
}

/// PUT /api/profile
pub async fn upsert_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpsertProfileRequest>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    let profile = state
        .profiles
        .upsert_profile(identity.user_uuid, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({ "profile": profile }))))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/profile")
            .wrap(IdentityMiddleware)
            .route(web::get().to(get_profile))
            .route(web::put().to(upsert_profile)),
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
    async fn test_profile_upsert_and_username_conflict() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(Arc::new(MemoryStore::new()), vec![]))
                .configure(crate::http::configure_routes),
        )
        .await;
        let first = Uuid::new_v4().to_string();
        let second = Uuid::new_v4().to_string();

        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header((USER_UUID_HEADER, first.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header((USER_UUID_HEADER, first.as_str()))
            .set_json(json!({ "username": " ana ", "displayName": "Ana" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["profile"]["username"], "ana");
        assert_eq!(body["profile"]["display_name"], "Ana");

        // Re-saving your own username is an update, not a conflict.
        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header((USER_UUID_HEADER, first.as_str()))
            .set_json(json!({ "username": "ana", "bio": "mid laner" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header((USER_UUID_HEADER, second.as_str()))
            .set_json(json!({ "username": "ana" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Username is already taken");
    }
}
