use crate::api_error::ApiError;
use crate::auth::{IdentityExt, IdentityMiddleware};
use crate::http::{ApiResponse, AppState};
use crate::models::TransactionListQuery;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// GET /api/wallet?limit=
pub async fn get_wallet(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<TransactionListQuery>,
) -> Result<impl Responder, ApiError> {
    let identity = req.identity()?;
    let overview = state.wallets.overview(identity.user_uuid, &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(overview)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/wallet")
            .wrap(IdentityMiddleware)
            .route(web::get().to(get_wallet)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::USER_UUID_HEADER;
    use crate::http::test_support::app_state;
    use crate::store::MemoryStore;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;
    use uuid::Uuid;

    #[actix_web::test]
    async fn test_wallet_defaults_to_zero_balance() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(Arc::new(MemoryStore::new()), vec![]))
                .configure(crate::http::configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/wallet")
            .insert_header((USER_UUID_HEADER, Uuid::new_v4().to_string()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["balance"], "0");
        assert!(body["transactions"].as_array().unwrap().is_empty());
    }
}
