use crate::api_error::ApiError;
use crate::http::AppState;
use actix_web::{web, HttpResponse, Result};

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let database = match &state.db_pool {
        Some(pool) => {
            crate::db::health_check(pool).await?;
            "ok"
        }
        None => "in-memory",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "database": database
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::app_state;
    use crate::store::MemoryStore;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_on_memory_store() {
        let app = test::init_service(
            App::new()
                .app_data(app_state(Arc::new(MemoryStore::new()), vec![]))
                .configure(crate::http::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "in-memory");
    }
}
