use crate::auth::{USER_NAME_HEADER, USER_UUID_HEADER};
use actix_cors::Cors;
use actix_web::http::header;

/// CORS policy for the API. The identity headers must be allowed explicitly
/// for browser clients to send them.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header(USER_UUID_HEADER)
        .allowed_header(USER_NAME_HEADER)
        .max_age(3600)
}
