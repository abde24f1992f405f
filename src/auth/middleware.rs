use crate::api_error::ApiError;
use crate::auth::identity::Identity;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use tracing::{debug, warn};

/// Rejects requests that carry no valid caller identity headers.
pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match Identity::from_headers(req.headers()) {
                Ok(identity) => {
                    debug!(user_id = %identity.user_uuid, "Request authenticated");
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(e) => {
                    warn!(path = %req.path(), error = %e, "Rejected unauthenticated request");
                    Err(e.into())
                }
            }
        })
    }
}

/// Access to the identity stored by [`IdentityMiddleware`].
pub trait IdentityExt {
    fn identity(&self) -> Result<Identity, ApiError>;
}

impl IdentityExt for actix_web::HttpRequest {
    fn identity(&self) -> Result<Identity, ApiError> {
        self.extensions()
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated("Authentication required"))
    }
}
