//! Turns a panicking handler into a 500 instead of a dropped connection.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::{FutureExt, LocalBoxFuture};
use std::any::Any;
use std::future::{ready, Ready};
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use auth_shared::{error_codes, ErrorResponse};

use super::request_id::RequestId;

pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoveryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryService {
            service: Rc::new(service),
        }))
    }
}

pub struct RecoveryService<S> {
    service: Rc<S>,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl<S, B> Service<ServiceRequest> for RecoveryService<S>
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
        // The router needs sole ownership of the request, so only owned
        // copies of what the panic branch reports are kept here
        let path = req.path().to_string();
        let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(payload) => {
                    tracing::error!(
                        path = %path,
                        request_id = ?request_id,
                        panic = panic_message(payload.as_ref()),
                        "panic recovered"
                    );
                    let body = ErrorResponse::new(
                        error_codes::INTERNAL_ERROR,
                        "An internal error occurred",
                    )
                    .with_request_id(request_id);
                    let response = HttpResponse::InternalServerError().json(body);
                    Err(InternalError::from_response("handler panicked", response).into())
                }
            }
        })
    }
}
