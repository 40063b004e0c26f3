//! Caller provenance recorded on refresh sessions.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, USER_AGENT},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::net::SocketAddr;
use std::rc::Rc;

/// Widths of the session table's provenance columns
const MAX_USER_AGENT_CHARS: usize = 512;
const MAX_IP_ADDRESS_CHARS: usize = 64;

fn clamp(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// User agent and client address of the current request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub user_agent: String,
    pub ip_address: String,
}

impl RequestMeta {
    fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header("x-real-ip"))
            .map(|ip| clamp(ip, MAX_IP_ADDRESS_CHARS))
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_default();

        Self {
            user_agent: clamp(
                header(USER_AGENT.as_str()).unwrap_or_default(),
                MAX_USER_AGENT_CHARS,
            ),
            ip_address,
        }
    }
}

/// Middleware factory storing [`RequestMeta`] in the request extensions
pub struct RequestMetaMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestMetaMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetaMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetaMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestMetaMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestMetaMiddlewareService<S>
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
        let meta = RequestMeta::from_parts(req.headers(), req.peer_addr());
        req.extensions_mut().insert(meta);

        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}

impl FromRequest for RequestMeta {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let meta = req
            .extensions()
            .get::<RequestMeta>()
            .cloned()
            .unwrap_or_else(|| RequestMeta::from_parts(req.headers(), req.peer_addr()));
        ready(Ok(meta))
    }
}
