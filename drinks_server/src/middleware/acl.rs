//! Access control list middleware for the drinks server.
//! This middleware can be placed on any route or service.
//!
//! It verifies the bearer token in the `Authorization` header and then checks the token's permissions against the
//! permissions required by the route. If the token is valid and grants every required permission, the verified
//! [`GrantedPermissions`] are stored in the request extensions and the request is allowed to continue. Otherwise the
//! request is rejected with the [`AuthError`] describing the failure.
//!
//! The token is verified on every call; no verification result outlives its request.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{GrantedPermissions, Permission, TokenVerifier},
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    required_permissions: Vec<Permission>,
}

impl AclMiddlewareFactory {
    pub fn new(required_permissions: &[Permission]) -> Self {
        AclMiddlewareFactory { required_permissions: required_permissions.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_permissions: self.required_permissions.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_permissions: Vec<Permission>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_permissions = self.required_permissions.clone();
        Box::pin(async move {
            let verifier = req.app_data::<web::Data<TokenVerifier>>().cloned().ok_or_else(|| {
                warn!("🔐️ No token verifier found in app data");
                ErrorInternalServerError("No token verifier found in app data")
            })?;
            let permissions = verifier.verify_headers(req.headers()).await.map_err(|e| {
                log_rejection(req.path(), &e);
                ServerError::from(e)
            })?;
            let missing = required_permissions.iter().find(|p| !permissions.contains(**p));
            if let Some(p) = missing {
                let e = AuthError::PermissionDenied(p.to_string());
                log_rejection(req.path(), &e);
                return Err(ServerError::from(e).into());
            }
            trace!("🔐️ Access granted to {} with permissions {permissions}", req.path());
            req.extensions_mut().insert::<GrantedPermissions>(permissions);
            service.call(req).await
        })
    }
}

fn log_rejection(path: &str, e: &AuthError) {
    match e {
        AuthError::MissingPermissionsClaim => error!(
            "🔐️ Rejected request to {path}. The access token has no permissions claim. This is an identity provider \
             configuration problem, not a forged token."
        ),
        AuthError::KeySetUnavailable(_) => error!("🔐️ Rejected request to {path}. {e}"),
        _ => warn!("🔐️ Rejected request to {path}. {e}"),
    }
}
