use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{verify_token, JwtKeys};
use crate::errors::ApiError;

/// Identity established by the bearer token. Inserted into request extensions
/// by [`Authentication`] and read back by handlers through the extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| {
                    ApiError::Unauthorized("Authentication required".to_string()).into()
                }),
        )
    }
}

#[derive(Clone)]
pub struct Authentication {
    pub jwt_keys: JwtKeys,
}

// Middleware factory is `Transform` trait
// `S` - type of the next service
// `B` - type of response's body
impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware {
            service,
            jwt_keys: self.jwt_keys.clone(),
        }))
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
    jwt_keys: JwtKeys,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Absent credential and invalid credential are distinct failures:
        // no token at all is 401, a token that does not verify is 403.
        let auth_header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| value.starts_with("Bearer "))
            .map(|value| value["Bearer ".len()..].to_string());

        let token = match auth_header {
            Some(token) => token,
            None => {
                return Box::pin(async {
                    Err(ApiError::Unauthorized("Authentication required".to_string()).into())
                });
            }
        };

        let claims = match verify_token(&self.jwt_keys, &token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("invalid bearer token: {:?}", e);
                return Box::pin(async {
                    Err(ApiError::Forbidden("Invalid or expired token".to_string()).into())
                });
            }
        };

        let user_id = match Uuid::parse_str(&claims.sub) {
            Ok(user_id) => user_id,
            Err(_) => {
                warn!("bearer token subject is not a user id");
                return Box::pin(async {
                    Err(ApiError::Forbidden("Invalid or expired token".to_string()).into())
                });
            }
        };

        req.extensions_mut().insert(AuthenticatedUser {
            user_id,
            email: claims.email,
        });

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}
