use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

use super::jwt::verify_token;
use crate::{config::Config, error::ApiError};

/// The authenticated admin behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header encoding".to_string()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::Unauthorized("Authorization header must start with Bearer".to_string())
        })
}

pub fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ApiError::internal("App config missing"))?;

    let token = bearer_token(req)?;
    let claims = verify_token(token, &config.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(AuthUser {
        username: claims.sub,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Reuses the user stored by the auth middleware, verifying the token itself otherwise.
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }
        ready(authenticate(req))
    }
}
