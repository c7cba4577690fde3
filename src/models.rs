use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "admin")]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username.
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}

/// `{"message": ...}` body for operations with nothing else to return.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Employee deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
