use serde::{Deserialize, Serialize};

/// Operator account allowed to use the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}
