use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::{
    auth::{jwt::generate_access_token, password::verify_password},
    config::Config,
    error::{ApiError, ApiResult},
    models::{LoginReqDto, LoginResponse},
    store::Store,
};

/// Admin login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
) -> ApiResult<HttpResponse> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::Validation(
            "Username or password required".to_string(),
        ));
    }

    debug!("Fetching admin from store");
    let Some(admin) = store.find_admin(&user.username).await? else {
        info!("Invalid credentials: admin not found");
        return Err(invalid_credentials());
    };

    debug!("Verifying password");
    if let Err(e) = verify_password(&user.password, &admin.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(invalid_credentials());
    }

    debug!("Generating access token");
    let token = generate_access_token(&admin.username, &config.jwt_secret, config.access_token_ttl)
        .map_err(ApiError::internal)?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        username: admin.username,
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use super::*;
    use crate::api::test_support::{memory_store, peer, test_app};
    use crate::auth::jwt::verify_token;

    fn login_request(username: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "username": username, "password": password }))
    }

    #[actix_web::test]
    async fn seeded_admin_can_log_in() {
        let app = test_app!(memory_store());

        let resp: LoginResponse =
            test::call_and_read_body_json(&app, login_request("admin", "admin123").to_request())
                .await;

        assert_eq!(resp.username, "admin");
        let claims = verify_token(&resp.token, &Config::for_tests().jwt_secret).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[actix_web::test]
    async fn wrong_password_or_unknown_user_is_unauthorized() {
        let app = test_app!(memory_store());

        for (username, password) in [("admin", "wrong"), ("nobody", "admin123")] {
            let resp =
                test::call_service(&app, login_request(username, password).to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn blank_credentials_are_rejected() {
        let app = test_app!(memory_store());

        let resp = test::call_service(&app, login_request("  ", "").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn issued_token_opens_protected_routes() {
        let app = test_app!(memory_store());
        let login: LoginResponse =
            test::call_and_read_body_json(&app, login_request("admin", "admin123").to_request())
                .await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/stats")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {}", login.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
