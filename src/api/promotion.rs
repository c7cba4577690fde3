use actix_web::{HttpResponse, web};
use tracing::info;

use crate::{
    auth::auth::AuthUser,
    error::{ApiError, ApiResult, require_non_blank},
    model::promotion::{NewPromotion, Promotion},
    payroll::calculator::promote,
    store::Store,
};

/// Promote employee
///
/// Records the change in the promotion history and replaces the employee's
/// designation and salary structure in one write.
#[utoipa::path(
    post,
    path = "/api/promotions",
    request_body = NewPromotion,
    responses(
        (status = 200, description = "Promotion recorded", body = Promotion),
        (status = 404, description = "Employee not found or deactivated")
    ),
    tag = "Promotion",
    security(("bearer_auth" = []))
)]
pub async fn create_promotion(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<NewPromotion>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    require_non_blank("new_designation", &payload.new_designation)?;

    let mut employee = store
        .find_employee(&payload.employee_id, true)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let promotion = promote(&mut employee, payload);
    store.apply_promotion(&promotion, &employee).await?;

    info!(
        admin = %admin.username,
        employee_id = %employee.id,
        old_salary = promotion.old_salary,
        new_salary = promotion.new_salary,
        "Promotion recorded"
    );
    Ok(HttpResponse::Ok().json(promotion))
}

/// List all promotions, newest first
#[utoipa::path(
    get,
    path = "/api/promotions",
    responses((status = 200, description = "Promotion history", body = [Promotion])),
    tag = "Promotion",
    security(("bearer_auth" = []))
)]
pub async fn list_promotions(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_promotions(None).await?))
}

/// Promotion history of one employee, newest first
#[utoipa::path(
    get,
    path = "/api/promotions/{employee_id}",
    params(("employee_id" = String, Path, description = "Employee id")),
    responses((status = 200, description = "Promotion history", body = [Promotion])),
    tag = "Promotion",
    security(("bearer_auth" = []))
)]
pub async fn employee_promotions(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list_promotions(Some(path.as_str())).await?))
}
