use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    auth::auth::AuthUser,
    error::{ApiError, ApiResult, require_non_blank},
    model::employee::{Employee, EmployeeUpdate, NewEmployee},
    models::MessageResponse,
    store::Store,
};

fn not_found() -> ApiError {
    ApiError::NotFound("Employee not found".to_string())
}

fn duplicate_number() -> ApiError {
    ApiError::Conflict("Employee number already exists".to_string())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 400, description = "Blank required field"),
        (status = 409, description = "Employee number already used by an active employee")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<NewEmployee>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    require_non_blank("employee_no", &payload.employee_no)?;
    require_non_blank("name", &payload.name)?;
    require_non_blank("designation", &payload.designation)?;

    if store.find_active_by_number(&payload.employee_no).await?.is_some() {
        return Err(duplicate_number());
    }

    let employee = Employee::new(payload);
    store.insert_employee(&employee).await?;

    info!(
        admin = %admin.username,
        employee_id = %employee.id,
        employee_no = %employee.employee_no,
        "Employee created"
    );
    Ok(HttpResponse::Ok().json(employee))
}

/// List active employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Active employees", body = [Employee])
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let employees = store.list_active_employees().await?;
    debug!(count = employees.len(), "Listed employees");

    Ok(HttpResponse::Ok().json(employees))
}

/// Get employee by id
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found or deactivated")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let employee = store
        .find_employee(&path, true)
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Update employee
///
/// Only the provided fields change.
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    request_body = EmployeeUpdate,
    responses(
        (status = 200, description = "Updated employee", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee number already used by another active employee")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<EmployeeUpdate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let update = payload.into_inner();

    for (field, value) in [
        ("employee_no", &update.employee_no),
        ("name", &update.name),
        ("designation", &update.designation),
    ] {
        if let Some(value) = value {
            require_non_blank(field, value)?;
        }
    }

    let mut employee = store.find_employee(&id, true).await?.ok_or_else(not_found)?;

    if let Some(employee_no) = &update.employee_no {
        if let Some(holder) = store.find_active_by_number(employee_no).await? {
            if holder.id != employee.id {
                return Err(duplicate_number());
            }
        }
    }

    if employee.apply(update) {
        store.update_employee(&employee).await?;
        info!(admin = %admin.username, employee_id = %employee.id, "Employee updated");
    }

    Ok(HttpResponse::Ok().json(employee))
}

/// Deactivate employee
///
/// Soft delete: the record and its payslips stay retrievable.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee deactivated", body = MessageResponse),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let mut employee = store
        .find_employee(&path, true)
        .await?
        .ok_or_else(not_found)?;

    employee.is_active = false;
    employee.updated_at = Utc::now();
    store.update_employee(&employee).await?;

    info!(admin = %admin.username, employee_id = %employee.id, "Employee deactivated");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee terminated successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use super::*;
    use crate::api::test_support::{authed, memory_store, peer, seeded_employee, test_app};
    use crate::model::employee::fixtures;

    #[actix_web::test]
    async fn requests_without_token_are_rejected() {
        let app = test_app!(memory_store());

        let req = test::TestRequest::get()
            .uri("/api/employees")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_token_is_rejected() {
        let app = test_app!(memory_store());

        let req = test::TestRequest::get()
            .uri("/api/employees")
            .peer_addr(peer())
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_then_fetch() {
        let app = test_app!(memory_store());

        let req = authed(test::TestRequest::post())
            .uri("/api/employees")
            .set_json(fixtures::new_employee("EMP-001"))
            .to_request();
        let created: Employee = test::call_and_read_body_json(&app, req).await;

        assert!(created.is_active);
        assert_eq!(created.employee_no, "EMP-001");

        let req = authed(test::TestRequest::get())
            .uri(&format!("/api/employees/{}", created.id))
            .to_request();
        let fetched: Employee = test::call_and_read_body_json(&app, req).await;

        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn duplicate_active_number_conflicts() {
        let store = memory_store();
        seeded_employee(&store, "EMP-001").await;
        let app = test_app!(store.clone());

        let req = authed(test::TestRequest::post())
            .uri("/api/employees")
            .set_json(fixtures::new_employee("EMP-001"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(store.list_active_employees().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn blank_name_is_a_validation_error() {
        let app = test_app!(memory_store());
        let mut payload = fixtures::new_employee("EMP-001");
        payload.name = "   ".to_string();

        let req = authed(test::TestRequest::post())
            .uri("/api/employees")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn partial_update_keeps_other_fields() {
        let store = memory_store();
        let employee = seeded_employee(&store, "EMP-001").await;
        let app = test_app!(store.clone());

        let req = authed(test::TestRequest::put())
            .uri(&format!("/api/employees/{}", employee.id))
            .set_json(json!({ "work_location": "Mysuru" }))
            .to_request();
        let updated: Employee = test::call_and_read_body_json(&app, req).await;

        assert_eq!(updated.work_location, "Mysuru");
        assert_eq!(updated.name, employee.name);
        assert_eq!(updated.salary_components, employee.salary_components);
    }

    #[actix_web::test]
    async fn update_to_another_employees_number_conflicts() {
        let store = memory_store();
        seeded_employee(&store, "EMP-001").await;
        let second = seeded_employee(&store, "EMP-002").await;
        let app = test_app!(store.clone());

        let req = authed(test::TestRequest::put())
            .uri(&format!("/api/employees/{}", second.id))
            .set_json(json!({ "employee_no": "EMP-001" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn update_unknown_employee_is_not_found() {
        let app = test_app!(memory_store());

        let req = authed(test::TestRequest::put())
            .uri("/api/employees/missing")
            .set_json(json!({ "name": "Nobody" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn soft_delete_hides_employee_and_frees_number() {
        let store = memory_store();
        let employee = seeded_employee(&store, "EMP-001").await;
        let app = test_app!(store.clone());

        let req = authed(test::TestRequest::delete())
            .uri(&format!("/api/employees/{}", employee.id))
            .to_request();
        let body: MessageResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!body.message.is_empty());

        let req = authed(test::TestRequest::get())
            .uri(&format!("/api/employees/{}", employee.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = authed(test::TestRequest::get()).uri("/api/employees").to_request();
        let listed: Vec<Employee> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());

        let req = authed(test::TestRequest::post())
            .uri("/api/employees")
            .set_json(fixtures::new_employee("EMP-001"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = authed(test::TestRequest::delete())
            .uri(&format!("/api/employees/{}", employee.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
