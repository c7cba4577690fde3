use actix_web::{
    HttpResponse,
    http::header::{Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue},
    web,
};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::IntoParams;

use crate::{
    auth::auth::AuthUser,
    error::{ApiError, ApiResult},
    model::payslip::{Payslip, PayslipRequest},
    models::MessageResponse,
    payroll::{calculator::issue_payslip, render::PayslipPrinter},
    store::{Store, StoreError},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayslipQuery {
    /// Only payslips of this employee.
    pub employee_id: Option<String>,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Payslip not found".to_string())
}

/// Generate payslip
///
/// Computes the payslip from the employee's current salary structure and
/// stores it. At most one payslip exists per employee and month.
#[utoipa::path(
    post,
    path = "/api/payslips/generate",
    request_body = PayslipRequest,
    responses(
        (status = 200, description = "Payslip generated", body = Payslip),
        (status = 400, description = "Month outside 1-12"),
        (status = 404, description = "Employee not found or deactivated"),
        (status = 409, description = "Payslip already exists for this month")
    ),
    tag = "Payslip",
    security(("bearer_auth" = []))
)]
pub async fn generate_payslip(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    payload: web::Json<PayslipRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if !(1..=12).contains(&request.month) {
        return Err(ApiError::Validation(format!(
            "month must be between 1 and 12, got {}",
            request.month
        )));
    }

    let employee = store
        .find_employee(&request.employee_id, true)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let payslip = issue_payslip(&employee, &request);
    match store.insert_payslip(&payslip).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(ApiError::Conflict(
                "Payslip already exists for this month".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    info!(
        admin = %admin.username,
        payslip_id = %payslip.id,
        employee_id = %payslip.employee_id,
        month = payslip.month,
        year = payslip.year,
        net_payable = payslip.net_payable,
        "Payslip generated"
    );
    Ok(HttpResponse::Ok().json(payslip))
}

/// List payslips, newest first
#[utoipa::path(
    get,
    path = "/api/payslips",
    params(PayslipQuery),
    responses((status = 200, description = "Payslips", body = [Payslip])),
    tag = "Payslip",
    security(("bearer_auth" = []))
)]
pub async fn list_payslips(
    store: web::Data<dyn Store>,
    query: web::Query<PayslipQuery>,
) -> ApiResult<HttpResponse> {
    let payslips = store.list_payslips(query.employee_id.as_deref()).await?;
    debug!(count = payslips.len(), "Listed payslips");

    Ok(HttpResponse::Ok().json(payslips))
}

/// Get payslip by id
#[utoipa::path(
    get,
    path = "/api/payslips/{id}",
    params(("id" = String, Path, description = "Payslip id")),
    responses(
        (status = 200, description = "Payslip found", body = Payslip),
        (status = 404, description = "Payslip not found")
    ),
    tag = "Payslip",
    security(("bearer_auth" = []))
)]
pub async fn get_payslip(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let payslip = store.find_payslip(&path).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(payslip))
}

/// Delete payslip
#[utoipa::path(
    delete,
    path = "/api/payslips/{id}",
    params(("id" = String, Path, description = "Payslip id")),
    responses(
        (status = 200, description = "Payslip deleted", body = MessageResponse),
        (status = 404, description = "Payslip not found")
    ),
    tag = "Payslip",
    security(("bearer_auth" = []))
)]
pub async fn delete_payslip(
    admin: AuthUser,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if !store.delete_payslip(&path).await? {
        return Err(not_found());
    }

    info!(admin = %admin.username, payslip_id = %path, "Payslip deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Payslip deleted successfully")))
}

/// Download payslip as PDF
#[utoipa::path(
    get,
    path = "/api/payslips/download/{id}",
    params(("id" = String, Path, description = "Payslip id")),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Payslip or employee not found")
    ),
    tag = "Payslip",
    security(("bearer_auth" = []))
)]
pub async fn download_payslip(
    store: web::Data<dyn Store>,
    printer: web::Data<PayslipPrinter>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let payslip = store.find_payslip(&path).await?.ok_or_else(not_found)?;
    // deactivated employees keep their payslips downloadable
    let employee = store
        .find_employee(&payslip.employee_id, false)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    let rendered = printer.print(&payslip, &employee)?;
    debug!(
        payslip_id = %payslip.id,
        bytes = rendered.bytes.len(),
        "Payslip rendered"
    );

    Ok(HttpResponse::Ok()
        .content_type(rendered.content_type)
        .insert_header(attachment(rendered.file_name))
        .body(rendered.bytes))
}

/// Quoted `filename`, plus an RFC 5987 `filename*` when the name is not ASCII.
fn attachment(file_name: String) -> ContentDisposition {
    let mut parameters = Vec::with_capacity(2);
    if file_name.is_ascii() {
        parameters.push(DispositionParam::Filename(file_name));
    } else {
        let fallback = file_name
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        parameters.push(DispositionParam::Filename(fallback));
        parameters.push(DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_owned()),
            language_tag: None,
            value: file_name.into_bytes(),
        }));
    }
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters,
    }
}
