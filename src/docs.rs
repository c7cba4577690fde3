use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::model::{
    employee::{Employee, EmployeeUpdate, NewEmployee, SalaryComponents},
    payslip::{DashboardStats, LineItem, NamedDeduction, Payslip, PayslipRequest},
    promotion::{NewPromotion, Promotion},
};
use crate::models::{LoginReqDto, LoginResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Administration API",
        version = "1.0.0",
        description = r#"
## Payroll Administration

Manages employee records, promotion history and monthly payslips.

### Key Features
- **Employees**: create, update, list, view and deactivate (soft delete)
- **Promotions**: record designation and salary changes with history
- **Payslips**: generate once per employee and month, list, delete, and download as PDF
- **Dashboard**: active headcount, live monthly payroll, payslip count

### Security
Every endpoint except login requires a **JWT Bearer** token obtained from `/api/auth/login`.

### Response Format
JSON bodies; errors are `{"error": "<message>"}`.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::promotion::create_promotion,
        crate::api::promotion::list_promotions,
        crate::api::promotion::employee_promotions,

        crate::api::payslip::generate_payslip,
        crate::api::payslip::list_payslips,
        crate::api::payslip::get_payslip,
        crate::api::payslip::delete_payslip,
        crate::api::payslip::download_payslip,

        crate::api::dashboard::dashboard_stats
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            MessageResponse,
            SalaryComponents,
            Employee,
            NewEmployee,
            EmployeeUpdate,
            Promotion,
            NewPromotion,
            LineItem,
            NamedDeduction,
            PayslipRequest,
            Payslip,
            DashboardStats
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Admin login"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Promotion", description = "Promotion history APIs"),
        (name = "Payslip", description = "Payslip generation and download APIs"),
        (name = "Dashboard", description = "Summary statistics"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme the protected paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
