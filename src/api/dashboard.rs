use actix_web::{HttpResponse, web};

use crate::{
    error::ApiResult,
    model::payslip::DashboardStats,
    payroll::calculator::standing_net,
    store::Store,
};

/// Dashboard statistics
///
/// The payroll total is the live monthly net of every active employee's
/// standing salary structure, not a sum of generated payslips.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses((status = 200, description = "Current totals", body = DashboardStats)),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn dashboard_stats(store: web::Data<dyn Store>) -> ApiResult<HttpResponse> {
    let employees = store.list_active_employees().await?;
    let total_monthly_payroll: f64 = employees
        .iter()
        .map(|e| standing_net(&e.salary_components))
        .sum();

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_active_employees: employees.len() as u64,
        total_monthly_payroll,
        total_payslips_generated: store.count_payslips().await?,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::test;

    use super::*;
    use crate::api::test_support::{authed, memory_store, seeded_employee, test_app};
    use crate::model::{employee::Employee, payslip::PayslipRequest};
    use crate::payroll::calculator::issue_payslip;

    #[actix_web::test]
    async fn empty_store_reports_zeroes() {
        let app = test_app!(memory_store());

        let req = authed(test::TestRequest::get())
            .uri("/api/dashboard/stats")
            .to_request();
        let stats: DashboardStats = test::call_and_read_body_json(&app, req).await;

        assert_eq!(stats.total_active_employees, 0);
        assert_eq!(stats.total_monthly_payroll, 0.0);
        assert_eq!(stats.total_payslips_generated, 0);
    }

    #[actix_web::test]
    async fn totals_cover_active_employees_only() {
        let store = memory_store();
        let first = seeded_employee(&store, "EMP-001").await;
        let mut gone: Employee = seeded_employee(&store, "EMP-002").await;
        gone.is_active = false;
        store.update_employee(&gone).await.unwrap();

        let payslip = issue_payslip(
            &first,
            &PayslipRequest {
                employee_id: first.id.clone(),
                month: 1,
                year: 2026,
                paid_days: 31,
                lop_days: 0,
                home_collection_visit: None,
                other_deduction: None,
            },
        );
        store.insert_payslip(&payslip).await.unwrap();
        let app = test_app!(store.clone());

        let req = authed(test::TestRequest::get())
            .uri("/api/dashboard/stats")
            .to_request();
        let stats: DashboardStats = test::call_and_read_body_json(&app, req).await;

        assert_eq!(stats.total_active_employees, 1);
        // 85,000 standing total less 2,000 professional tax
        assert_eq!(stats.total_monthly_payroll, 83_000.0);
        assert_eq!(stats.total_payslips_generated, 1);
    }
}
