use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::employee::SalaryComponents;

/// One entry of an employee's promotion history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Promotion {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub old_designation: String,
    pub new_designation: String,
    /// Standing monthly total before the promotion, professional tax excluded.
    #[schema(example = 85000.0)]
    pub old_salary: f64,
    #[schema(example = 95000.0)]
    pub new_salary: f64,
    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub promotion_date: NaiveDate,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewPromotion {
    pub employee_id: String,
    #[schema(example = "Senior Lab Technician")]
    pub new_designation: String,
    pub new_salary_components: SalaryComponents,
    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub promotion_date: NaiveDate,
}
