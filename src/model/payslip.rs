use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single labelled amount on a payslip. Position in the list is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    #[schema(example = "Basic")]
    pub label: String,
    #[schema(example = 50000.0)]
    pub amount: f64,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// One-off deduction applied to a single payslip only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NamedDeduction {
    #[schema(example = "Salary Advance")]
    pub name: String,
    #[schema(example = 1500.0)]
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PayslipRequest {
    pub employee_id: String,
    #[schema(example = 1, minimum = 1, maximum = 12)]
    pub month: u32,
    #[schema(example = 2026)]
    pub year: u32,
    #[schema(example = 30)]
    pub paid_days: u32,
    #[schema(example = 0)]
    pub lop_days: u32,
    /// Overrides the standing home-collection-visit amount for this payslip.
    #[serde(default)]
    #[schema(example = 1200.0)]
    pub home_collection_visit: Option<f64>,
    #[serde(default)]
    pub other_deduction: Option<NamedDeduction>,
}

/// A generated payslip. Never modified after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payslip {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_no: String,
    pub designation: String,
    pub month: u32,
    pub year: u32,
    pub paid_days: u32,
    pub lop_days: u32,
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
    pub gross_earnings: f64,
    pub total_deductions: f64,
    pub net_payable: f64,
    #[schema(value_type = String, format = "date-time")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 12)]
    pub total_active_employees: u64,
    #[schema(example = 996000.0)]
    pub total_monthly_payroll: f64,
    #[schema(example = 48)]
    pub total_payslips_generated: u64,
}
