use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standing monthly salary structure of an employee.
///
/// Replaced wholesale when a promotion is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
#[schema(example = json!({
    "basic": 50000.0,
    "house_rent_allowance": 20000.0,
    "transport_allowance": 5000.0,
    "fixed_allowance": 10000.0,
    "home_collection_visit": 0.0,
    "professional_tax": 200.0
}))]
pub struct SalaryComponents {
    pub basic: f64,
    pub house_rent_allowance: f64,
    pub transport_allowance: f64,
    pub fixed_allowance: f64,
    pub home_collection_visit: f64,
    pub professional_tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
        "employee_no": "EMP-001",
        "name": "Asha Rao",
        "designation": "Lab Technician",
        "date_of_joining": "2024-01-01",
        "work_location": "Bengaluru",
        "department": "Diagnostics",
        "bank_account_no": "50100012345678",
        "salary_components": {
            "basic": 50000.0,
            "house_rent_allowance": 20000.0,
            "transport_allowance": 5000.0,
            "fixed_allowance": 10000.0,
            "home_collection_visit": 0.0,
            "professional_tax": 200.0
        },
        "is_active": true,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z"
    })
)]
pub struct Employee {
    pub id: String,
    #[schema(example = "EMP-001")]
    pub employee_no: String,
    pub name: String,
    pub designation: String,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date_of_joining: NaiveDate,
    pub work_location: String,
    pub department: String,
    pub bank_account_no: String,
    pub salary_components: SalaryComponents,
    pub is_active: bool,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "EMP-001")]
    pub employee_no: String,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "Lab Technician")]
    pub designation: String,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date_of_joining: NaiveDate,
    #[schema(example = "Bengaluru")]
    pub work_location: String,
    #[schema(example = "Diagnostics")]
    pub department: String,
    #[schema(example = "50100012345678")]
    pub bank_account_no: String,
    #[serde(default)]
    pub salary_components: SalaryComponents,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct EmployeeUpdate {
    pub employee_no: Option<String>,
    pub name: Option<String>,
    pub designation: Option<String>,
    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub date_of_joining: Option<NaiveDate>,
    pub work_location: Option<String>,
    pub department: Option<String>,
    pub bank_account_no: Option<String>,
    pub salary_components: Option<SalaryComponents>,
}

impl Employee {
    pub fn new(payload: NewEmployee) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            employee_no: payload.employee_no,
            name: payload.name,
            designation: payload.designation,
            date_of_joining: payload.date_of_joining,
            work_location: payload.work_location,
            department: payload.department,
            bank_account_no: payload.bank_account_no,
            salary_components: payload.salary_components,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the provided fields. Returns `false` when the update carried nothing.
    pub fn apply(&mut self, update: EmployeeUpdate) -> bool {
        let mut changed = false;

        macro_rules! set {
            ($field:ident) => {
                if let Some(value) = update.$field {
                    self.$field = value;
                    changed = true;
                }
            };
        }

        set!(employee_no);
        set!(name);
        set!(designation);
        set!(date_of_joining);
        set!(work_location);
        set!(department);
        set!(bank_account_no);
        set!(salary_components);

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
