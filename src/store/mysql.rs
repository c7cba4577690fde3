use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool, types::Json};

use super::{Store, StoreError, StoreResult};
use crate::model::{
    admin::Admin,
    employee::{Employee, SalaryComponents},
    payslip::{LineItem, Payslip},
    promotion::Promotion,
};

/// MySQL error code for integrity-constraint violations (duplicate key).
const DUPLICATE_KEY: &str = "23000";

const EMPLOYEE_COLUMNS: &str = r#"
    id, employee_no, name, designation, date_of_joining, work_location, department,
    bank_account_no, basic, house_rent_allowance, transport_allowance, fixed_allowance,
    home_collection_visit, professional_tax, is_active, created_at, updated_at
"#;

const PROMOTION_COLUMNS: &str = r#"
    id, employee_id, employee_name, old_designation, new_designation,
    old_salary, new_salary, promotion_date, created_at
"#;

const PAYSLIP_COLUMNS: &str = r#"
    id, employee_id, employee_name, employee_no, designation, month, year,
    paid_days, lop_days, earnings, deductions, gross_earnings, total_deductions,
    net_payable, generated_at
"#;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AdminRow {
    username: String,
    password_hash: String,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[derive(FromRow)]
struct EmployeeRow {
    id: String,
    employee_no: String,
    name: String,
    designation: String,
    date_of_joining: NaiveDate,
    work_location: String,
    department: String,
    bank_account_no: String,
    basic: f64,
    house_rent_allowance: f64,
    transport_allowance: f64,
    fixed_allowance: f64,
    home_collection_visit: f64,
    professional_tax: f64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            employee_no: row.employee_no,
            name: row.name,
            designation: row.designation,
            date_of_joining: row.date_of_joining,
            work_location: row.work_location,
            department: row.department,
            bank_account_no: row.bank_account_no,
            salary_components: SalaryComponents {
                basic: row.basic,
                house_rent_allowance: row.house_rent_allowance,
                transport_allowance: row.transport_allowance,
                fixed_allowance: row.fixed_allowance,
                home_collection_visit: row.home_collection_visit,
                professional_tax: row.professional_tax,
            },
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct PromotionRow {
    id: String,
    employee_id: String,
    employee_name: String,
    old_designation: String,
    new_designation: String,
    old_salary: f64,
    new_salary: f64,
    promotion_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Promotion {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            old_designation: row.old_designation,
            new_designation: row.new_designation,
            old_salary: row.old_salary,
            new_salary: row.new_salary,
            promotion_date: row.promotion_date,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct PayslipRow {
    id: String,
    employee_id: String,
    employee_name: String,
    employee_no: String,
    designation: String,
    month: u32,
    year: u32,
    paid_days: u32,
    lop_days: u32,
    earnings: Json<Vec<LineItem>>,
    deductions: Json<Vec<LineItem>>,
    gross_earnings: f64,
    total_deductions: f64,
    net_payable: f64,
    generated_at: DateTime<Utc>,
}

impl From<PayslipRow> for Payslip {
    fn from(row: PayslipRow) -> Self {
        Payslip {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            employee_no: row.employee_no,
            designation: row.designation,
            month: row.month,
            year: row.year,
            paid_days: row.paid_days,
            lop_days: row.lop_days,
            earnings: row.earnings.0,
            deductions: row.deductions.0,
            gross_earnings: row.gross_earnings,
            total_deductions: row.total_deductions,
            net_payable: row.net_payable,
            generated_at: row.generated_at,
        }
    }
}

/// Maps a duplicate-key failure to [`StoreError::Duplicate`], anything else to `Database`.
fn insert_error(e: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(DUPLICATE_KEY) {
            return StoreError::Duplicate(what());
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_admin(&self, username: &str) -> StoreResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT username, password_hash FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Admin::from))
    }

    async fn insert_admin_if_missing(&self, admin: &Admin) -> StoreResult<bool> {
        let result = sqlx::query("INSERT IGNORE INTO admins (username, password_hash) VALUES (?, ?)")
            .bind(&admin.username)
            .bind(&admin.password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let salary = &employee.salary_components;

        sqlx::query(&format!(
            "INSERT INTO employees ({EMPLOYEE_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&employee.id)
        .bind(&employee.employee_no)
        .bind(&employee.name)
        .bind(&employee.designation)
        .bind(employee.date_of_joining)
        .bind(&employee.work_location)
        .bind(&employee.department)
        .bind(&employee.bank_account_no)
        .bind(salary.basic)
        .bind(salary.house_rent_allowance)
        .bind(salary.transport_allowance)
        .bind(salary.fixed_allowance)
        .bind(salary.home_collection_visit)
        .bind(salary.professional_tax)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, || format!("employee {}", employee.id)))?;

        Ok(())
    }

    async fn find_employee(&self, id: &str, active_only: bool) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ? AND (is_active OR NOT ?)"
        ))
        .bind(id)
        .bind(active_only)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn find_active_by_number(&self, employee_no: &str) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE employee_no = ? AND is_active LIMIT 1"
        ))
        .bind(employee_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn list_active_employees(&self) -> StoreResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_active ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<()> {
        let salary = &employee.salary_components;

        sqlx::query(
            r#"
            UPDATE employees SET
                employee_no = ?, name = ?, designation = ?, date_of_joining = ?,
                work_location = ?, department = ?, bank_account_no = ?,
                basic = ?, house_rent_allowance = ?, transport_allowance = ?,
                fixed_allowance = ?, home_collection_visit = ?, professional_tax = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.employee_no)
        .bind(&employee.name)
        .bind(&employee.designation)
        .bind(employee.date_of_joining)
        .bind(&employee.work_location)
        .bind(&employee.department)
        .bind(&employee.bank_account_no)
        .bind(salary.basic)
        .bind(salary.house_rent_allowance)
        .bind(salary.transport_allowance)
        .bind(salary.fixed_allowance)
        .bind(salary.home_collection_visit)
        .bind(salary.professional_tax)
        .bind(employee.is_active)
        .bind(employee.updated_at)
        .bind(&employee.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn apply_promotion(&self, promotion: &Promotion, employee: &Employee) -> StoreResult<()> {
        let salary = &employee.salary_components;
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO promotion_history ({PROMOTION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&promotion.id)
        .bind(&promotion.employee_id)
        .bind(&promotion.employee_name)
        .bind(&promotion.old_designation)
        .bind(&promotion.new_designation)
        .bind(promotion.old_salary)
        .bind(promotion.new_salary)
        .bind(promotion.promotion_date)
        .bind(promotion.created_at)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE employees SET
                designation = ?, basic = ?, house_rent_allowance = ?, transport_allowance = ?,
                fixed_allowance = ?, home_collection_visit = ?, professional_tax = ?,
                updated_at = ?
            WHERE id = ? AND is_active
            "#,
        )
        .bind(&employee.designation)
        .bind(salary.basic)
        .bind(salary.house_rent_allowance)
        .bind(salary.transport_allowance)
        .bind(salary.fixed_allowance)
        .bind(salary.home_collection_visit)
        .bind(salary.professional_tax)
        .bind(employee.updated_at)
        .bind(&employee.id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::Missing(format!("employee {}", employee.id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_promotions(&self, employee_id: Option<&str>) -> StoreResult<Vec<Promotion>> {
        let rows = sqlx::query_as::<_, PromotionRow>(&format!(
            "SELECT {PROMOTION_COLUMNS} FROM promotion_history \
             WHERE (? IS NULL OR employee_id = ?) \
             ORDER BY promotion_date DESC, created_at DESC"
        ))
        .bind(employee_id)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Promotion::from).collect())
    }

    async fn insert_payslip(&self, payslip: &Payslip) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO payslips ({PAYSLIP_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&payslip.id)
        .bind(&payslip.employee_id)
        .bind(&payslip.employee_name)
        .bind(&payslip.employee_no)
        .bind(&payslip.designation)
        .bind(payslip.month)
        .bind(payslip.year)
        .bind(payslip.paid_days)
        .bind(payslip.lop_days)
        .bind(Json(&payslip.earnings))
        .bind(Json(&payslip.deductions))
        .bind(payslip.gross_earnings)
        .bind(payslip.total_deductions)
        .bind(payslip.net_payable)
        .bind(payslip.generated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            insert_error(e, || {
                format!(
                    "payslip {}/{} for employee {}",
                    payslip.month, payslip.year, payslip.employee_id
                )
            })
        })?;

        Ok(())
    }

    async fn find_payslip(&self, id: &str) -> StoreResult<Option<Payslip>> {
        let row = sqlx::query_as::<_, PayslipRow>(&format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Payslip::from))
    }

    async fn list_payslips(&self, employee_id: Option<&str>) -> StoreResult<Vec<Payslip>> {
        let rows = sqlx::query_as::<_, PayslipRow>(&format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips \
             WHERE (? IS NULL OR employee_id = ?) \
             ORDER BY generated_at DESC"
        ))
        .bind(employee_id)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Payslip::from).collect())
    }

    async fn delete_payslip(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM payslips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_payslips(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payslips")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| StoreError::Decode(e.to_string()))
    }
}
