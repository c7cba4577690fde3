//! Record persistence behind one injectable handle.
//!
//! Handlers receive `web::Data<dyn Store>`; `main` picks the MySQL backend
//! when a database URL is configured and the in-process one otherwise.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    admin::Admin,
    employee::Employee,
    payslip::Payslip,
    promotion::Promotion,
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),
    /// The record a write depends on no longer exists.
    #[error("missing record: {0}")]
    Missing(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("stored value could not be decoded: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_admin(&self, username: &str) -> StoreResult<Option<Admin>>;

    /// Inserts the admin unless the username already exists. Returns whether a row was written.
    async fn insert_admin_if_missing(&self, admin: &Admin) -> StoreResult<bool>;

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()>;

    /// `active_only = false` also returns soft-deleted employees.
    async fn find_employee(&self, id: &str, active_only: bool) -> StoreResult<Option<Employee>>;

    async fn find_active_by_number(&self, employee_no: &str) -> StoreResult<Option<Employee>>;

    async fn list_active_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Overwrites every mutable column of an existing employee.
    async fn update_employee(&self, employee: &Employee) -> StoreResult<()>;

    /// Records the history entry and replaces the employee's designation and
    /// salary structure as one atomic write. Other employee fields are left as
    /// stored. Fails with `Missing` when the employee is no longer active.
    async fn apply_promotion(&self, promotion: &Promotion, employee: &Employee) -> StoreResult<()>;

    /// Newest `promotion_date` first, optionally for one employee.
    async fn list_promotions(&self, employee_id: Option<&str>) -> StoreResult<Vec<Promotion>>;

    /// Fails with [`StoreError::Duplicate`] when the employee already has a
    /// payslip for the same month and year.
    async fn insert_payslip(&self, payslip: &Payslip) -> StoreResult<()>;

    async fn find_payslip(&self, id: &str) -> StoreResult<Option<Payslip>>;

    /// Newest `generated_at` first, optionally for one employee.
    async fn list_payslips(&self, employee_id: Option<&str>) -> StoreResult<Vec<Payslip>>;

    /// Returns `false` when nothing matched.
    async fn delete_payslip(&self, id: &str) -> StoreResult<bool>;

    async fn count_payslips(&self) -> StoreResult<u64>;
}
