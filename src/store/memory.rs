use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Store, StoreError, StoreResult};
use crate::model::{admin::Admin, employee::Employee, payslip::Payslip, promotion::Promotion};

#[derive(Default)]
struct Tables {
    admins: HashMap<String, Admin>,
    employees: HashMap<String, Employee>,
    promotions: Vec<Promotion>,
    payslips: Vec<Payslip>,
}

/// In-process store. Every operation holds one lock, so check-then-write
/// sequences cannot interleave.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_admin(&self, username: &str) -> StoreResult<Option<Admin>> {
        Ok(self.tables.lock().admins.get(username).cloned())
    }

    async fn insert_admin_if_missing(&self, admin: &Admin) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        if tables.admins.contains_key(&admin.username) {
            return Ok(false);
        }
        tables.admins.insert(admin.username.clone(), admin.clone());
        Ok(true)
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if tables.employees.contains_key(&employee.id) {
            return Err(StoreError::Duplicate(format!("employee {}", employee.id)));
        }
        tables.employees.insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn find_employee(&self, id: &str, active_only: bool) -> StoreResult<Option<Employee>> {
        Ok(self
            .tables
            .lock()
            .employees
            .get(id)
            .filter(|e| e.is_active || !active_only)
            .cloned())
    }

    async fn find_active_by_number(&self, employee_no: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .tables
            .lock()
            .employees
            .values()
            .find(|e| e.is_active && e.employee_no == employee_no)
            .cloned())
    }

    async fn list_active_employees(&self) -> StoreResult<Vec<Employee>> {
        let mut employees: Vec<Employee> = self
            .tables
            .lock()
            .employees
            .values()
            .filter(|e| e.is_active)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(employees)
    }

    async fn update_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        if let Some(stored) = tables.employees.get_mut(&employee.id) {
            *stored = employee.clone();
        }
        Ok(())
    }

    async fn apply_promotion(&self, promotion: &Promotion, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let Some(stored) = tables
            .employees
            .get_mut(&employee.id)
            .filter(|e| e.is_active)
        else {
            return Err(StoreError::Missing(format!("employee {}", employee.id)));
        };
        stored.designation = employee.designation.clone();
        stored.salary_components = employee.salary_components.clone();
        stored.updated_at = employee.updated_at;
        tables.promotions.push(promotion.clone());
        Ok(())
    }

    async fn list_promotions(&self, employee_id: Option<&str>) -> StoreResult<Vec<Promotion>> {
        let mut promotions: Vec<Promotion> = self
            .tables
            .lock()
            .promotions
            .iter()
            .filter(|p| employee_id.is_none_or(|id| p.employee_id == id))
            .cloned()
            .collect();
        promotions.sort_by(|a, b| {
            b.promotion_date
                .cmp(&a.promotion_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(promotions)
    }

    async fn insert_payslip(&self, payslip: &Payslip) -> StoreResult<()> {
        let mut tables = self.tables.lock();
        let taken = tables.payslips.iter().any(|p| {
            p.employee_id == payslip.employee_id
                && p.month == payslip.month
                && p.year == payslip.year
        });
        if taken {
            return Err(StoreError::Duplicate(format!(
                "payslip {}/{} for employee {}",
                payslip.month, payslip.year, payslip.employee_id
            )));
        }
        tables.payslips.push(payslip.clone());
        Ok(())
    }

    async fn find_payslip(&self, id: &str) -> StoreResult<Option<Payslip>> {
        Ok(self
            .tables
            .lock()
            .payslips
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_payslips(&self, employee_id: Option<&str>) -> StoreResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .tables
            .lock()
            .payslips
            .iter()
            .filter(|p| employee_id.is_none_or(|id| p.employee_id == id))
            .cloned()
            .collect();
        payslips.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(payslips)
    }

    async fn delete_payslip(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.lock();
        let before = tables.payslips.len();
        tables.payslips.retain(|p| p.id != id);
        Ok(tables.payslips.len() < before)
    }

    async fn count_payslips(&self) -> StoreResult<u64> {
        Ok(self.tables.lock().payslips.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{employee::fixtures, payslip::PayslipRequest};
    use crate::model::promotion::NewPromotion;
    use crate::payroll::calculator::{issue_payslip, promote};

    fn request(employee_id: &str, month: u32) -> PayslipRequest {
        PayslipRequest {
            employee_id: employee_id.to_string(),
            month,
            year: 2026,
            paid_days: 30,
            lop_days: 0,
            home_collection_visit: None,
            other_deduction: None,
        }
    }

    #[actix_web::test]
    async fn second_payslip_for_same_month_is_rejected() {
        let store = MemoryStore::new();
        let employee = Employee::new(fixtures::new_employee("EMP-001"));
        store.insert_employee(&employee).await.unwrap();

        let first = issue_payslip(&employee, &request(&employee.id, 3));
        store.insert_payslip(&first).await.unwrap();

        let second = issue_payslip(&employee, &request(&employee.id, 3));
        let err = store.insert_payslip(&second).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count_payslips().await.unwrap(), 1);
        assert_eq!(store.find_payslip(&first.id).await.unwrap(), Some(first));
    }

    #[actix_web::test]
    async fn soft_deleted_employees_are_hidden_from_active_lookups() {
        let store = MemoryStore::new();
        let mut employee = Employee::new(fixtures::new_employee("EMP-001"));
        store.insert_employee(&employee).await.unwrap();

        employee.is_active = false;
        store.update_employee(&employee).await.unwrap();

        assert!(store.find_employee(&employee.id, true).await.unwrap().is_none());
        assert!(store.find_employee(&employee.id, false).await.unwrap().is_some());
        assert!(store.find_active_by_number("EMP-001").await.unwrap().is_none());
        assert!(store.list_active_employees().await.unwrap().is_empty());
    }

    fn promotion_for(employee: &Employee) -> NewPromotion {
        NewPromotion {
            employee_id: employee.id.clone(),
            new_designation: "Senior Lab Technician".to_string(),
            new_salary_components: fixtures::salary(),
            promotion_date: chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        }
    }

    #[actix_web::test]
    async fn promotion_of_deactivated_employee_is_rejected() {
        let store = MemoryStore::new();
        let employee = Employee::new(fixtures::new_employee("EMP-001"));
        store.insert_employee(&employee).await.unwrap();

        let mut fetched = store.find_employee(&employee.id, true).await.unwrap().unwrap();

        let mut deactivated = employee.clone();
        deactivated.is_active = false;
        deactivated.name = "Asha R.".to_string();
        store.update_employee(&deactivated).await.unwrap();

        let request = promotion_for(&fetched);
        let promotion = promote(&mut fetched, request);
        let err = store.apply_promotion(&promotion, &fetched).await.unwrap_err();

        assert!(matches!(err, StoreError::Missing(_)));
        let stored = store.find_employee(&employee.id, false).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.name, "Asha R.");
        assert_eq!(stored.designation, "Lab Technician");
        assert!(store.list_promotions(None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn promotion_keeps_fields_written_since_the_fetch() {
        let store = MemoryStore::new();
        let employee = Employee::new(fixtures::new_employee("EMP-001"));
        store.insert_employee(&employee).await.unwrap();

        let mut fetched = store.find_employee(&employee.id, true).await.unwrap().unwrap();

        let mut renamed = employee.clone();
        renamed.work_location = "Mysuru".to_string();
        store.update_employee(&renamed).await.unwrap();

        let request = promotion_for(&fetched);
        let promotion = promote(&mut fetched, request);
        store.apply_promotion(&promotion, &fetched).await.unwrap();

        let stored = store.find_employee(&employee.id, true).await.unwrap().unwrap();
        assert_eq!(stored.designation, "Senior Lab Technician");
        assert_eq!(stored.work_location, "Mysuru");
        assert_eq!(store.list_promotions(Some(&employee.id)).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn delete_payslip_reports_whether_it_matched() {
        let store = MemoryStore::new();
        let employee = Employee::new(fixtures::new_employee("EMP-001"));
        let payslip = issue_payslip(&employee, &request(&employee.id, 1));
        store.insert_payslip(&payslip).await.unwrap();

        assert!(store.delete_payslip(&payslip.id).await.unwrap());
        assert!(!store.delete_payslip(&payslip.id).await.unwrap());
    }

    #[actix_web::test]
    async fn admins_are_seeded_once() {
        let store = MemoryStore::new();
        let admin = Admin {
            username: "admin".to_string(),
            password_hash: "hash".to_string(),
        };

        assert!(store.insert_admin_if_missing(&admin).await.unwrap());
        assert!(!store.insert_admin_if_missing(&admin).await.unwrap());
    }
}
