use chrono::Utc;
use strum::{Display, EnumIter, IntoEnumIterator};
use uuid::Uuid;

use crate::model::{
    employee::{Employee, SalaryComponents},
    payslip::{LineItem, Payslip, PayslipRequest},
    promotion::{NewPromotion, Promotion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Earning,
    Deduction,
}

/// Every named pay component, in payslip display order.
///
/// The `Display` string is the label printed on the payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum PayComponent {
    #[strum(serialize = "Basic")]
    Basic,
    #[strum(serialize = "House Rent Allowance")]
    HouseRentAllowance,
    #[strum(serialize = "Transport Allowance")]
    TransportAllowance,
    #[strum(serialize = "Fixed Allowance")]
    FixedAllowance,
    #[strum(serialize = "Home Collection - Visit")]
    HomeCollectionVisit,
    #[strum(serialize = "Professional Tax")]
    ProfessionalTax,
}

impl PayComponent {
    pub fn side(self) -> Side {
        match self {
            PayComponent::ProfessionalTax => Side::Deduction,
            _ => Side::Earning,
        }
    }

    /// Value held in the employee's standing salary structure.
    pub fn standing_amount(self, salary: &SalaryComponents) -> f64 {
        match self {
            PayComponent::Basic => salary.basic,
            PayComponent::HouseRentAllowance => salary.house_rent_allowance,
            PayComponent::TransportAllowance => salary.transport_allowance,
            PayComponent::FixedAllowance => salary.fixed_allowance,
            PayComponent::HomeCollectionVisit => salary.home_collection_visit,
            PayComponent::ProfessionalTax => salary.professional_tax,
        }
    }

    /// Value for one payslip: a one-off request amount wins over the standing one.
    fn payslip_amount(self, salary: &SalaryComponents, request: &PayslipRequest) -> f64 {
        match self {
            PayComponent::HomeCollectionVisit => request
                .home_collection_visit
                .unwrap_or(salary.home_collection_visit),
            _ => self.standing_amount(salary),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedPayslip {
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
    pub gross_earnings: f64,
    pub total_deductions: f64,
    pub net_payable: f64,
}

/// Builds the earnings and deductions of one payslip.
///
/// A component appears only when its amount is strictly positive. Net pay is
/// not floored and may come out negative.
pub fn compute(salary: &SalaryComponents, request: &PayslipRequest) -> ComputedPayslip {
    let mut earnings = Vec::new();
    let mut deductions = Vec::new();

    for component in PayComponent::iter() {
        let amount = component.payslip_amount(salary, request);
        if amount <= 0.0 {
            continue;
        }
        let item = LineItem::new(component.to_string(), amount);
        match component.side() {
            Side::Earning => earnings.push(item),
            Side::Deduction => deductions.push(item),
        }
    }

    if let Some(other) = &request.other_deduction {
        if other.amount > 0.0 {
            deductions.push(LineItem::new(other.name.clone(), other.amount));
        }
    }

    let gross_earnings = sum(&earnings);
    let total_deductions = sum(&deductions);

    ComputedPayslip {
        earnings,
        deductions,
        gross_earnings,
        total_deductions,
        net_payable: gross_earnings - total_deductions,
    }
}

/// Monthly total of the standing structure, professional tax excluded.
///
/// Used for the old/new figures recorded with a promotion.
pub fn standing_total(salary: &SalaryComponents) -> f64 {
    PayComponent::iter()
        .filter(|c| c.side() == Side::Earning)
        .map(|c| c.standing_amount(salary))
        .sum()
}

/// Live monthly net for the dashboard: standing total minus professional tax.
pub fn standing_net(salary: &SalaryComponents) -> f64 {
    standing_total(salary) - PayComponent::ProfessionalTax.standing_amount(salary)
}

/// Creates the stored payslip record, snapshotting the employee's identity.
pub fn issue_payslip(employee: &Employee, request: &PayslipRequest) -> Payslip {
    let computed = compute(&employee.salary_components, request);

    Payslip {
        id: Uuid::new_v4().to_string(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        employee_no: employee.employee_no.clone(),
        designation: employee.designation.clone(),
        month: request.month,
        year: request.year,
        paid_days: request.paid_days,
        lop_days: request.lop_days,
        earnings: computed.earnings,
        deductions: computed.deductions,
        gross_earnings: computed.gross_earnings,
        total_deductions: computed.total_deductions,
        net_payable: computed.net_payable,
        generated_at: Utc::now(),
    }
}

/// Replaces the employee's designation and salary structure, returning the
/// history entry that records the change.
pub fn promote(employee: &mut Employee, request: NewPromotion) -> Promotion {
    let now = Utc::now();
    let promotion = Promotion {
        id: Uuid::new_v4().to_string(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        old_designation: employee.designation.clone(),
        new_designation: request.new_designation.clone(),
        old_salary: standing_total(&employee.salary_components),
        new_salary: standing_total(&request.new_salary_components),
        promotion_date: request.promotion_date,
        created_at: now,
    };

    employee.designation = request.new_designation;
    employee.salary_components = request.new_salary_components;
    employee.updated_at = now;

    promotion
}

fn sum(items: &[LineItem]) -> f64 {
    items.iter().map(|i| i.amount).sum()
}
