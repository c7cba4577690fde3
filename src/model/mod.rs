pub mod admin;
pub mod employee;
pub mod payslip;
pub mod promotion;
