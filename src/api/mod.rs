//! HTTP handlers. Every handler here sits behind the auth middleware.

#[cfg(test)]
pub(crate) mod test_support;

pub mod dashboard;
pub mod employee;
pub mod payslip;
pub mod promotion;
