//! Payslip computation and document rendering.

pub mod calculator;
pub mod pdf;
pub mod render;
pub mod words;
