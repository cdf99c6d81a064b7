//! Output formatting for simulation results

pub mod console;
pub mod report;
