//! CLI command implementations

pub mod chord;
pub mod freq;
pub mod json_output;
pub mod pluck;

mod reporting;
