//! CLI command implementations

pub mod catalog;
pub mod run;
pub mod validate;
