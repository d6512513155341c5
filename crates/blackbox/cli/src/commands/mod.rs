//! CLI command implementations

pub mod catalog;
pub mod hypotheses;
pub mod inspect;
pub mod run;
