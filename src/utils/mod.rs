// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod dates;
pub mod logging;
pub mod template;
pub mod validation;

pub use dates::ReportDates;
pub use template::{ReportContext, ReportTemplate};
pub use validation::Validator;
