// file: src/parser/mod.rs
// description: structured document parsing module exports
// reference: internal module structure

pub mod stix;

pub use stix::{DocumentFormat, StixParser};
