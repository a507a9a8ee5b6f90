// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod indicator;
pub mod observable;

pub use indicator::{IndicatorEntry, IndicatorType};
pub use observable::{
    AddressFamily, IndicatorRecord, StructuredDocument, StructuredObservable, UriSubtype,
};
