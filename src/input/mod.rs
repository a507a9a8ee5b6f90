// file: src/input/mod.rs
// description: input discovery module exports
// reference: internal module structure

pub mod scanner;

pub use scanner::{InputScanner, InputSet};
