//! Output module for presenting batch results on the console

pub mod stats;

pub use stats::{format_outcome, format_records, format_statistics, print_statistics};
