//! Benchmark metric extraction from run logs.

#[macro_use]
extern crate serde_derive;

pub mod benchmark;
pub mod runlog;
mod utils;

pub use benchmark::{
    parse_benchmark, parse_benchmark_value, parse_lines, Benchmark, Metrics, Record,
};
pub use runlog::{read_lines, RunLogError};
