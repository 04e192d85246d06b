//! Data sources.
//!
//! Real input arrives as a CSV through `io::ingest`; this module only holds
//! the synthetic sample generator used by `sv sample`.

pub mod sample;

pub use sample::*;
