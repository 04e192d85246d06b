//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input series (`PricePoint`, `PriceSeries`)
//! - derived views (`ResampledSeries`, `MovingAverageSeries`, `DifferencedSeries`)
//! - configuration (`ViewConfig`, `WindowBounds`, `ViewKind`)
//! - the exported summary schema (`SummaryFile`)

pub mod types;

pub use types::*;
