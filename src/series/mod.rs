//! The derivation engine: pure transforms over a `PriceSeries`.
//!
//! Every operation here is stateless and idempotent; the presentation layers
//! (report, ASCII plot, TUI) consume the plain data these functions return.

pub mod derive;

pub use derive::*;
