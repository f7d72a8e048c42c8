//! Interpolation filter coefficients
//!
//! The hard-coded cubic kernel weights and the table file the hardware
//! loads into its coefficient ROM.

mod table;
pub mod types;


pub use table::CoefficientTable;
pub use types::{CoefficientSet, TapFormat, TAPS_PER_PHASE};
